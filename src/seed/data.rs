use anyhow::Result;

use crate::logic::FlightTracker;
use crate::model::{FlightAirline, FlightData, FlightPassenger, Upsert};
use crate::store::traits::Store;

struct SeedFlight {
    departure_date: &'static str,
    departure_time: &'static str,
    arrival_date: &'static str,
    arrival_time: &'static str,
    passengers: &'static [(&'static str, &'static str, &'static str)],
}

struct SeedAirline {
    name: &'static str,
    phone_number: &'static str,
    website: &'static str,
    country: &'static str,
    flights: &'static [SeedFlight],
}

const SEED_AIRLINES: &[SeedAirline] = &[
    SeedAirline {
        name: "Delta Air Lines",
        phone_number: "800-221-1212",
        website: "https://www.delta.com",
        country: "United States",
        flights: &[
            SeedFlight {
                departure_date: "2024-01-01",
                departure_time: "08:15",
                arrival_date: "2024-01-01",
                arrival_time: "11:40",
                passengers: &[("Ada", "Lovelace", "12A"), ("Alan", "Turing", "12B")],
            },
            SeedFlight {
                departure_date: "2024-01-03",
                departure_time: "17:05",
                arrival_date: "2024-01-04",
                arrival_time: "06:50",
                passengers: &[("Grace", "Hopper", "3C")],
            },
        ],
    },
    SeedAirline {
        name: "Icelandair",
        phone_number: "+354 50 50 100",
        website: "https://www.icelandair.com",
        country: "Iceland",
        flights: &[SeedFlight {
            departure_date: "2024-02-14",
            departure_time: "07:40",
            arrival_date: "2024-02-14",
            arrival_time: "12:05",
            passengers: &[("Katherine", "Johnson", "21F")],
        }],
    },
];

/// Load a small demonstration dataset through the regular tracker operations
pub async fn load_seed_data<S: Store>(store: &S) -> Result<()> {
    for seed in SEED_AIRLINES {
        let airline = FlightTracker::upsert_airline(
            store,
            Upsert::Create,
            &FlightAirline {
                airline_code: None,
                airline_name: Some(seed.name.to_string()),
                airline_phone_number: Some(seed.phone_number.to_string()),
                airline_website: Some(seed.website.to_string()),
                airline_country: Some(seed.country.to_string()),
            },
        )
        .await?;
        let airline_code = airline
            .airline_code
            .ok_or_else(|| anyhow::anyhow!("Seeded airline {} has no code", seed.name))?;

        for seed_flight in seed.flights {
            let flight = FlightTracker::upsert_flight(
                store,
                Upsert::Create,
                &FlightData {
                    departure_date: Some(seed_flight.departure_date.to_string()),
                    departure_time: Some(seed_flight.departure_time.to_string()),
                    arrival_date: Some(seed_flight.arrival_date.to_string()),
                    arrival_time: Some(seed_flight.arrival_time.to_string()),
                    ..Default::default()
                },
                airline_code,
            )
            .await?;
            let flight_number = flight
                .flight_number
                .ok_or_else(|| anyhow::anyhow!("Seeded flight for {} has no number", seed.name))?;

            for (first_name, last_name, seat) in seed_flight.passengers {
                let email = format!(
                    "{}.{}@example.com",
                    first_name.to_lowercase(),
                    last_name.to_lowercase()
                );
                FlightTracker::attach_passenger(
                    store,
                    Upsert::Create,
                    &FlightPassenger {
                        passenger_id: None,
                        passenger_first_name: Some(first_name.to_string()),
                        passenger_last_name: Some(last_name.to_string()),
                        passenger_email: Some(email),
                        passenger_seat_number: Some(seat.to_string()),
                    },
                    flight_number,
                )
                .await?;
            }
        }

        log::info!("Seeded airline {} ({})", seed.name, airline_code);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_seed_data_loads_linked_records() {
        let store = MemoryStore::new();
        load_seed_data(&store).await.unwrap();

        let roster = FlightTracker::retrieve_all_flights(&store).await.unwrap();
        let flights: Vec<FlightData> = roster.iter().collect();
        assert_eq!(flights.len(), 3);
        assert_eq!(flights[0].passengers.len(), 2);
        assert_eq!(
            flights[0].passengers[0].passenger_email.as_deref(),
            Some("ada.lovelace@example.com")
        );
    }
}
