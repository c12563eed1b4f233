//! Transfer shapes exchanged at the HTTP boundary.
//!
//! Field names follow the camelCase JSON the tracker has always spoken
//! (`flightNumber`, `airlineCode`, `passengerFirstName`, ...). Identifiers are
//! optional on input: present means "update this record", absent means
//! "create a new one".

use crate::model::{
    Airline, AirlineCode, Flight, FlightNumber, Passenger, PassengerId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightData {
    pub flight_number: Option<FlightNumber>,
    pub departure_date: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_date: Option<String>,
    pub arrival_time: Option<String>,
    /// Output only; the owning airline is always taken from the route.
    pub airline_code: Option<AirlineCode>,
    #[serde(default)]
    pub passengers: Vec<FlightPassenger>,
}

impl FlightData {
    pub fn from_flight(flight: &Flight, passengers: &[Passenger]) -> Self {
        Self {
            flight_number: Some(flight.flight_number),
            departure_date: flight.schedule.departure_date.clone(),
            departure_time: flight.schedule.departure_time.clone(),
            arrival_date: flight.schedule.arrival_date.clone(),
            arrival_time: flight.schedule.arrival_time.clone(),
            airline_code: Some(flight.airline_code),
            passengers: passengers.iter().map(FlightPassenger::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightAirline {
    pub airline_code: Option<AirlineCode>,
    pub airline_name: Option<String>,
    pub airline_phone_number: Option<String>,
    pub airline_website: Option<String>,
    pub airline_country: Option<String>,
}

impl From<&Airline> for FlightAirline {
    fn from(airline: &Airline) -> Self {
        Self {
            airline_code: Some(airline.airline_code),
            airline_name: airline.details.name.clone(),
            airline_phone_number: airline.details.phone_number.clone(),
            airline_website: airline.details.website.clone(),
            airline_country: airline.details.country.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightPassenger {
    pub passenger_id: Option<PassengerId>,
    pub passenger_first_name: Option<String>,
    pub passenger_last_name: Option<String>,
    pub passenger_email: Option<String>,
    pub passenger_seat_number: Option<String>,
}

impl From<&Passenger> for FlightPassenger {
    fn from(passenger: &Passenger) -> Self {
        Self {
            passenger_id: Some(passenger.passenger_id),
            passenger_first_name: passenger.details.first_name.clone(),
            passenger_last_name: passenger.details.last_name.clone(),
            passenger_email: passenger.details.email.clone(),
            passenger_seat_number: passenger.details.seat_number.clone(),
        }
    }
}

/// An airline together with the numbers of the flights it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirlineDetail {
    #[serde(flatten)]
    pub airline: FlightAirline,
    pub flight_numbers: Vec<FlightNumber>,
}

/// A passenger together with the numbers of the flights it is booked on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerDetail {
    #[serde(flatten)]
    pub passenger: FlightPassenger,
    pub flight_numbers: Vec<FlightNumber>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FlightSchedule, PassengerDetails};

    #[test]
    fn test_flight_data_uses_camel_case_and_nulls() {
        let flight = Flight::new(
            12,
            3,
            FlightSchedule {
                departure_date: Some("2024-01-01".to_string()),
                ..Default::default()
            },
        );
        let passenger = Passenger::new(
            5,
            PassengerDetails {
                first_name: Some("Ada".to_string()),
                ..Default::default()
            },
        );

        let json = serde_json::to_value(FlightData::from_flight(&flight, &[passenger])).unwrap();

        assert_eq!(json["flightNumber"], 12);
        assert_eq!(json["airlineCode"], 3);
        assert_eq!(json["departureDate"], "2024-01-01");
        assert!(json["arrivalTime"].is_null());
        assert_eq!(json["passengers"][0]["passengerId"], 5);
        assert_eq!(json["passengers"][0]["passengerFirstName"], "Ada");
    }

    #[test]
    fn test_missing_identifier_deserializes_as_none() {
        let data: FlightData = serde_json::from_str(r#"{"departureDate": "2024-01-01"}"#).unwrap();
        assert_eq!(data.flight_number, None);
        assert!(data.passengers.is_empty());

        let airline: FlightAirline = serde_json::from_str(r#"{"airlineName": "Delta"}"#).unwrap();
        assert_eq!(airline.airline_code, None);
        assert_eq!(airline.airline_name.as_deref(), Some("Delta"));
    }

    #[test]
    fn test_passenger_detail_flattens_passenger_fields() {
        let detail = PassengerDetail {
            passenger: FlightPassenger {
                passenger_id: Some(9),
                passenger_first_name: Some("Grace".to_string()),
                ..Default::default()
            },
            flight_numbers: vec![1, 4],
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["passengerId"], 9);
        assert_eq!(json["passengerFirstName"], "Grace");
        assert_eq!(json["flightNumbers"], serde_json::json!([1, 4]));
    }
}
