use crate::logic::error::{TrackerError, TrackerResult};
use crate::logic::resolve::{self, CopyFields, Resolved};
use crate::logic::validate::ensure_operated_by;
use crate::model::{
    Airline, AirlineCode, AirlineDetail, AirlineDetails, EntityKind, Flight, FlightAirline,
    FlightData, FlightManifest, FlightNumber, FlightPassenger, FlightSchedule, Passenger,
    PassengerDetail, PassengerDetails, PassengerId, Upsert,
};
use crate::store::traits::{AttachOutcome, Store};

/// Airline, flight and passenger operations over a store.
///
/// Each mutating operation resolves and validates everything it references,
/// then hands the store exactly one write, which the store applies atomically.
pub struct FlightTracker;

/// Snapshot of every flight, projected into `FlightData` on iteration.
///
/// The snapshot is finite and can be walked any number of times.
#[derive(Debug, Clone, Default)]
pub struct FlightRoster {
    manifests: Vec<FlightManifest>,
}

impl FlightRoster {
    pub fn iter(&self) -> impl Iterator<Item = FlightData> + '_ {
        self.manifests
            .iter()
            .map(|manifest| FlightData::from_flight(&manifest.flight, &manifest.passengers))
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }
}

impl FlightTracker {
    /// Create or replace a flight owned by `airline_code`
    pub async fn upsert_flight<S: Store>(
        store: &S,
        request: Upsert<FlightNumber>,
        data: &FlightData,
        airline_code: AirlineCode,
    ) -> TrackerResult<FlightData> {
        let airline = resolve::find_existing::<Airline, S>(store, airline_code).await?;

        let flight = match resolve::find_or_create::<Flight, S>(store, request).await? {
            Resolved::New => {
                let schedule: FlightSchedule = resolve::fresh(data);
                store
                    .insert_flight(airline.airline_code, schedule)
                    .await?
                    .ok_or_else(|| TrackerError::not_found(EntityKind::Airline, airline_code))?
            }
            Resolved::Existing(mut flight) => {
                ensure_operated_by(&flight, airline.airline_code)?;
                flight.schedule.copy_fields(data);
                flight.airline_code = airline.airline_code;
                if !store.update_flight(&flight).await? {
                    return Err(TrackerError::not_found(
                        EntityKind::Flight,
                        flight.flight_number,
                    ));
                }
                flight
            }
        };

        log::debug!(
            "Saved flight {} for airline {}",
            flight.flight_number,
            flight.airline_code
        );

        let passengers = store.list_passengers_for_flight(flight.flight_number).await?;
        Ok(FlightData::from_flight(&flight, &passengers))
    }

    /// Create or replace an airline
    pub async fn upsert_airline<S: Store>(
        store: &S,
        request: Upsert<AirlineCode>,
        data: &FlightAirline,
    ) -> TrackerResult<FlightAirline> {
        let airline = match resolve::find_or_create::<Airline, S>(store, request).await? {
            Resolved::New => {
                let details: AirlineDetails = resolve::fresh(data);
                store.insert_airline(details).await?
            }
            Resolved::Existing(mut airline) => {
                airline.details.copy_fields(data);
                if !store.update_airline(&airline).await? {
                    return Err(TrackerError::not_found(
                        EntityKind::Airline,
                        airline.airline_code,
                    ));
                }
                airline
            }
        };

        Ok(FlightAirline::from(&airline))
    }

    /// Create or replace a passenger and book it on `flight_number`.
    ///
    /// The flight gains the passenger and the passenger gains the flight in
    /// the same store write.
    pub async fn attach_passenger<S: Store>(
        store: &S,
        request: Upsert<PassengerId>,
        data: &FlightPassenger,
        flight_number: FlightNumber,
    ) -> TrackerResult<FlightPassenger> {
        let flight = resolve::find_existing::<Flight, S>(store, flight_number).await?;

        let (target, details) = match resolve::find_or_create::<Passenger, S>(store, request).await? {
            Resolved::New => (Upsert::Create, resolve::fresh::<PassengerDetails, _>(data)),
            Resolved::Existing(passenger) => {
                let mut details = passenger.details;
                details.copy_fields(data);
                (Upsert::Update(passenger.passenger_id), details)
            }
        };

        match store
            .attach_passenger(target, details, flight.flight_number)
            .await?
        {
            AttachOutcome::Attached(passenger) => Ok(FlightPassenger::from(&passenger)),
            AttachOutcome::FlightMissing => Err(TrackerError::not_found(
                EntityKind::Flight,
                flight.flight_number,
            )),
            AttachOutcome::PassengerMissing => Err(TrackerError::not_found(
                EntityKind::Passenger,
                target.key().copied().unwrap_or_default(),
            )),
        }
    }

    pub async fn retrieve_all_flights<S: Store>(store: &S) -> TrackerResult<FlightRoster> {
        let manifests = store.list_flights().await?;
        Ok(FlightRoster { manifests })
    }

    pub async fn retrieve_flight<S: Store>(
        store: &S,
        flight_number: FlightNumber,
    ) -> TrackerResult<FlightData> {
        let flight = resolve::find_existing::<Flight, S>(store, flight_number).await?;
        let passengers = store.list_passengers_for_flight(flight.flight_number).await?;
        Ok(FlightData::from_flight(&flight, &passengers))
    }

    pub async fn retrieve_airline<S: Store>(
        store: &S,
        airline_code: AirlineCode,
    ) -> TrackerResult<AirlineDetail> {
        let airline = resolve::find_existing::<Airline, S>(store, airline_code).await?;
        let flight_numbers = store
            .list_flight_numbers_for_airline(airline.airline_code)
            .await?;
        Ok(AirlineDetail {
            airline: FlightAirline::from(&airline),
            flight_numbers,
        })
    }

    pub async fn retrieve_passenger<S: Store>(
        store: &S,
        passenger_id: PassengerId,
    ) -> TrackerResult<PassengerDetail> {
        let passenger = resolve::find_existing::<Passenger, S>(store, passenger_id).await?;
        let flight_numbers = store
            .list_flight_numbers_for_passenger(passenger.passenger_id)
            .await?;
        Ok(PassengerDetail {
            passenger: FlightPassenger::from(&passenger),
            flight_numbers,
        })
    }

    /// Delete a flight. Its passengers and airline are kept.
    pub async fn delete_flight<S: Store>(
        store: &S,
        flight_number: FlightNumber,
    ) -> TrackerResult<()> {
        let flight = resolve::find_existing::<Flight, S>(store, flight_number).await?;
        if !store.delete_flight(flight.flight_number).await? {
            return Err(TrackerError::not_found(EntityKind::Flight, flight_number));
        }
        Ok(())
    }

    /// Delete an airline together with every flight it owns
    pub async fn delete_airline<S: Store>(
        store: &S,
        airline_code: AirlineCode,
    ) -> TrackerResult<()> {
        let airline = resolve::find_existing::<Airline, S>(store, airline_code).await?;
        if !store.delete_airline(airline.airline_code).await? {
            return Err(TrackerError::not_found(EntityKind::Airline, airline_code));
        }
        Ok(())
    }

    /// Delete a passenger. The flights it was booked on are kept.
    pub async fn delete_passenger<S: Store>(
        store: &S,
        passenger_id: PassengerId,
    ) -> TrackerResult<()> {
        let passenger = resolve::find_existing::<Passenger, S>(store, passenger_id).await?;
        if !store.delete_passenger(passenger.passenger_id).await? {
            return Err(TrackerError::not_found(EntityKind::Passenger, passenger_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn airline_named(name: &str) -> FlightAirline {
        FlightAirline {
            airline_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn departing(date: &str) -> FlightData {
        FlightData {
            departure_date: Some(date.to_string()),
            departure_time: Some("08:00".to_string()),
            arrival_date: Some(date.to_string()),
            arrival_time: Some("11:30".to_string()),
            ..Default::default()
        }
    }

    fn passenger_named(first_name: &str) -> FlightPassenger {
        FlightPassenger {
            passenger_first_name: Some(first_name.to_string()),
            ..Default::default()
        }
    }

    async fn create_airline(store: &MemoryStore, name: &str) -> AirlineCode {
        FlightTracker::upsert_airline(store, Upsert::Create, &airline_named(name))
            .await
            .unwrap()
            .airline_code
            .unwrap()
    }

    async fn create_flight(store: &MemoryStore, airline_code: AirlineCode) -> FlightNumber {
        FlightTracker::upsert_flight(store, Upsert::Create, &departing("2024-01-01"), airline_code)
            .await
            .unwrap()
            .flight_number
            .unwrap()
    }

    #[tokio::test]
    async fn test_created_flights_get_distinct_numbers() {
        let store = MemoryStore::new();
        let delta = create_airline(&store, "Delta").await;

        let mut seen = std::collections::HashSet::new();
        for _ in 0..5 {
            assert!(seen.insert(create_flight(&store, delta).await));
        }
    }

    #[tokio::test]
    async fn test_create_flight_under_unknown_airline_is_not_found() {
        let store = MemoryStore::new();
        let err = FlightTracker::upsert_flight(&store, Upsert::Create, &departing("2024-01-01"), 9)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TrackerError::NotFound {
                entity: EntityKind::Airline,
                id: 9
            }
        ));
        assert!(FlightTracker::retrieve_all_flights(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_flight_cannot_be_reparented() {
        let store = MemoryStore::new();
        let delta = create_airline(&store, "Delta").await;
        let united = create_airline(&store, "United").await;
        let flight_number = create_flight(&store, delta).await;

        let err = FlightTracker::upsert_flight(
            &store,
            Upsert::Update(flight_number),
            &departing("2025-06-01"),
            united,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TrackerError::InvalidReference { .. }));

        let stored = FlightTracker::retrieve_flight(&store, flight_number).await.unwrap();
        assert_eq!(stored.airline_code, Some(delta));
        assert_eq!(stored.departure_date.as_deref(), Some("2024-01-01"));
        assert!(FlightTracker::retrieve_airline(&store, united)
            .await
            .unwrap()
            .flight_numbers
            .is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_flight_is_not_found() {
        let store = MemoryStore::new();
        let delta = create_airline(&store, "Delta").await;

        let err = FlightTracker::upsert_flight(&store, Upsert::Update(77), &departing("2024-01-01"), delta)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TrackerError::NotFound {
                entity: EntityKind::Flight,
                id: 77
            }
        ));
    }

    #[tokio::test]
    async fn test_repeated_update_is_idempotent() {
        let store = MemoryStore::new();
        let delta = create_airline(&store, "Delta").await;
        let flight_number = create_flight(&store, delta).await;

        let payload = departing("2025-03-03");
        let first = FlightTracker::upsert_flight(&store, Upsert::Update(flight_number), &payload, delta)
            .await
            .unwrap();
        let second = FlightTracker::upsert_flight(&store, Upsert::Update(flight_number), &payload, delta)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(FlightTracker::retrieve_all_flights(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_replaces_every_field() {
        let store = MemoryStore::new();
        let delta = create_airline(&store, "Delta").await;
        let flight_number = create_flight(&store, delta).await;

        let sparse = FlightData {
            departure_date: Some("2025-12-24".to_string()),
            ..Default::default()
        };
        let updated = FlightTracker::upsert_flight(&store, Upsert::Update(flight_number), &sparse, delta)
            .await
            .unwrap();

        assert_eq!(updated.departure_date.as_deref(), Some("2025-12-24"));
        assert_eq!(updated.departure_time, None);
        assert_eq!(updated.arrival_time, None);
    }

    #[tokio::test]
    async fn test_attach_passenger_is_symmetric() {
        let store = MemoryStore::new();
        let delta = create_airline(&store, "Delta").await;
        let flight_number = create_flight(&store, delta).await;

        let ada = FlightTracker::attach_passenger(
            &store,
            Upsert::Create,
            &passenger_named("Ada"),
            flight_number,
        )
        .await
        .unwrap();
        let passenger_id = ada.passenger_id.unwrap();

        let flight = FlightTracker::retrieve_flight(&store, flight_number).await.unwrap();
        assert_eq!(flight.passengers, vec![ada]);

        let detail = FlightTracker::retrieve_passenger(&store, passenger_id).await.unwrap();
        assert_eq!(detail.flight_numbers, vec![flight_number]);
    }

    #[tokio::test]
    async fn test_existing_passenger_can_join_second_flight() {
        let store = MemoryStore::new();
        let delta = create_airline(&store, "Delta").await;
        let outbound = create_flight(&store, delta).await;
        let inbound = create_flight(&store, delta).await;

        let ada = FlightTracker::attach_passenger(&store, Upsert::Create, &passenger_named("Ada"), outbound)
            .await
            .unwrap();
        let passenger_id = ada.passenger_id.unwrap();
        let renamed = FlightTracker::attach_passenger(
            &store,
            Upsert::Update(passenger_id),
            &passenger_named("Augusta"),
            inbound,
        )
        .await
        .unwrap();

        assert_eq!(renamed.passenger_id, Some(passenger_id));
        let detail = FlightTracker::retrieve_passenger(&store, passenger_id).await.unwrap();
        assert_eq!(detail.flight_numbers, vec![outbound, inbound]);
        assert_eq!(detail.passenger.passenger_first_name.as_deref(), Some("Augusta"));

        // The outbound manifest shows the replaced fields too
        let flight = FlightTracker::retrieve_flight(&store, outbound).await.unwrap();
        assert_eq!(
            flight.passengers[0].passenger_first_name.as_deref(),
            Some("Augusta")
        );
    }

    #[tokio::test]
    async fn test_attach_unknown_passenger_leaves_flight_untouched() {
        let store = MemoryStore::new();
        let delta = create_airline(&store, "Delta").await;
        let flight_number = create_flight(&store, delta).await;

        let err = FlightTracker::attach_passenger(
            &store,
            Upsert::Update(12),
            &passenger_named("Ada"),
            flight_number,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            TrackerError::NotFound {
                entity: EntityKind::Passenger,
                id: 12
            }
        ));
        let flight = FlightTracker::retrieve_flight(&store, flight_number).await.unwrap();
        assert!(flight.passengers.is_empty());
    }

    #[tokio::test]
    async fn test_delete_airline_removes_its_flights() {
        let store = MemoryStore::new();
        let delta = create_airline(&store, "Delta").await;
        let united = create_airline(&store, "United").await;
        let first = create_flight(&store, delta).await;
        let second = create_flight(&store, delta).await;
        let other = create_flight(&store, united).await;

        FlightTracker::delete_airline(&store, delta).await.unwrap();

        for flight_number in [first, second] {
            let err = FlightTracker::retrieve_flight(&store, flight_number).await.unwrap_err();
            assert!(matches!(err, TrackerError::NotFound { .. }));
        }
        assert!(FlightTracker::retrieve_flight(&store, other).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_flight_keeps_passengers() {
        let store = MemoryStore::new();
        let delta = create_airline(&store, "Delta").await;
        let flight_number = create_flight(&store, delta).await;
        let ada = FlightTracker::attach_passenger(&store, Upsert::Create, &passenger_named("Ada"), flight_number)
            .await
            .unwrap();
        let passenger_id = ada.passenger_id.unwrap();

        FlightTracker::delete_flight(&store, flight_number).await.unwrap();

        let detail = FlightTracker::retrieve_passenger(&store, passenger_id).await.unwrap();
        assert!(detail.flight_numbers.is_empty());
        assert!(FlightTracker::retrieve_airline(&store, delta)
            .await
            .unwrap()
            .flight_numbers
            .is_empty());
    }

    #[tokio::test]
    async fn test_delete_passenger_keeps_flight() {
        let store = MemoryStore::new();
        let delta = create_airline(&store, "Delta").await;
        let flight_number = create_flight(&store, delta).await;
        let ada = FlightTracker::attach_passenger(&store, Upsert::Create, &passenger_named("Ada"), flight_number)
            .await
            .unwrap();

        FlightTracker::delete_passenger(&store, ada.passenger_id.unwrap())
            .await
            .unwrap();

        let flight = FlightTracker::retrieve_flight(&store, flight_number).await.unwrap();
        assert!(flight.passengers.is_empty());
    }

    #[tokio::test]
    async fn test_deletes_of_unknown_records_are_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            FlightTracker::delete_flight(&store, 1).await,
            Err(TrackerError::NotFound { entity: EntityKind::Flight, .. })
        ));
        assert!(matches!(
            FlightTracker::delete_airline(&store, 1).await,
            Err(TrackerError::NotFound { entity: EntityKind::Airline, .. })
        ));
        assert!(matches!(
            FlightTracker::delete_passenger(&store, 1).await,
            Err(TrackerError::NotFound { entity: EntityKind::Passenger, .. })
        ));
    }

    #[tokio::test]
    async fn test_roster_can_be_walked_twice() {
        let store = MemoryStore::new();
        let delta = create_airline(&store, "Delta").await;
        create_flight(&store, delta).await;
        create_flight(&store, delta).await;

        let roster = FlightTracker::retrieve_all_flights(&store).await.unwrap();
        let first: Vec<FlightData> = roster.iter().collect();
        let second: Vec<FlightData> = roster.iter().collect();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert!(first.iter().all(|flight| flight.airline_code == Some(delta)));
    }

    #[tokio::test]
    async fn test_delta_scenario() {
        let store = MemoryStore::new();

        let airline = FlightTracker::upsert_airline(&store, Upsert::Create, &airline_named("Delta"))
            .await
            .unwrap();
        let airline_code = airline.airline_code.unwrap();
        assert_eq!(airline.airline_name.as_deref(), Some("Delta"));

        let flight = FlightTracker::upsert_flight(&store, Upsert::Create, &departing("2024-01-01"), airline_code)
            .await
            .unwrap();
        let flight_number = flight.flight_number.unwrap();
        assert_eq!(flight.airline_code, Some(airline_code));

        let ada = FlightTracker::attach_passenger(&store, Upsert::Create, &passenger_named("Ada"), flight_number)
            .await
            .unwrap();
        assert!(ada.passenger_id.is_some());

        let fetched = FlightTracker::retrieve_flight(&store, flight_number).await.unwrap();
        assert_eq!(fetched.passengers.len(), 1);
        assert_eq!(fetched.passengers[0].passenger_first_name.as_deref(), Some("Ada"));

        FlightTracker::delete_airline(&store, airline_code).await.unwrap();
        let err = FlightTracker::retrieve_flight(&store, flight_number).await.unwrap_err();
        assert!(matches!(err, TrackerError::NotFound { .. }));
    }
}
