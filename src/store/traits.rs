use crate::model::{
    Airline, AirlineCode, AirlineDetails, Flight, FlightManifest, FlightNumber, FlightSchedule,
    Passenger, PassengerDetails, PassengerId, Upsert,
};
use anyhow::Result;

/// Result of the combined passenger save + flight link write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachOutcome {
    /// The passenger was saved and linked to the flight on both sides.
    Attached(Passenger),
    /// The flight disappeared before the write; nothing was changed.
    FlightMissing,
    /// The passenger to update disappeared before the write; nothing was changed.
    PassengerMissing,
}

#[async_trait::async_trait]
pub trait AirlineStore: Send + Sync {
    async fn get_airline(&self, airline_code: AirlineCode) -> Result<Option<Airline>>;
    /// Persist a new airline under a freshly assigned code
    async fn insert_airline(&self, details: AirlineDetails) -> Result<Airline>;
    /// Replace the fields of an existing airline. Returns false if it no longer exists.
    async fn update_airline(&self, airline: &Airline) -> Result<bool>;
    /// Delete an airline and, in the same transaction, every flight it owns
    /// along with those flights' passenger links. Passengers themselves stay.
    async fn delete_airline(&self, airline_code: AirlineCode) -> Result<bool>;
    async fn list_flight_numbers_for_airline(
        &self,
        airline_code: AirlineCode,
    ) -> Result<Vec<FlightNumber>>;
}

#[async_trait::async_trait]
pub trait FlightStore: Send + Sync {
    async fn get_flight(&self, flight_number: FlightNumber) -> Result<Option<Flight>>;
    /// Every flight with its passengers, ordered by flight number
    async fn list_flights(&self) -> Result<Vec<FlightManifest>>;
    async fn list_passengers_for_flight(&self, flight_number: FlightNumber)
        -> Result<Vec<Passenger>>;
    /// Persist a new flight owned by `airline_code`. Returns `None` if the
    /// airline no longer exists.
    async fn insert_flight(
        &self,
        airline_code: AirlineCode,
        schedule: FlightSchedule,
    ) -> Result<Option<Flight>>;
    /// Replace the schedule and owner of an existing flight. Returns false if
    /// the flight or its airline no longer exists.
    async fn update_flight(&self, flight: &Flight) -> Result<bool>;
    /// Delete a flight and its passenger links. Passengers and the airline stay.
    async fn delete_flight(&self, flight_number: FlightNumber) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait PassengerStore: Send + Sync {
    async fn get_passenger(&self, passenger_id: PassengerId) -> Result<Option<Passenger>>;
    async fn list_flight_numbers_for_passenger(
        &self,
        passenger_id: PassengerId,
    ) -> Result<Vec<FlightNumber>>;
    /// Save the passenger (create or replace) and link it to the flight on
    /// both sides in one transaction. Linking twice is a no-op.
    async fn attach_passenger(
        &self,
        target: Upsert<PassengerId>,
        details: PassengerDetails,
        flight_number: FlightNumber,
    ) -> Result<AttachOutcome>;
    /// Delete a passenger and its flight links. The flights stay.
    async fn delete_passenger(&self, passenger_id: PassengerId) -> Result<bool>;
}

pub trait Store: AirlineStore + FlightStore + PassengerStore + Send + Sync {}
