use anyhow::Result;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};

use crate::model::{
    Airline, AirlineCode, AirlineDetails, Flight, FlightManifest, FlightNumber, FlightSchedule,
    Passenger, PassengerDetails, PassengerId, Upsert,
};
use crate::store::traits::{AirlineStore, AttachOutcome, FlightStore, PassengerStore, Store};

/// Everything guarded by the store lock. One write lock is one transaction.
#[derive(Debug, Default)]
struct Tables {
    last_airline_code: AirlineCode,
    last_flight_number: FlightNumber,
    last_passenger_id: PassengerId,
    airlines: BTreeMap<AirlineCode, Airline>,
    flights: BTreeMap<FlightNumber, Flight>,
    passengers: BTreeMap<PassengerId, Passenger>,
    /// Airline -> owned flights, mirror of `Flight::airline_code`
    airline_flights: BTreeMap<AirlineCode, BTreeSet<FlightNumber>>,
    flight_passengers: BTreeMap<FlightNumber, BTreeSet<PassengerId>>,
    passenger_flights: BTreeMap<PassengerId, BTreeSet<FlightNumber>>,
}

impl Tables {
    fn next_airline_code(&mut self) -> AirlineCode {
        self.last_airline_code += 1;
        self.last_airline_code
    }

    fn next_flight_number(&mut self) -> FlightNumber {
        self.last_flight_number += 1;
        self.last_flight_number
    }

    fn next_passenger_id(&mut self) -> PassengerId {
        self.last_passenger_id += 1;
        self.last_passenger_id
    }

    /// Store a flight and keep the airline's flight set in step with its owner.
    fn place_flight(&mut self, flight: Flight) {
        if let Some(previous) = self.flights.get(&flight.flight_number) {
            if previous.airline_code != flight.airline_code {
                if let Some(owned) = self.airline_flights.get_mut(&previous.airline_code) {
                    owned.remove(&flight.flight_number);
                }
            }
        }
        self.airline_flights
            .entry(flight.airline_code)
            .or_default()
            .insert(flight.flight_number);
        self.flights.insert(flight.flight_number, flight);
    }

    /// Record a flight/passenger pair on both sides.
    fn link(&mut self, flight_number: FlightNumber, passenger_id: PassengerId) {
        self.flight_passengers
            .entry(flight_number)
            .or_default()
            .insert(passenger_id);
        self.passenger_flights
            .entry(passenger_id)
            .or_default()
            .insert(flight_number);
    }

    fn unlink_flight(&mut self, flight_number: FlightNumber) {
        for passenger_id in self.flight_passengers.remove(&flight_number).unwrap_or_default() {
            if let Some(flights) = self.passenger_flights.get_mut(&passenger_id) {
                flights.remove(&flight_number);
            }
        }
    }

    fn unlink_passenger(&mut self, passenger_id: PassengerId) {
        for flight_number in self.passenger_flights.remove(&passenger_id).unwrap_or_default() {
            if let Some(passengers) = self.flight_passengers.get_mut(&flight_number) {
                passengers.remove(&passenger_id);
            }
        }
    }

    fn remove_flight(&mut self, flight_number: FlightNumber) -> bool {
        let Some(flight) = self.flights.remove(&flight_number) else {
            return false;
        };
        self.unlink_flight(flight_number);
        if let Some(owned) = self.airline_flights.get_mut(&flight.airline_code) {
            owned.remove(&flight_number);
        }
        true
    }

    fn passengers_of(&self, flight_number: FlightNumber) -> Vec<Passenger> {
        self.flight_passengers
            .get(&flight_number)
            .into_iter()
            .flatten()
            .filter_map(|id| self.passengers.get(id).cloned())
            .collect()
    }
}

/// In-process store used by tests and the `memory` backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl AirlineStore for MemoryStore {
    async fn get_airline(&self, airline_code: AirlineCode) -> Result<Option<Airline>> {
        Ok(self.tables.read().airlines.get(&airline_code).cloned())
    }

    async fn insert_airline(&self, details: AirlineDetails) -> Result<Airline> {
        let mut tables = self.tables.write();
        let airline = Airline::new(tables.next_airline_code(), details);
        tables.airlines.insert(airline.airline_code, airline.clone());
        log::debug!("Inserted airline {}", airline.airline_code);
        Ok(airline)
    }

    async fn update_airline(&self, airline: &Airline) -> Result<bool> {
        let mut tables = self.tables.write();
        match tables.airlines.get_mut(&airline.airline_code) {
            Some(stored) => {
                stored.details = airline.details.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_airline(&self, airline_code: AirlineCode) -> Result<bool> {
        let mut tables = self.tables.write();
        if tables.airlines.remove(&airline_code).is_none() {
            return Ok(false);
        }
        let owned = tables.airline_flights.remove(&airline_code).unwrap_or_default();
        for flight_number in &owned {
            tables.remove_flight(*flight_number);
        }
        log::debug!(
            "Deleted airline {} and {} owned flight(s)",
            airline_code,
            owned.len()
        );
        Ok(true)
    }

    async fn list_flight_numbers_for_airline(
        &self,
        airline_code: AirlineCode,
    ) -> Result<Vec<FlightNumber>> {
        let tables = self.tables.read();
        Ok(tables
            .airline_flights
            .get(&airline_code)
            .map(|owned| owned.iter().copied().collect())
            .unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl FlightStore for MemoryStore {
    async fn get_flight(&self, flight_number: FlightNumber) -> Result<Option<Flight>> {
        Ok(self.tables.read().flights.get(&flight_number).cloned())
    }

    async fn list_flights(&self) -> Result<Vec<FlightManifest>> {
        let tables = self.tables.read();
        Ok(tables
            .flights
            .values()
            .map(|flight| FlightManifest {
                flight: flight.clone(),
                passengers: tables.passengers_of(flight.flight_number),
            })
            .collect())
    }

    async fn list_passengers_for_flight(
        &self,
        flight_number: FlightNumber,
    ) -> Result<Vec<Passenger>> {
        Ok(self.tables.read().passengers_of(flight_number))
    }

    async fn insert_flight(
        &self,
        airline_code: AirlineCode,
        schedule: FlightSchedule,
    ) -> Result<Option<Flight>> {
        let mut tables = self.tables.write();
        if !tables.airlines.contains_key(&airline_code) {
            return Ok(None);
        }
        let flight = Flight::new(tables.next_flight_number(), airline_code, schedule);
        tables.place_flight(flight.clone());
        log::debug!("Inserted flight {} for airline {}", flight.flight_number, airline_code);
        Ok(Some(flight))
    }

    async fn update_flight(&self, flight: &Flight) -> Result<bool> {
        let mut tables = self.tables.write();
        if !tables.flights.contains_key(&flight.flight_number)
            || !tables.airlines.contains_key(&flight.airline_code)
        {
            return Ok(false);
        }
        tables.place_flight(flight.clone());
        Ok(true)
    }

    async fn delete_flight(&self, flight_number: FlightNumber) -> Result<bool> {
        Ok(self.tables.write().remove_flight(flight_number))
    }
}

#[async_trait::async_trait]
impl PassengerStore for MemoryStore {
    async fn get_passenger(&self, passenger_id: PassengerId) -> Result<Option<Passenger>> {
        Ok(self.tables.read().passengers.get(&passenger_id).cloned())
    }

    async fn list_flight_numbers_for_passenger(
        &self,
        passenger_id: PassengerId,
    ) -> Result<Vec<FlightNumber>> {
        let tables = self.tables.read();
        Ok(tables
            .passenger_flights
            .get(&passenger_id)
            .map(|flights| flights.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn attach_passenger(
        &self,
        target: Upsert<PassengerId>,
        details: PassengerDetails,
        flight_number: FlightNumber,
    ) -> Result<AttachOutcome> {
        let mut tables = self.tables.write();
        if !tables.flights.contains_key(&flight_number) {
            return Ok(AttachOutcome::FlightMissing);
        }
        let passenger = match target {
            Upsert::Create => Passenger::new(tables.next_passenger_id(), details),
            Upsert::Update(passenger_id) => {
                if !tables.passengers.contains_key(&passenger_id) {
                    return Ok(AttachOutcome::PassengerMissing);
                }
                Passenger::new(passenger_id, details)
            }
        };
        tables
            .passengers
            .insert(passenger.passenger_id, passenger.clone());
        tables.link(flight_number, passenger.passenger_id);
        Ok(AttachOutcome::Attached(passenger))
    }

    async fn delete_passenger(&self, passenger_id: PassengerId) -> Result<bool> {
        let mut tables = self.tables.write();
        if tables.passengers.remove(&passenger_id).is_none() {
            return Ok(false);
        }
        tables.unlink_passenger(passenger_id);
        Ok(true)
    }
}

impl Store for MemoryStore {}
