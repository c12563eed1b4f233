use crate::model::{AirlineCode, FlightNumber, Passenger};
use serde::{Deserialize, Serialize};

/// Departure and arrival, kept as opaque strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightSchedule {
    pub departure_date: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_date: Option<String>,
    pub arrival_time: Option<String>,
}

/// A persisted flight. `airline_code` is the canonical Airline→Flight link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    pub flight_number: FlightNumber,
    pub airline_code: AirlineCode,
    pub schedule: FlightSchedule,
}

impl Flight {
    pub fn new(flight_number: FlightNumber, airline_code: AirlineCode, schedule: FlightSchedule) -> Self {
        Self {
            flight_number,
            airline_code,
            schedule,
        }
    }

    pub fn is_operated_by(&self, airline_code: AirlineCode) -> bool {
        self.airline_code == airline_code
    }
}

/// A flight together with the passengers booked on it, ordered by passenger id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightManifest {
    pub flight: Flight,
    pub passengers: Vec<Passenger>,
}
