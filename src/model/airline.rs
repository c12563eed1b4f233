use crate::model::AirlineCode;
use serde::{Deserialize, Serialize};

/// Mutable fields of an airline. Every field is replaced on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirlineDetails {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub country: Option<String>,
}

/// A persisted airline. Its flights are derived from `Flight::airline_code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airline {
    pub airline_code: AirlineCode,
    pub details: AirlineDetails,
}

impl Airline {
    pub fn new(airline_code: AirlineCode, details: AirlineDetails) -> Self {
        Self {
            airline_code,
            details,
        }
    }
}
