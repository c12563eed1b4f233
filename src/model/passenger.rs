use crate::model::PassengerId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerDetails {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Free-form seat label; not checked for clashes.
    pub seat_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    pub passenger_id: PassengerId,
    pub details: PassengerDetails,
}

impl Passenger {
    pub fn new(passenger_id: PassengerId, details: PassengerDetails) -> Self {
        Self {
            passenger_id,
            details,
        }
    }
}
