use crate::model::{AirlineCode, EntityKind, FlightNumber};

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("{} with {}={id} not found", .entity.name(), .entity.key_name())]
    NotFound { entity: EntityKind, id: i64 },
    #[error(
        "Flight with flightNumber={flight_number} belongs to airlineCode={owner_code}, not airlineCode={airline_code}"
    )]
    InvalidReference {
        flight_number: FlightNumber,
        airline_code: AirlineCode,
        owner_code: AirlineCode,
    },
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl TrackerError {
    pub fn not_found(entity: EntityKind, id: i64) -> Self {
        TrackerError::NotFound { entity, id }
    }
}

pub type TrackerResult<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_identifier() {
        let err = TrackerError::not_found(EntityKind::Flight, 42);
        assert_eq!(err.to_string(), "Flight with flightNumber=42 not found");

        let err = TrackerError::InvalidReference {
            flight_number: 42,
            airline_code: 2,
            owner_code: 1,
        };
        assert_eq!(
            err.to_string(),
            "Flight with flightNumber=42 belongs to airlineCode=1, not airlineCode=2"
        );
    }
}
