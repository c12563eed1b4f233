use crate::logic::error::{TrackerError, TrackerResult};
use crate::model::{AirlineCode, Flight};

/// An existing flight may only be changed under the airline that owns it.
pub fn ensure_operated_by(flight: &Flight, airline_code: AirlineCode) -> TrackerResult<()> {
    if flight.is_operated_by(airline_code) {
        Ok(())
    } else {
        Err(TrackerError::InvalidReference {
            flight_number: flight.flight_number,
            airline_code,
            owner_code: flight.airline_code,
        })
    }
}
