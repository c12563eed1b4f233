use axum::{http::StatusCode, response::Json};
use serde::Serialize;

use crate::logic::TrackerError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Translate a tracker failure into the status code and body sent to the client
pub fn error_response(err: TrackerError) -> ApiError {
    let status = match &err {
        TrackerError::NotFound { .. } => StatusCode::NOT_FOUND,
        TrackerError::InvalidReference { .. } => StatusCode::BAD_REQUEST,
        TrackerError::UnsupportedOperation(_) => StatusCode::METHOD_NOT_ALLOWED,
        TrackerError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        log::error!("Request failed: {:#}", err);
    } else {
        log::warn!("Request rejected: {}", err);
    }

    (status, Json(ErrorResponse::new(&err.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityKind;

    #[test]
    fn test_status_codes() {
        let (status, Json(body)) = error_response(TrackerError::not_found(EntityKind::Airline, 3));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Airline with airlineCode=3 not found");

        let (status, _) = error_response(TrackerError::InvalidReference {
            flight_number: 1,
            airline_code: 2,
            owner_code: 3,
        });
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = error_response(TrackerError::UnsupportedOperation("nope".to_string()));
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        let (status, _) = error_response(TrackerError::Store(anyhow::anyhow!("connection reset")));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
