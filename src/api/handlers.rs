use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;
use std::sync::Arc;

use crate::api::error::{error_response, ApiError};
use crate::api::extract::{ApiJson, ApiPath};
use crate::logic::{FlightTracker, TrackerError};
use crate::model::{
    AirlineCode, AirlineDetail, FlightAirline, FlightData, FlightNumber, FlightPassenger,
    PassengerDetail, PassengerId, Upsert,
};
use crate::store::traits::Store;

pub type AppState<S> = Arc<S>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Confirmation body returned by the delete endpoints
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

/// POST /flight/{airline_code}/flight
/// A `flightNumber` in the body updates that flight instead of creating one
pub async fn create_flight<S: Store>(
    State(store): State<AppState<S>>,
    ApiPath(airline_code): ApiPath<AirlineCode>,
    ApiJson(flight_data): ApiJson<FlightData>,
) -> Result<(StatusCode, Json<FlightData>), ApiError> {
    log::info!(
        "Creating flight {:?} for airline {}",
        flight_data.flight_number,
        airline_code
    );
    let request = Upsert::from_optional(flight_data.flight_number);
    let flight = FlightTracker::upsert_flight(&*store, request, &flight_data, airline_code)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(flight)))
}

/// PUT /flight/{airline_code}/flight/{flight_number}
/// The path flight number wins over any number in the body
pub async fn update_flight<S: Store>(
    State(store): State<AppState<S>>,
    ApiPath((airline_code, flight_number)): ApiPath<(AirlineCode, FlightNumber)>,
    ApiJson(mut flight_data): ApiJson<FlightData>,
) -> Result<Json<FlightData>, ApiError> {
    log::info!(
        "Updating flight {} for airline {}",
        flight_number,
        airline_code
    );
    flight_data.flight_number = Some(flight_number);
    let flight = FlightTracker::upsert_flight(
        &*store,
        Upsert::Update(flight_number),
        &flight_data,
        airline_code,
    )
    .await
    .map_err(error_response)?;
    Ok(Json(flight))
}

/// POST /flight/airline
pub async fn create_airline<S: Store>(
    State(store): State<AppState<S>>,
    ApiJson(airline): ApiJson<FlightAirline>,
) -> Result<(StatusCode, Json<FlightAirline>), ApiError> {
    log::info!("Creating airline {:?}", airline.airline_name);
    let request = Upsert::from_optional(airline.airline_code);
    let saved = FlightTracker::upsert_airline(&*store, request, &airline)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /flight/airline/{airline_code}
pub async fn get_airline<S: Store>(
    State(store): State<AppState<S>>,
    ApiPath(airline_code): ApiPath<AirlineCode>,
) -> Result<Json<AirlineDetail>, ApiError> {
    log::info!("Retrieving airline {}", airline_code);
    FlightTracker::retrieve_airline(&*store, airline_code)
        .await
        .map(Json)
        .map_err(error_response)
}

/// POST /flight/passenger/{flight_number}
/// A `passengerId` in the body books that existing passenger, replacing its fields
pub async fn add_passenger<S: Store>(
    State(store): State<AppState<S>>,
    ApiPath(flight_number): ApiPath<FlightNumber>,
    ApiJson(passenger): ApiJson<FlightPassenger>,
) -> Result<(StatusCode, Json<FlightPassenger>), ApiError> {
    log::info!(
        "Adding passenger {:?} to flight {}",
        passenger.passenger_first_name,
        flight_number
    );
    let request = Upsert::from_optional(passenger.passenger_id);
    let saved = FlightTracker::attach_passenger(&*store, request, &passenger, flight_number)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /flight/passenger/{passenger_id}
pub async fn get_passenger<S: Store>(
    State(store): State<AppState<S>>,
    ApiPath(passenger_id): ApiPath<PassengerId>,
) -> Result<Json<PassengerDetail>, ApiError> {
    log::info!("Retrieving passenger {}", passenger_id);
    FlightTracker::retrieve_passenger(&*store, passenger_id)
        .await
        .map(Json)
        .map_err(error_response)
}

/// GET /flight/flightNumbers
pub async fn list_flights<S: Store>(
    State(store): State<AppState<S>>,
) -> Result<Json<Vec<FlightData>>, ApiError> {
    log::info!("Listing all flights");
    let roster = FlightTracker::retrieve_all_flights(&*store)
        .await
        .map_err(error_response)?;
    Ok(Json(roster.iter().collect()))
}

/// PUT and DELETE on the flight collection
pub async fn flight_collection_unsupported() -> Result<Json<FlightData>, ApiError> {
    Err(error_response(TrackerError::UnsupportedOperation(
        "flights must be changed one flight number at a time".to_string(),
    )))
}

/// GET /flight/flight/{flight_number}
pub async fn get_flight<S: Store>(
    State(store): State<AppState<S>>,
    ApiPath(flight_number): ApiPath<FlightNumber>,
) -> Result<Json<FlightData>, ApiError> {
    log::info!("Retrieving flight {}", flight_number);
    FlightTracker::retrieve_flight(&*store, flight_number)
        .await
        .map(Json)
        .map_err(error_response)
}

/// DELETE /flight/flight/{flight_number}
pub async fn delete_flight<S: Store>(
    State(store): State<AppState<S>>,
    ApiPath(flight_number): ApiPath<FlightNumber>,
) -> Result<Json<MessageResponse>, ApiError> {
    log::info!("Deleting flight {}", flight_number);
    FlightTracker::delete_flight(&*store, flight_number)
        .await
        .map_err(error_response)?;
    Ok(Json(MessageResponse::new(format!(
        "Deletion of flight with flight number: {} was successful",
        flight_number
    ))))
}

/// DELETE /flight/airline/{airline_code}
pub async fn delete_airline<S: Store>(
    State(store): State<AppState<S>>,
    ApiPath(airline_code): ApiPath<AirlineCode>,
) -> Result<Json<MessageResponse>, ApiError> {
    log::info!("Deleting airline {}", airline_code);
    FlightTracker::delete_airline(&*store, airline_code)
        .await
        .map_err(error_response)?;
    Ok(Json(MessageResponse::new(format!(
        "Deletion of airline with airline code: {} was successful",
        airline_code
    ))))
}

/// DELETE /flight/passenger/{passenger_id}
pub async fn delete_passenger<S: Store>(
    State(store): State<AppState<S>>,
    ApiPath(passenger_id): ApiPath<PassengerId>,
) -> Result<Json<MessageResponse>, ApiError> {
    log::info!("Deleting passenger {}", passenger_id);
    FlightTracker::delete_passenger(&*store, passenger_id)
        .await
        .map_err(error_response)?;
    Ok(Json(MessageResponse::new(format!(
        "Deletion of passenger with passenger id: {} was successful",
        passenger_id
    ))))
}
