use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::api::handlers;
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Airlines
        .route("/flight/airline", post(handlers::create_airline::<S>))
        .route(
            "/flight/airline/:airline_code",
            get(handlers::get_airline::<S>).delete(handlers::delete_airline::<S>),
        )
        // Flights owned by an airline
        .route(
            "/flight/:airline_code/flight",
            post(handlers::create_flight::<S>),
        )
        .route(
            "/flight/:airline_code/flight/:flight_number",
            put(handlers::update_flight::<S>),
        )
        // Flights
        .route(
            "/flight/flightNumbers",
            get(handlers::list_flights::<S>)
                .put(handlers::flight_collection_unsupported)
                .delete(handlers::flight_collection_unsupported),
        )
        .route(
            "/flight/flight/:flight_number",
            get(handlers::get_flight::<S>).delete(handlers::delete_flight::<S>),
        )
        // Passengers: POST books onto the flight named in the path,
        // GET and DELETE address the passenger itself
        .route(
            "/flight/passenger/:id",
            post(handlers::add_passenger::<S>)
                .get(handlers::get_passenger::<S>)
                .delete(handlers::delete_passenger::<S>),
        )
}
