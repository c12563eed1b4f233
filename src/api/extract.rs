use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{request::Parts, StatusCode},
    response::Json,
};
use serde::de::DeserializeOwned;

use crate::api::error::{ApiError, ErrorResponse};

/// JSON body extractor whose rejections use the `{"error": ...}` body
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejections use the `{"error": ...}` body
pub struct ApiPath<T>(pub T);

fn rejection_response(status: StatusCode, message: String) -> ApiError {
    log::warn!("Request rejected: {}", message);
    (status, Json(ErrorResponse::new(&message)))
}

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(rejection_response(rejection.status(), rejection.body_text())),
        }
    }
}

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(rejection) => Err(rejection_response(rejection.status(), rejection.body_text())),
        }
    }
}
