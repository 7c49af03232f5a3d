use axum::{
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{
    services::places_client::types::places_service_error::PlacesServiceError,
    utils::rest_caller::CallerError,
};

#[derive(Debug)]
pub struct AppError {
    pub code: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }
}

impl From<PlacesServiceError> for AppError {
    fn from(e: PlacesServiceError) -> Self {
        match e {
            PlacesServiceError::MissingEntity => AppError::new(StatusCode::BAD_REQUEST, e.to_string()),
            PlacesServiceError::Cancelled | PlacesServiceError::Caller(CallerError::Cancelled) => {
                AppError::new(StatusCode::SERVICE_UNAVAILABLE, "Server is shutting down")
            }
            _ => {
                error!("Failed to fetch locations: {}", e);
                AppError::new(StatusCode::BAD_GATEWAY, "Failed to fetch locations")
            }
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct AppErrorBody {
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response<Body> {
        (
            self.code,
            Json(AppErrorBody {
                message: self.message,
            }),
        )
            .into_response()
    }
}
