use crate::error::WillItRainError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use serde::Serialize;

pub const LOCATION_NOT_FOUND: &str = "Location not found";

/// Error half of every handler. Rendered as `{"detail": ...}` with a matching status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
    city: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    detail: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<&'a str>,
}

impl ApiError {
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: detail.into(),
            city: None,
        }
    }

    pub fn with_city(mut self, city: &str) -> Self {
        self.city = Some(city.to_string());
        self
    }

    /// Maps a failure while serving `city`: unresolved city -> 404, bad input -> 400,
    /// everything else -> 500 carrying the error message.
    pub fn for_city(err: WillItRainError, city: &str) -> Self {
        if err.is_not_found() {
            return Self::not_found(format!("{LOCATION_NOT_FOUND}: {city}")).with_city(city);
        }
        Self::from(err)
    }
}

impl From<WillItRainError> for ApiError {
    fn from(err: WillItRainError) -> Self {
        let status = if err.is_not_found() {
            StatusCode::NOT_FOUND
        } else if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            error!("Request failed: {:?}", err);
        } else {
            warn!("Rejected request: {}", err);
        }
        Self {
            status,
            detail: err.to_string(),
            city: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: &self.detail,
            city: self.city.as_deref(),
        };
        (self.status, Json(body)).into_response()
    }
}
