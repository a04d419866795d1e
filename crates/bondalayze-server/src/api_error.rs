//! Mapping of domain errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bondalayze_core::BondaError;
use serde::Serialize;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// A [`BondaError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub BondaError);

impl From<BondaError> for ApiError {
    fn from(err: BondaError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        status_for(&self.0)
    }
}

pub fn status_for(err: &BondaError) -> StatusCode {
    match err {
        BondaError::NoInputProvided
        | BondaError::TooManyImages { .. }
        | BondaError::InvalidImage(_)
        | BondaError::ImageDecode(_)
        | BondaError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        BondaError::Unauthorized => StatusCode::UNAUTHORIZED,
        BondaError::NotFound { .. } => StatusCode::NOT_FOUND,
        BondaError::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
        BondaError::Upstream(_) => StatusCode::BAD_GATEWAY,
        BondaError::AnalysisSchema { .. }
        | BondaError::DataAccess(_)
        | BondaError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("[Api] {} - {}", status, self.0);
        } else {
            tracing::debug!("[Api] {} - {}", status, self.0);
        }

        let body = ErrorBody {
            error: self.0.public_message(),
        };
        (status, Json(body)).into_response()
    }
}
