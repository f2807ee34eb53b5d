//! Standardized API error responses for the `RequestHandler` surface (§6).

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use ts_rs::TS;

use crate::core::error::CoreError;

/// Machine-readable error code for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ApiErrorCode {
    BadRequest,
    InvalidPreferences,
    InternalError,
}

/// Standardized error response for all API endpoints.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::BadRequest, message)
    }

    fn status_code(&self) -> StatusCode {
        match self.code {
            ApiErrorCode::BadRequest | ApiErrorCode::InvalidPreferences => StatusCode::BAD_REQUEST,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self)).into_response()
    }
}

/// Maps the core's error taxonomy (§7) onto HTTP responses. Only
/// [`CoreError::InvalidPreferences`] and [`CoreError::InvalidRequest`] are
/// caller mistakes (400); everything else is a server-side fault (500) --
/// the search itself never returns `CoreError` for infeasibility or
/// timeout, those are [`crate::core::Outcome`] variants, not errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidPreferences(msg) => Self::new(ApiErrorCode::InvalidPreferences, msg),
            CoreError::InvalidRequest(msg) => Self::bad_request(msg),
            CoreError::CatalogFailed(msg) => {
                tracing::error!(error = %msg, "catalog lookup failed");
                Self::new(ApiErrorCode::InternalError, "catalog lookup failed")
            }
            CoreError::Invariant(msg) => {
                tracing::error!(error = %msg, "internal invariant violated");
                Self::new(ApiErrorCode::InternalError, "internal error")
            }
        }
    }
}
