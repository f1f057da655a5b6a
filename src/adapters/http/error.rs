//! Mapping from domain errors to HTTP responses.
//!
//! Every handler returns `Result<_, ApiError>`. The body is always
//! `{ "code": "...", "message": "...", "details": {} }`.

use std::collections::HashMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::foundation::{
    CustomerId, DomainError, ErrorCode, SubscriptionId, ValidationError,
};

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    pub details: HashMap<String, String>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }
}

/// API error type that converts domain errors to HTTP responses.
#[derive(Debug)]
pub struct ApiError(DomainError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        status_for(self.0.code)
    }

    pub fn code(&self) -> ErrorCode {
        self.0.code
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::CustomerNotFound
        | ErrorCode::SubscriptionNotFound
        | ErrorCode::AccountNotFound => StatusCode::NOT_FOUND,
        ErrorCode::InvalidStateTransition
        | ErrorCode::CustomerHasSubscriptions
        | ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::PaymentProviderError => StatusCode::BAD_GATEWAY,
        ErrorCode::DatabaseError | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let err = self.0;

        // Server-side failures are logged in full and answered generically.
        let body = if status.is_server_error() && status != StatusCode::BAD_GATEWAY {
            tracing::error!(code = %err.code, error = %err.message, "request failed");
            ErrorResponse::new(err.code.to_string(), "Internal server error")
        } else {
            ErrorResponse {
                code: err.code.to_string(),
                message: err.message,
                details: err.details,
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Path ids that do not parse cannot name an existing record.
pub fn customer_id(raw: &str) -> Result<CustomerId, ApiError> {
    raw.parse().map_err(|_| {
        DomainError::new(
            ErrorCode::CustomerNotFound,
            format!("Customer not found: {}", raw),
        )
        .into()
    })
}

pub fn subscription_id(raw: &str) -> Result<SubscriptionId, ApiError> {
    raw.parse().map_err(|_| {
        DomainError::new(
            ErrorCode::SubscriptionNotFound,
            format!("Subscription not found: {}", raw),
        )
        .into()
    })
}
