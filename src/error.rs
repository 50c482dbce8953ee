//! Application error type and its HTTP representation.
//!
//! Every fallible operation in the service returns [`AppError`]. The enum maps
//! one-to-one onto HTTP status codes and renders as a JSON body:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Short link not found", "details": { "code": "abc" } } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

/// Unique constraint guarding `url_mappings.short_code`.
const SHORT_CODE_CONSTRAINT: &str = "url_mappings_short_code_key";

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload returned to API clients.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors surfaced by services, repositories and handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input rejected at the boundary (400).
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Short code absent or expired (404). The two cases are deliberately
    /// indistinguishable to callers.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// Requested alias is already reserved (409).
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// Store or runtime failure (500).
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// The alias a caller asked for is already taken.
    pub fn alias_conflict(alias: &str) -> Self {
        Self::conflict(
            format!("Alias '{alias}' is already in use"),
            json!({ "alias": alias }),
        )
    }

    /// No live mapping exists for the code.
    pub fn mapping_not_found(code: &str) -> Self {
        Self::not_found("Short link not found", json!({ "code": code }))
    }

    /// Returns `true` for [`AppError::Conflict`].
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            Self::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
            Self::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    /// Converts the error into its client-facing payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (_, code) = self.parts();
        let (message, details) = match self {
            Self::Validation { message, details }
            | Self::NotFound { message, details }
            | Self::Conflict { message, details }
            | Self::Internal { message, details } => (message.clone(), details.clone()),
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, _) = self.parts();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error() {
            if db.is_unique_violation() {
                let constraint = db.constraint().map(str::to_owned);
                let message = if constraint.as_deref() == Some(SHORT_CODE_CONSTRAINT) {
                    "Short code is already in use"
                } else {
                    "Unique constraint violation"
                };
                return AppError::conflict(message, json!({ "constraint": constraint }));
            }
        }

        tracing::error!(error = %e, "Database error");
        AppError::internal("Database error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_default();
        AppError::bad_request("Request validation failed", details)
    }
}
