//! Error handling for the POS Inventory Platform
//!
//! Maps service-layer failures to consistent JSON error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Party not found: {0}")]
    PartyNotFound(String),

    // Business logic errors
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: uuid::Uuid,
        available: i64,
        requested: i64,
    },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Transaction timed out")]
    TransactionTimeout,

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut => AppError::TransactionTimeout,
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                // unique_violation
                Some("23505") => {
                    AppError::DuplicateEntry(db_err.constraint().unwrap_or("record").to_string())
                }
                // query_canceled (statement timeout)
                Some("57014") => AppError::TransactionTimeout,
                _ => AppError::DatabaseError(err),
            },
            _ => AppError::DatabaseError(err),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_ENTRY".to_string(),
                    message: format!("A record with this {} already exists", field),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{} not found", resource),
                    field: None,
                },
            ),
            AppError::PartyNotFound(party) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "PARTY_NOT_FOUND".to_string(),
                    message: format!("{} not found", party),
                    field: None,
                },
            ),
            AppError::InsufficientStock {
                product_id,
                available,
                requested,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INSUFFICIENT_STOCK".to_string(),
                    message: format!(
                        "Insufficient stock for product {}: available {}, requested {}",
                        product_id, available, requested
                    ),
                    field: None,
                },
            ),
            AppError::InvalidState(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INVALID_STATE".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::TransactionTimeout => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "TRANSACTION_TIMEOUT".to_string(),
                    message: "The operation timed out, please retry".to_string(),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message: "A database error occurred".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_maps_to_transaction_timeout() {
        let err = AppError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AppError::TransactionTimeout));
    }

    #[test]
    fn other_sqlx_errors_stay_database_errors() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::DatabaseError(_)));
    }
}
