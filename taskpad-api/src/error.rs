/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// Handlers return `Result<T, ApiError>` which converts to the right status
/// code automatically.
///
/// # Response bodies
///
/// Validation failures (400) carry a field-keyed JSON body naming every
/// invalid field:
///
/// ```json
/// { "title": ["This field may not be blank."], "is_completed": ["Must be a valid boolean."] }
/// ```
///
/// 401 and 404 responses deliberately carry empty bodies: a 404 for a task
/// owned by someone else must be byte-identical to a 404 for a task that
/// never existed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400) - malformed body, not tied to a field
    BadRequest(String),

    /// Unauthorized (401) - missing/invalid/expired credential
    Unauthorized(String),

    /// Not found (404) - missing resource, or one owned by another user
    NotFound,

    /// Validation failure (400) - per-field error messages
    Validation(Vec<FieldError>),

    /// Internal server error (500)
    Internal(String),
}

/// A single field-level validation error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

impl FieldError {
    /// Creates a field error
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl ApiError {
    /// Creates a validation error for a single field
    pub fn validation(field: &str, message: &str) -> Self {
        ApiError::Validation(vec![FieldError::new(field, message)])
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound => write!(f, "Not found"),
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Folds field errors into a field-keyed JSON object
///
/// Multiple errors on the same field accumulate into one array.
fn field_error_body(errors: &[FieldError]) -> serde_json::Value {
    let mut body = serde_json::Map::new();
    for err in errors {
        let entry = body.entry(err.field.clone()).or_insert_with(|| json!([]));
        if let Some(messages) = entry.as_array_mut() {
            messages.push(json!(err.message));
        }
    }
    serde_json::Value::Object(body)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(field_error_body(&errors))).into_response()
            }
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "detail": msg }))).into_response()
            }
            ApiError::Unauthorized(msg) => {
                tracing::debug!("Unauthorized request: {}", msg);
                StatusCode::UNAUTHORIZED.into_response()
            }
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::Internal(msg) => {
                // Log internal errors but never expose details to clients
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            sqlx::Error::Database(db_err) => {
                // Unique violations surface as validation errors on the field
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("username") {
                        return ApiError::validation(
                            "username",
                            "A user with that username already exists.",
                        );
                    }
                }
                ApiError::Internal(format!("Database error: {}", db_err))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert JWT errors to API errors
impl From<taskpad_shared::auth::jwt::JwtError> for ApiError {
    fn from(err: taskpad_shared::auth::jwt::JwtError) -> Self {
        match err {
            taskpad_shared::auth::jwt::JwtError::Expired => {
                ApiError::Unauthorized("Token expired".to_string())
            }
            _ => ApiError::Unauthorized(format!("Invalid token: {}", err)),
        }
    }
}

/// Convert password errors to API errors
impl From<taskpad_shared::auth::password::PasswordError> for ApiError {
    fn from(err: taskpad_shared::auth::password::PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}
