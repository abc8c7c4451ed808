/// Registration and token endpoints
///
/// # Endpoints
///
/// - `POST /api/register/` - Create a new account (does not authenticate)
/// - `POST /api/token/` - Login, returns access + refresh tokens
/// - `POST /api/token/refresh/` - Exchange a refresh token for a new access token
///
/// Request bodies are taken as raw JSON rather than typed structs so that
/// every missing or malformed field can be reported in one field-keyed 400
/// response instead of failing on the first deserialization error.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, FieldError},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskpad_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use uuid::Uuid;
use validator::ValidateEmail;

/// Public representation of a user
///
/// Never includes password material.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID
    pub id: Uuid,

    /// Username
    pub username: String,

    /// Email address
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// Token pair issued on login
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPairResponse {
    /// Access token (1 hour)
    pub access: String,

    /// Refresh token (7 days)
    pub refresh: String,
}

/// Response for a token refresh
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// New access token (1 hour)
    pub access: String,
}

/// Pulls a required string field out of a JSON body, accumulating errors
///
/// Missing, null, empty, and non-string values each produce a field error;
/// the caller keeps collecting so one response can name every bad field.
fn require_string(body: &Value, field: &str, errors: &mut Vec<FieldError>) -> Option<String> {
    match body.get(field) {
        None | Some(Value::Null) => {
            errors.push(FieldError::new(field, "This field is required."));
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            errors.push(FieldError::new(field, "This field may not be blank."));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new(field, "Not a valid string."));
            None
        }
    }
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/register/
/// Content-Type: application/json
///
/// { "username": "alice", "email": "alice@example.com", "password": "s3cret-pass" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: field-keyed errors for each missing/invalid field,
///   including `username` when the name is already taken
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    if !body.is_object() {
        return Err(ApiError::BadRequest("Expected a JSON object".to_string()));
    }

    let mut errors = Vec::new();
    let username = require_string(&body, "username", &mut errors);
    let email = require_string(&body, "email", &mut errors);
    let password = require_string(&body, "password", &mut errors);

    if let Some(ref email) = email {
        if !email.validate_email() {
            errors.push(FieldError::new("email", "Enter a valid email address."));
        }
    }

    if let Some(ref username) = username {
        if User::username_exists(&state.db, username).await? {
            errors.push(FieldError::new(
                "username",
                "A user with that username already exists.",
            ));
        }
    }

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    // All three are Some once errors is empty
    let (Some(username), Some(email), Some(password)) = (username, email, password) else {
        return Err(ApiError::Internal(
            "registration field validation invariant violated".to_string(),
        ));
    };

    let password_hash = password::hash_password(&password)?;

    // A concurrent registration can still hit the unique constraint here;
    // the sqlx error conversion turns it into the same `username` error.
    let user = User::create(
        &state.db,
        CreateUser {
            username,
            email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Login endpoint
///
/// Verifies credentials and issues an access/refresh token pair. Unknown
/// usernames and wrong passwords are deliberately indistinguishable.
///
/// # Endpoint
///
/// ```text
/// POST /api/token/
/// Content-Type: application/json
///
/// { "username": "alice", "password": "s3cret-pass" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing fields
/// - `401 Unauthorized`: invalid credentials
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<TokenPairResponse>> {
    if !body.is_object() {
        return Err(ApiError::BadRequest("Expected a JSON object".to_string()));
    }

    let mut errors = Vec::new();
    let username = require_string(&body, "username", &mut errors);
    let password = require_string(&body, "password", &mut errors);

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    let (Some(username), Some(password)) = (username, password) else {
        return Err(ApiError::Internal(
            "login field validation invariant violated".to_string(),
        ));
    };

    let user = User::find_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    let valid = password::verify_password(&password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let access_claims = jwt::Claims::new(user.id, jwt::TokenType::Access);
    let refresh_claims = jwt::Claims::new(user.id, jwt::TokenType::Refresh);

    let access = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    Ok(Json(TokenPairResponse { access, refresh }))
}

/// Token refresh endpoint
///
/// # Endpoint
///
/// ```text
/// POST /api/token/refresh/
/// Content-Type: application/json
///
/// { "refresh": "eyJ..." }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing `refresh` field
/// - `401 Unauthorized`: invalid, expired, or non-refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<RefreshResponse>> {
    if !body.is_object() {
        return Err(ApiError::BadRequest("Expected a JSON object".to_string()));
    }

    let mut errors = Vec::new();
    let Some(token) = require_string(&body, "refresh", &mut errors) else {
        return Err(ApiError::Validation(errors));
    };

    let access = jwt::refresh_access_token(&token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_require_string_missing_and_null() {
        let body = json!({ "email": null });
        let mut errors = Vec::new();

        assert!(require_string(&body, "username", &mut errors).is_none());
        assert!(require_string(&body, "email", &mut errors).is_none());
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.message == "This field is required."));
    }

    #[test]
    fn test_require_string_blank_and_wrong_type() {
        let body = json!({ "username": "", "password": 42 });
        let mut errors = Vec::new();

        assert!(require_string(&body, "username", &mut errors).is_none());
        assert!(require_string(&body, "password", &mut errors).is_none());
        assert_eq!(errors[0].message, "This field may not be blank.");
        assert_eq!(errors[1].message, "Not a valid string.");
    }

    #[test]
    fn test_require_string_present() {
        let body = json!({ "username": "alice" });
        let mut errors = Vec::new();

        assert_eq!(
            require_string(&body, "username", &mut errors).as_deref(),
            Some("alice")
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_email_syntax_check() {
        assert!("alice@example.com".validate_email());
        assert!(!"invalid-email".validate_email());
    }
}
