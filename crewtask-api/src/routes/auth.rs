/// Authentication endpoints
///
/// This module provides account and session endpoints:
/// - Signup
/// - Login
/// - Logout
/// - Current user lookup
///
/// # Endpoints
///
/// - `POST /v1/auth/signup` - Create a new account
/// - `POST /v1/auth/login` - Login and get a session token
/// - `DELETE /v1/auth/logout` - Revoke the presented session token
/// - `GET /v1/auth/me` - Return the authenticated user
use crate::{
    app::{AppState, CurrentUser},
    error::ApiResult,
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use crewtask_shared::{
    auth::session::{self, LoginData, SignupData},
    models::user::User,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Signup request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Email address
    pub email: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Plaintext password (hashed server-side, never stored)
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email address
    pub email: String,

    /// Plaintext password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Opaque session token; send as `Authorization: Bearer <token>`
    pub token: String,
}

/// Public view of a user account
///
/// Never exposes the password hash. The avatar URL is derived from the
/// email address, not stored.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// User ID
    pub id: String,

    /// Email address
    pub email: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Gravatar URL derived from the email address
    pub avatar_url: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            avatar_url: gravatar_url(&user.email),
        }
    }
}

/// Builds a Gravatar URL for an email address
///
/// Uses the SHA-256 variant of the Gravatar API, hashing the trimmed,
/// lowercased address.
pub(crate) fn gravatar_url(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.trim().to_lowercase().as_bytes());
    let digest = hasher.finalize();

    format!("https://www.gravatar.com/avatar/{:x}?d=identicon", digest)
}

/// Create a new account
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/signup
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "firstName": "Ada",
///   "lastName": "Lovelace",
///   "password": "correct horse battery"
/// }
/// ```
///
/// # Response
///
/// `201 Created` with the public view of the new user.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `409 Conflict`: Email already registered
/// - `500 Internal Server Error`: Server error
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = session::signup(
        &state.db,
        SignupData {
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            password: req.password,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// Login and obtain a session token
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "correct horse battery"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "token": "crew_..."
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `401 Unauthorized`: Invalid credentials (unknown email and wrong
///   password are not distinguished)
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (_user, token) = session::login(
        &state.db,
        LoginData {
            email: req.email,
            password: req.password,
        },
    )
    .await?;

    Ok(Json(LoginResponse { token }))
}

/// Revoke the presented session token
///
/// Revoking is idempotent: a token that is unknown or already revoked
/// still yields `204 No Content`.
///
/// # Endpoint
///
/// ```text
/// DELETE /v1/auth/logout
/// Authorization: Bearer crew_...
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing Authorization header
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<StatusCode> {
    let token = crate::app::bearer_token(&headers)?;

    session::logout(&state.db, token).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Return the authenticated user
///
/// # Endpoint
///
/// ```text
/// GET /v1/auth/me
/// Authorization: Bearer crew_...
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid session token
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}
