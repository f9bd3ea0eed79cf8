/// Credential and session operations
///
/// The four account-facing operations: signup, login, logout, and
/// resolving a presented bearer token back to its user. This module owns
/// the orchestration; hashing lives in [`super::password`], token
/// generation in [`super::token`], and row access in the models.
///
/// Login failure is deliberately flat: an unknown email and a wrong
/// password both come back as `Error::InvalidCredentials`, with nothing
/// else observable to separate the two cases.
///
/// # Example
///
/// ```no_run
/// use crewtask_shared::auth::session::{self, LoginData, SignupData};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let user = session::signup(
///     &pool,
///     SignupData {
///         email: "ada@example.com".to_string(),
///         first_name: "Ada".to_string(),
///         last_name: "Lovelace".to_string(),
///         password: "correct horse battery".to_string(),
///     },
/// )
/// .await?;
///
/// let (_, token) = session::login(
///     &pool,
///     LoginData {
///         email: "ada@example.com".to_string(),
///         password: "correct horse battery".to_string(),
///     },
/// )
/// .await?;
///
/// let resolved = session::resolve(&pool, &token).await?;
/// assert_eq!(resolved.id, user.id);
/// # Ok(())
/// # }
/// ```
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};
use validator::Validate;

use crate::auth::{password, token};
use crate::error::{Error, Result};
use crate::models::session::Session;
use crate::models::user::{CreateUser, User};

/// Validated signup input
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupData {
    /// Email address; must be well-formed and not yet registered
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Given name
    #[validate(length(min = 1, message = "First name must not be empty"))]
    pub first_name: String,

    /// Family name
    #[validate(length(min = 1, message = "Last name must not be empty"))]
    pub last_name: String,

    /// Plaintext password, hashed before it reaches the store
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Validated login input
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginData {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Plaintext password
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Registers a new account
///
/// Validates the input, hashes the password with Argon2id, and inserts the
/// user. The returned user carries the hash internally but it must never
/// be serialized out to clients.
///
/// # Errors
///
/// - `Error::Validation` when a field fails shape checks
/// - `Error::DuplicateEmail` when the email is already registered
/// - `Error::Password` / `Error::Store` on internal failure
pub async fn signup(pool: &PgPool, data: SignupData) -> Result<User> {
    data.validate().map_err(Error::from_validation_errors)?;

    let password_hash = password::hash_password(&data.password)?;

    let user = User::create(
        pool,
        CreateUser {
            email: data.email,
            first_name: data.first_name,
            last_name: data.last_name,
            password_hash,
        },
    )
    .await?;

    info!(user_id = %user.id, "New user signed up");

    Ok(user)
}

/// Authenticates a user and opens a session
///
/// On success returns the user and the RAW bearer token; the token is
/// shown exactly once and only its digest is stored. Each login opens an
/// independent session, so a user may be logged in from several clients.
///
/// # Errors
///
/// - `Error::Validation` when the input is malformed
/// - `Error::InvalidCredentials` for unknown email or wrong password,
///   indistinguishably
pub async fn login(pool: &PgPool, data: LoginData) -> Result<(User, String)> {
    data.validate().map_err(Error::from_validation_errors)?;

    let user = match User::find_by_email(pool, &data.email).await? {
        Some(user) => user,
        None => {
            warn!("Login attempt for unknown email");
            return Err(Error::InvalidCredentials);
        }
    };

    if !password::verify_password(&data.password, &user.password_hash)? {
        warn!(user_id = %user.id, "Login attempt with wrong password");
        return Err(Error::InvalidCredentials);
    }

    let (raw_token, token_hash) = token::generate_token();
    Session::create(pool, &token_hash, user.id).await?;

    info!(user_id = %user.id, "User logged in");

    Ok((user, raw_token))
}

/// Revokes the session behind a token
///
/// Idempotent: revoking an unknown or already-revoked token succeeds
/// silently. Revocation is the only way a session ends.
pub async fn logout(pool: &PgPool, token: &str) -> Result<()> {
    let deleted = Session::delete_by_hash(pool, &token::hash_token(token)).await?;

    if deleted {
        info!("Session revoked");
    }

    Ok(())
}

/// Maps a presented bearer token to its live user
///
/// Malformed tokens are rejected without a database round trip.
///
/// # Errors
///
/// Returns `Error::Unauthenticated` when the token is malformed, revoked,
/// or was never issued.
pub async fn resolve(pool: &PgPool, token: &str) -> Result<User> {
    if !token::validate_token_format(token) {
        return Err(Error::Unauthenticated);
    }

    match Session::find_user_by_hash(pool, &token::hash_token(token)).await? {
        Some(user) => Ok(user),
        None => Err(Error::Unauthenticated),
    }
}
