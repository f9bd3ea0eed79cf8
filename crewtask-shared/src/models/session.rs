/// Session model and database operations
///
/// One row per live login. The primary key is the SHA-256 digest of the
/// bearer token, so resolving a presented token is a single indexed
/// lookup and the raw token never touches the database.
///
/// Sessions have no expiry column: a session ends when its row is
/// deleted, and a user may hold any number of concurrent sessions.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sessions (
///     token_hash TEXT PRIMARY KEY,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::user::User;

/// Session model representing one live login
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// SHA-256 hex digest of the bearer token (never the raw token)
    pub token_hash: String,

    /// User this session belongs to
    pub user_id: Uuid,

    /// When the session was created (login time)
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session row for a freshly issued token digest
    pub async fn create(pool: &PgPool, token_hash: &str, user_id: Uuid) -> Result<Self> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (token_hash, user_id)
            VALUES ($1, $2)
            RETURNING token_hash, user_id, created_at
            "#,
        )
        .bind(token_hash)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    /// Deletes the session with the given token digest
    ///
    /// Returns `true` if a row was deleted, `false` if no such session
    /// existed. Callers treating revocation as idempotent ignore the flag.
    pub async fn delete_by_hash(pool: &PgPool, token_hash: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Resolves a token digest to the owning user in one lookup
    ///
    /// Returns `None` when no session row matches (revoked or never
    /// issued).
    pub async fn find_user_by_hash(pool: &PgPool, token_hash: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.first_name, u.last_name, u.password_hash,
                   u.status, u.created_at, u.updated_at
            FROM users u
            JOIN sessions s ON s.user_id = u.id
            WHERE s.token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Counts live sessions for a user
    pub async fn count_for_user(pool: &PgPool, user_id: Uuid) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
