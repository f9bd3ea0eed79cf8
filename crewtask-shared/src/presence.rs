/// Presence tracking
///
/// The source of truth for "is this user online" is live session
/// existence: a user is ONLINE iff at least one session row exists for
/// them. The `users.status` column is only a cache, rewritten in bulk by
/// [`reset_all_status`] and never consulted for live answers.
///
/// # Example
///
/// ```no_run
/// use crewtask_shared::presence::{self, PresenceStatus};
/// # use sqlx::PgPool;
/// # use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let status = presence::get_status(&pool, user_id).await?;
/// if status == PresenceStatus::Online {
///     println!("online");
/// }
/// # Ok(())
/// # }
/// ```
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Presence of a single user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PresenceStatus {
    /// At least one live session exists
    Online,

    /// No live session exists
    Offline,
}

impl PresenceStatus {
    /// Converts status to its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            PresenceStatus::Online => "ONLINE",
            PresenceStatus::Offline => "OFFLINE",
        }
    }

    /// Derives a status from session existence
    pub fn from_online(online: bool) -> Self {
        if online {
            PresenceStatus::Online
        } else {
            PresenceStatus::Offline
        }
    }
}

/// Row counts reported by a reset-status sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceReset {
    /// Users whose cached status was set to OFFLINE (everyone)
    pub marked_offline: u64,

    /// Users subsequently marked ONLINE because they hold a session
    pub marked_online: u64,
}

/// Returns the live presence of a user
///
/// One round trip: the user row and session existence are checked in the
/// same query.
///
/// # Errors
///
/// Returns `Error::NotFound` when the user does not exist.
pub async fn get_status(pool: &PgPool, user_id: Uuid) -> Result<PresenceStatus> {
    let row: Option<(bool,)> = sqlx::query_as(
        r#"
        SELECT EXISTS (SELECT 1 FROM sessions s WHERE s.user_id = u.id) AS online
        FROM users u
        WHERE u.id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some((online,)) => Ok(PresenceStatus::from_online(online)),
        None => Err(Error::NotFound("user")),
    }
}

/// Rebuilds the cached presence column for every user
///
/// In one transaction: every user's cached status is set to OFFLINE, then
/// ONLINE for exactly the users holding at least one live session. Running
/// inside a transaction means a crash can never leave the cache half
/// rewritten, and concurrent readers see either the old sweep or the new
/// one.
///
/// The sweep writes only the `status` column; `updated_at` is left alone
/// so cache rebuilds do not disturb update-time orderings.
pub async fn reset_all_status(pool: &PgPool) -> Result<PresenceReset> {
    let mut tx = pool.begin().await?;

    let marked_offline = sqlx::query("UPDATE users SET status = 'OFFLINE'")
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let marked_online = sqlx::query(
        r#"
        UPDATE users SET status = 'ONLINE'
        WHERE id IN (SELECT DISTINCT user_id FROM sessions)
        "#,
    )
    .execute(&mut *tx)
    .await?
    .rows_affected();

    tx.commit().await?;

    info!(marked_offline, marked_online, "Presence cache rebuilt");

    Ok(PresenceReset {
        marked_offline,
        marked_online,
    })
}
