/// Assignment model and database operations
///
/// Many-to-many join between users and tasks. The composite primary key is
/// the uniqueness guarantee: assigning the same user to the same task twice
/// leaves exactly one row, enforced by the store rather than by callers
/// remembering to check first.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE task_assignees (
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (user_id, task_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use crewtask_shared::models::assignment::Assignment;
/// # use sqlx::PgPool;
/// # use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid, task_id: Uuid)
/// #     -> Result<(), Box<dyn std::error::Error>> {
/// // Second call is a no-op, not an error
/// Assignment::assign(&pool, user_id, task_id).await?;
/// Assignment::assign(&pool, user_id, task_id).await?;
///
/// let assignees = Assignment::list_assignees(&pool, task_id).await?;
/// assert_eq!(assignees.len(), 1);
/// # Ok(())
/// # }
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::user::UserSummary;

/// Assignment model linking a user to a task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Assignment {
    /// Assigned user
    pub user_id: Uuid,

    /// Task the user is assigned to
    pub task_id: Uuid,

    /// When the assignment was made
    pub created_at: DateTime<Utc>,
}

impl Assignment {
    /// Assigns a user to a task, idempotently
    ///
    /// Returns `true` when a new assignment row was inserted, `false` when
    /// the pair was already assigned (the conflict is swallowed by the
    /// store, not surfaced as an error).
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` naming the missing side when the user or
    /// task does not exist (foreign key violation), `Error::Store` for
    /// other database failures.
    pub async fn assign(pool: &PgPool, user_id: Uuid, task_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO task_assignees (user_id, task_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, task_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(task_id)
        .execute(pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                if db_err.constraint().map_or(false, |c| c.contains("user")) {
                    Error::NotFound("user")
                } else {
                    Error::NotFound("task")
                }
            }
            _ => Error::Store(e),
        })?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes a user from a task
    ///
    /// Returns `true` if an assignment row was deleted; removing an
    /// assignment that does not exist is a no-op.
    pub async fn unassign(pool: &PgPool, user_id: Uuid, task_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM task_assignees WHERE user_id = $1 AND task_id = $2",
        )
        .bind(user_id)
        .bind(task_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the users assigned to a task, earliest assignment first
    pub async fn list_assignees(pool: &PgPool, task_id: Uuid) -> Result<Vec<UserSummary>> {
        let assignees = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.email, u.first_name, u.last_name
            FROM users u
            JOIN task_assignees a ON a.user_id = u.id
            WHERE a.task_id = $1
            ORDER BY a.created_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(assignees)
    }

    /// Counts assignments for a task
    pub async fn count_for_task(pool: &PgPool, task_id: Uuid) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM task_assignees WHERE task_id = $1")
                .bind(task_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}
