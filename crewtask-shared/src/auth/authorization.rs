/// Ownership guards
///
/// Relationship checks that gate every mutating route. The model is
/// deliberately small:
///
/// 1. **Project ownership**: the project's `admin_user_id` is the caller.
/// 2. **Task assignment**: an assignment row links the caller to the task.
/// 3. **Task ownership**: the caller owns the task's parent project,
///    resolved from the task row itself (never from caller input).
///
/// Assignment and ownership stay separate checks: an assignee who does not
/// own the project may toggle completion but may not edit task fields.
///
/// All three answer `Error::AccessDenied` both when the relationship is
/// missing and when the entity itself does not exist, so a rejected caller
/// cannot distinguish "forbidden" from "absent" and probe for ids.
///
/// # Example
///
/// ```no_run
/// use crewtask_shared::auth::authorization::require_project_owner;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// async fn guard_edit(pool: &PgPool, project_id: Uuid, user_id: Uuid)
///     -> crewtask_shared::error::Result<()>
/// {
///     require_project_owner(pool, project_id, user_id).await?;
///     Ok(())
/// }
/// ```
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Requires that the user administers the project
///
/// # Errors
///
/// Returns `Error::AccessDenied` if the project is owned by someone else
/// or does not exist, `Error::Store` on database failure.
pub async fn require_project_owner(
    pool: &PgPool,
    project_id: Uuid,
    user_id: Uuid,
) -> Result<()> {
    let owns: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT 1 FROM projects
            WHERE id = $1 AND admin_user_id = $2
        )",
    )
    .bind(project_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    if !owns {
        return Err(Error::AccessDenied);
    }

    Ok(())
}

/// Requires that the user is assigned to the task
///
/// This is the gate for completion toggling: being assigned is enough,
/// owning the parent project is not required.
///
/// # Errors
///
/// Returns `Error::AccessDenied` if no assignment row links the user to
/// the task (including when the task does not exist), `Error::Store` on
/// database failure.
pub async fn require_task_assignee(pool: &PgPool, task_id: Uuid, user_id: Uuid) -> Result<()> {
    let assigned: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT 1 FROM task_assignees
            WHERE task_id = $1 AND user_id = $2
        )",
    )
    .bind(task_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    if !assigned {
        return Err(Error::AccessDenied);
    }

    Ok(())
}

/// Requires that the user owns the task's parent project
///
/// The parent project is resolved from the task row; callers cannot
/// substitute a project they happen to own. This is the gate for editing
/// task fields and managing assignees.
///
/// # Errors
///
/// Returns `Error::AccessDenied` if the task does not exist or its project
/// belongs to someone else, `Error::Store` on database failure.
pub async fn require_task_project_owner(
    pool: &PgPool,
    task_id: Uuid,
    user_id: Uuid,
) -> Result<()> {
    let owns: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT 1 FROM tasks t
            JOIN projects p ON p.id = t.project_id
            WHERE t.id = $1 AND p.admin_user_id = $2
        )",
    )
    .bind(task_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    if !owns {
        return Err(Error::AccessDenied);
    }

    Ok(())
}
