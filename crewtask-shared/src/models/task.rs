/// Task model and database operations
///
/// Tasks belong to exactly one project. Editing the descriptive fields and
/// flipping the completion flag are separate operations because they sit
/// behind different guards: edits require owning the parent project, while
/// completion requires being assigned to the task.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     title TEXT NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     deadline TIMESTAMPTZ,
///     priority TEXT NOT NULL DEFAULT 'normal',
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Owning project; tasks never move between projects
    pub project_id: Uuid,

    /// Task title
    pub title: String,

    /// Free-form description, empty string when unset
    pub description: String,

    /// Optional deadline
    pub deadline: Option<DateTime<Utc>>,

    /// Free-form priority label, `"normal"` when unset
    pub priority: String,

    /// Completion flag, toggled only through [`Task::set_completed`]
    pub completed: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// Callers apply the creation defaults before reaching the store: empty
/// description, [`Task::DEFAULT_PRIORITY`], no deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Owning project
    pub project_id: Uuid,

    /// Task title
    pub title: String,

    /// Description
    pub description: String,

    /// Optional deadline
    pub deadline: Option<DateTime<Utc>>,

    /// Priority label
    pub priority: String,
}

/// Input for updating a task's descriptive fields
///
/// The write fields are replaced as a unit; omitted optional fields fall
/// back to creation defaults. Neither `project_id` nor `completed` can be
/// written through an update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: String,

    /// New description
    pub description: String,

    /// New deadline, `None` clears it
    pub deadline: Option<DateTime<Utc>>,

    /// New priority label
    pub priority: String,
}

impl Task {
    /// Priority assigned when the caller does not pick one
    pub const DEFAULT_PRIORITY: &'static str = "normal";

    /// Creates a new task
    ///
    /// New tasks always start incomplete.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (project_id, title, description, deadline, priority)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, project_id, title, description, deadline, priority,
                      completed, created_at, updated_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.deadline)
        .bind(data.priority)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, description, deadline, priority,
                   completed, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Replaces the descriptive fields of a task
    ///
    /// Returns the updated task, or `None` if it does not exist. The
    /// completion flag is untouched.
    pub async fn update(pool: &PgPool, id: Uuid, data: UpdateTask) -> Result<Option<Self>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $2, description = $3, deadline = $4, priority = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, project_id, title, description, deadline, priority,
                      completed, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.deadline)
        .bind(data.priority)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Sets the completion flag
    ///
    /// Dedicated operation so the assignment guard covers exactly this
    /// column and nothing else. Returns `None` if the task does not exist.
    pub async fn set_completed(
        pool: &PgPool,
        id: Uuid,
        completed: bool,
    ) -> Result<Option<Self>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET completed = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, project_id, title, description, deadline, priority,
                      completed, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(completed)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task and (via cascade) its assignments
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the tasks of a project, most recently updated first
    pub async fn list_for_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Self>> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, description, deadline, priority,
                   completed, created_at, updated_at
            FROM tasks
            WHERE project_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }
}
