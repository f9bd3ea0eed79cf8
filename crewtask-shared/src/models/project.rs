/// Project model and database operations
///
/// A project is owned by exactly one user (`admin_user_id`, fixed at
/// creation) and contains any number of tasks. Listing is always scoped
/// to a viewer: a user sees the projects they administer plus the ones
/// containing a task assigned to them, each annotated with a completion
/// percentage computed in SQL.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     admin_user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title TEXT NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     deadline TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID (UUID v4)
    pub id: Uuid,

    /// Owner; the only user allowed to edit the project and its tasks
    pub admin_user_id: Uuid,

    /// Project title
    pub title: String,

    /// Free-form description, empty string when unset
    pub description: String,

    /// Optional deadline
    pub deadline: Option<DateTime<Utc>>,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Owner of the new project
    pub admin_user_id: Uuid,

    /// Project title
    pub title: String,

    /// Description, defaults to empty
    pub description: String,

    /// Optional deadline
    pub deadline: Option<DateTime<Utc>>,
}

/// Input for updating a project
///
/// The write fields are replaced as a unit; omitted optional fields fall
/// back to their creation defaults. Ownership cannot be transferred.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProject {
    /// New title
    pub title: String,

    /// New description
    pub description: String,

    /// New deadline, `None` clears it
    pub deadline: Option<DateTime<Utc>>,
}

/// A project annotated with its completion percentage
///
/// `progress_pct` is the share of completed tasks scaled to 0..100, and 0
/// for a project with no tasks.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectWithProgress {
    /// Project ID
    pub id: Uuid,

    /// Owner
    pub admin_user_id: Uuid,

    /// Project title
    pub title: String,

    /// Description
    pub description: String,

    /// Optional deadline
    pub deadline: Option<DateTime<Utc>>,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,

    /// Completion percentage in 0..100
    pub progress_pct: f64,
}

impl Project {
    /// Creates a new project
    ///
    /// The caller becomes the admin; there is no ownership transfer later.
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (admin_user_id, title, description, deadline)
            VALUES ($1, $2, $3, $4)
            RETURNING id, admin_user_id, title, description, deadline,
                      created_at, updated_at
            "#,
        )
        .bind(data.admin_user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.deadline)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, admin_user_id, title, description, deadline,
                   created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Replaces the write fields of a project
    ///
    /// Returns the updated project, or `None` if it does not exist. The
    /// `updated_at` timestamp is bumped on every successful update.
    pub async fn update(pool: &PgPool, id: Uuid, data: UpdateProject) -> Result<Option<Self>> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET title = $2, description = $3, deadline = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, admin_user_id, title, description, deadline,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.deadline)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Deletes a project and (via cascade) its tasks and assignments
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the projects visible to a user, annotated with progress
    ///
    /// Visible means administered by the user, or containing at least one
    /// task assigned to them. Progress is `AVG(completed) * 100` over the
    /// project's tasks, `0` when there are none; booleans are averaged via
    /// an int cast because Postgres has no `AVG(boolean)`.
    ///
    /// Ordering: least-finished first, then nearest deadline (projects
    /// without a deadline last), then most recently updated.
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<ProjectWithProgress>> {
        let projects = sqlx::query_as::<_, ProjectWithProgress>(
            r#"
            SELECT p.id, p.admin_user_id, p.title, p.description, p.deadline,
                   p.created_at, p.updated_at,
                   COALESCE(AVG(t.completed::int) * 100.0, 0)::float8 AS progress_pct
            FROM projects p
            LEFT JOIN tasks t ON t.project_id = p.id
            WHERE p.admin_user_id = $1
               OR p.id IN (
                    SELECT t2.project_id
                    FROM tasks t2
                    JOIN task_assignees a ON a.task_id = t2.id
                    WHERE a.user_id = $1
               )
            GROUP BY p.id
            ORDER BY progress_pct ASC, p.deadline ASC NULLS LAST, p.updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }
}
