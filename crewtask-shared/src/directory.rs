/// Collaborator directory and user search
///
/// Two read paths over the user base: the collaborator listing (everyone
/// sharing a project with the caller, online people first) and prefix
/// search for pickers and autocomplete.
///
/// Search input is always passed as a bind parameter with LIKE wildcards
/// escaped; no fragment of the term is ever spliced into SQL text.
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::user::UserSummary;

/// A user appearing in someone's collaborator directory
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Collaborator {
    /// User ID
    pub id: Uuid,

    /// Email address
    pub email: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Live presence, "ONLINE" or "OFFLINE", computed from sessions at
    /// query time (the cached column is not consulted)
    pub status: String,
}

/// Lists every user sharing at least one project with the caller
///
/// A project is shared when the caller administers it or is assigned to
/// one of its tasks; the people in it are its admin plus all assignees.
/// The caller appears in their own directory.
///
/// Online collaborators come first. "ONLINE" sorts after "OFFLINE"
/// lexically, so a plain DESC on the computed column does the job; no
/// further ordering is applied.
pub async fn list_collaborators(pool: &PgPool, user_id: Uuid) -> Result<Vec<Collaborator>> {
    let collaborators = sqlx::query_as::<_, Collaborator>(
        r#"
        WITH visible_projects AS (
            SELECT p.id FROM projects p WHERE p.admin_user_id = $1
            UNION
            SELECT t.project_id FROM tasks t
            JOIN task_assignees a ON a.task_id = t.id
            WHERE a.user_id = $1
        ),
        members AS (
            SELECT p.admin_user_id AS user_id
            FROM projects p
            WHERE p.id IN (SELECT id FROM visible_projects)
            UNION
            SELECT a.user_id
            FROM task_assignees a
            JOIN tasks t ON t.id = a.task_id
            WHERE t.project_id IN (SELECT id FROM visible_projects)
        )
        SELECT u.id, u.email, u.first_name, u.last_name,
               CASE WHEN EXISTS (SELECT 1 FROM sessions s WHERE s.user_id = u.id)
                    THEN 'ONLINE' ELSE 'OFFLINE' END AS status
        FROM users u
        WHERE u.id IN (SELECT user_id FROM members)
        ORDER BY status DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(collaborators)
}

/// Searches users by name or email prefix, case-insensitively
///
/// An empty or whitespace-only term returns an empty result without
/// touching the database. The term is wildcard-escaped and bound as a
/// single `term%` pattern against first name, last name, and email.
pub async fn search_users(pool: &PgPool, term: &str) -> Result<Vec<UserSummary>> {
    let term = term.trim();
    if term.is_empty() {
        return Ok(Vec::new());
    }

    let pattern = format!("{}%", escape_like(term));

    let users = sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT id, email, first_name, last_name
        FROM users
        WHERE first_name ILIKE $1 OR last_name ILIKE $1 OR email ILIKE $1
        "#,
    )
    .bind(pattern)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Escapes LIKE wildcards so a search term matches itself literally
///
/// Postgres treats `%`, `_` and the escape character `\` specially inside
/// a pattern; everything else passes through unchanged.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());

    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}
