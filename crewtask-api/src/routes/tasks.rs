/// Task endpoints
///
/// This module provides task editing, completion toggling and assignee
/// management. Two distinct permission checks apply and must not be
/// conflated: editing a task's fields requires administering its parent
/// project, while toggling completion requires being assigned to the
/// task itself.
///
/// # Endpoints
///
/// - `PATCH /v1/tasks/:id` - Edit a task's fields (project owner only)
/// - `GET /v1/tasks/:id/completed` - Read the completion flag
/// - `PATCH /v1/tasks/:id/completed` - Toggle completion (assignees only)
/// - `GET /v1/tasks/:id/assignees` - List assignees
/// - `POST /v1/tasks/:id/assignees` - Assign a user (project owner only)
/// - `DELETE /v1/tasks/:id/assignees/:user_id` - Unassign a user (project owner only)
use crate::{
    app::{AppState, CurrentUser},
    error::ApiResult,
    routes::users::UserSummaryResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use crewtask_shared::{
    auth::authorization,
    error::Error,
    models::{
        assignment::Assignment,
        task::{Task, UpdateTask},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Update task request
///
/// The write fields are replaced as a unit; omitted optional fields reset
/// to creation defaults. `completed` is not writable here, see
/// `PATCH /v1/tasks/:id/completed`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,

    /// New description
    pub description: Option<String>,

    /// New deadline
    pub deadline: Option<DateTime<Utc>>,

    /// New priority label
    pub priority: Option<String>,
}

/// Completion toggle request
#[derive(Debug, Deserialize)]
pub struct SetCompletedRequest {
    /// Desired completion state
    pub completed: bool,
}

/// Completion flag response
#[derive(Debug, Serialize)]
pub struct CompletedResponse {
    /// Current completion state
    pub completed: bool,
}

/// Assign request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    /// User to assign; defaults to the requester when omitted
    pub assignee_id: Option<Uuid>,
}

/// Task response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    /// Task ID
    pub id: String,

    /// Owning project
    pub project_id: String,

    /// Task title
    pub title: String,

    /// Description
    pub description: String,

    /// Optional deadline
    pub deadline: Option<DateTime<Utc>>,

    /// Priority label
    pub priority: String,

    /// Completion flag
    pub completed: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            project_id: task.project_id.to_string(),
            title: task.title.clone(),
            description: task.description.clone(),
            deadline: task.deadline,
            priority: task.priority.clone(),
            completed: task.completed,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Edit a task's fields (project owner only)
///
/// Assignees who do not administer the parent project cannot edit fields;
/// they can only toggle completion.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid session token
/// - `403 Forbidden`: Caller does not administer the parent project
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    req.validate().map_err(Error::from_validation_errors)?;

    authorization::require_task_project_owner(&state.db, id, user.id).await?;

    let task = Task::update(
        &state.db,
        id,
        UpdateTask {
            title: req.title,
            description: req.description.unwrap_or_default(),
            deadline: req.deadline,
            priority: req
                .priority
                .unwrap_or_else(|| Task::DEFAULT_PRIORITY.to_string()),
        },
    )
    .await?
    .ok_or(Error::NotFound("task"))?;

    Ok(Json(TaskResponse::from(&task)))
}

/// Read the completion flag of a task
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid session token
/// - `404 Not Found`: No such task
pub async fn completed(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CompletedResponse>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or(Error::NotFound("task"))?;

    Ok(Json(CompletedResponse {
        completed: task.completed,
    }))
}

/// Toggle the completion flag (assignees only)
///
/// Any assignee may toggle completion, including non-admins. A project
/// owner who is not assigned to the task is rejected like any other
/// non-assignee.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid session token
/// - `403 Forbidden`: Caller is not assigned to this task
pub async fn set_completed(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetCompletedRequest>,
) -> ApiResult<Json<TaskResponse>> {
    authorization::require_task_assignee(&state.db, id, user.id).await?;

    let task = Task::set_completed(&state.db, id, req.completed)
        .await?
        .ok_or(Error::NotFound("task"))?;

    Ok(Json(TaskResponse::from(&task)))
}

/// List the assignees of a task
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid session token
/// - `404 Not Found`: No such task
pub async fn list_assignees(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<UserSummaryResponse>>> {
    Task::find_by_id(&state.db, id)
        .await?
        .ok_or(Error::NotFound("task"))?;

    let assignees = Assignment::list_assignees(&state.db, id).await?;

    Ok(Json(
        assignees.iter().map(UserSummaryResponse::from).collect(),
    ))
}

/// Assign a user to a task (project owner only)
///
/// Omitting `assigneeId` assigns the requester. Assigning an already
/// assigned user is a no-op. Returns the resulting assignee set either
/// way.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid session token
/// - `403 Forbidden`: Caller does not administer the parent project
/// - `404 Not Found`: Assignee user does not exist
pub async fn assign(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<AssignRequest>,
) -> ApiResult<Json<Vec<UserSummaryResponse>>> {
    authorization::require_task_project_owner(&state.db, id, user.id).await?;

    let assignee_id = req.assignee_id.unwrap_or(user.id);

    Assignment::assign(&state.db, assignee_id, id).await?;

    let assignees = Assignment::list_assignees(&state.db, id).await?;

    Ok(Json(
        assignees.iter().map(UserSummaryResponse::from).collect(),
    ))
}

/// Unassign a user from a task (project owner only)
///
/// Unassigning a user who is not assigned is a no-op.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid session token
/// - `403 Forbidden`: Caller does not administer the parent project
pub async fn unassign(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    authorization::require_task_project_owner(&state.db, id, user.id).await?;

    Assignment::unassign(&state.db, user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_title_required() {
        let req = UpdateTaskRequest {
            title: "  ".to_string(),
            description: None,
            deadline: None,
            priority: None,
        };

        // Whitespace passes the length check; only empty is rejected
        assert!(req.validate().is_ok());
        assert!(UpdateTaskRequest {
            title: String::new(),
            description: None,
            deadline: None,
            priority: None,
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_task_response_camel_case() {
        let now = Utc::now();
        let response = TaskResponse {
            id: "id".to_string(),
            project_id: "project".to_string(),
            title: "Ship it".to_string(),
            description: String::new(),
            deadline: None,
            priority: "normal".to_string(),
            completed: false,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&response).unwrap();

        assert!(json.get("projectId").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("project_id").is_none());
    }
}
