/// Project endpoints
///
/// This module provides project CRUD plus the nested task collection:
/// - Create and list projects (list is scoped to the caller and carries
///   a completion percentage)
/// - Fetch and edit a single project
/// - List and create tasks within a project
///
/// # Endpoints
///
/// - `POST /v1/projects` - Create a project owned by the caller
/// - `GET /v1/projects` - List visible projects with progress
/// - `GET /v1/projects/:id` - Fetch one project
/// - `PATCH /v1/projects/:id` - Edit a project (owner only)
/// - `GET /v1/projects/:id/tasks` - List the project's tasks
/// - `POST /v1/projects/:id/tasks` - Create a task (owner only)
use crate::{
    app::{AppState, CurrentUser},
    error::ApiResult,
    routes::tasks::TaskResponse,
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
        project::{CreateProject, Project, ProjectWithProgress, UpdateProject},
        task::{CreateTask, Task},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    /// Project title
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,

    /// Description, defaults to empty
    pub description: Option<String>,

    /// Optional deadline
    pub deadline: Option<DateTime<Utc>>,
}

/// Update project request
///
/// The write fields are replaced as a unit; omitting `description` or
/// `deadline` resets them to their creation defaults.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    /// New title
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,

    /// New description
    pub description: Option<String>,

    /// New deadline
    pub deadline: Option<DateTime<Utc>>,
}

/// Create task request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,

    /// Description, defaults to empty
    pub description: Option<String>,

    /// Optional deadline
    pub deadline: Option<DateTime<Utc>>,

    /// Priority label, defaults to `"normal"`
    pub priority: Option<String>,
}

/// Project response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    /// Project ID
    pub id: String,

    /// Owner of the project
    pub admin_user_id: String,

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
}

impl From<&Project> for ProjectResponse {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.to_string(),
            admin_user_id: project.admin_user_id.to_string(),
            title: project.title.clone(),
            description: project.description.clone(),
            deadline: project.deadline,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// Project response annotated with completion percentage
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectWithProgressResponse {
    /// Project ID
    pub id: String,

    /// Owner of the project
    pub admin_user_id: String,

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

    /// Completion percentage in 0..100, 0 for an empty project
    pub progress_pct: f64,
}

impl From<&ProjectWithProgress> for ProjectWithProgressResponse {
    fn from(project: &ProjectWithProgress) -> Self {
        Self {
            id: project.id.to_string(),
            admin_user_id: project.admin_user_id.to_string(),
            title: project.title.clone(),
            description: project.description.clone(),
            deadline: project.deadline,
            created_at: project.created_at,
            updated_at: project.updated_at,
            progress_pct: project.progress_pct,
        }
    }
}

/// Create a project owned by the caller
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid session token
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<ProjectResponse>)> {
    req.validate().map_err(Error::from_validation_errors)?;

    let project = Project::create(
        &state.db,
        CreateProject {
            admin_user_id: user.id,
            title: req.title,
            description: req.description.unwrap_or_default(),
            deadline: req.deadline,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ProjectResponse::from(&project))))
}

/// List the caller's visible projects with progress
///
/// Least-finished projects come first, then nearest deadline (projects
/// without a deadline last), then most recently updated.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid session token
pub async fn list(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<ProjectWithProgressResponse>>> {
    let projects = Project::list_for_user(&state.db, user.id).await?;

    Ok(Json(
        projects
            .iter()
            .map(ProjectWithProgressResponse::from)
            .collect(),
    ))
}

/// Fetch one project
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid session token
/// - `404 Not Found`: No such project
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProjectResponse>> {
    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or(Error::NotFound("project"))?;

    Ok(Json(ProjectResponse::from(&project)))
}

/// Edit a project (owner only)
///
/// A project that does not exist and a project owned by someone else are
/// both reported as `403 Forbidden`.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid session token
/// - `403 Forbidden`: Caller does not administer this project
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<ProjectResponse>> {
    req.validate().map_err(Error::from_validation_errors)?;

    authorization::require_project_owner(&state.db, id, user.id).await?;

    let project = Project::update(
        &state.db,
        id,
        UpdateProject {
            title: req.title,
            description: req.description.unwrap_or_default(),
            deadline: req.deadline,
        },
    )
    .await?
    .ok_or(Error::NotFound("project"))?;

    Ok(Json(ProjectResponse::from(&project)))
}

/// List the tasks of a project
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid session token
/// - `404 Not Found`: No such project
pub async fn list_tasks(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    Project::find_by_id(&state.db, id)
        .await?
        .ok_or(Error::NotFound("project"))?;

    let tasks = Task::list_for_project(&state.db, id).await?;

    Ok(Json(tasks.iter().map(TaskResponse::from).collect()))
}

/// Create a task within a project (owner only)
///
/// Omitted fields get their creation defaults: empty description, no
/// deadline, `"normal"` priority. New tasks start incomplete.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid session token
/// - `403 Forbidden`: Caller does not administer this project
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    req.validate().map_err(Error::from_validation_errors)?;

    authorization::require_project_owner(&state.db, id, user.id).await?;

    let task = Task::create(
        &state.db,
        CreateTask {
            project_id: id,
            title: req.title,
            description: req.description.unwrap_or_default(),
            deadline: req.deadline,
            priority: req
                .priority
                .unwrap_or_else(|| Task::DEFAULT_PRIORITY.to_string()),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(&task))))
}
