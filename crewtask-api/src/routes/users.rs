/// User directory and presence endpoints
///
/// This module provides user-facing directory endpoints:
/// - Prefix search over names and email
/// - Collaborator listing across shared projects
/// - Presence lookup and the presence reset sweep
///
/// # Endpoints
///
/// - `GET /v1/users/search?q=<term>` - Prefix search
/// - `GET /v1/users/collaborators` - Collaborators of the caller
/// - `GET /v1/users/:id/status` - Presence of a single user
/// - `POST /v1/users/reset-status` - Rebuild cached presence for everyone
use crate::{
    app::{AppState, CurrentUser},
    error::ApiResult,
    routes::auth::gravatar_url,
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use crewtask_shared::{
    directory::{self, Collaborator},
    models::user::UserSummary,
    presence::{self, PresenceStatus},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search term; matched as a prefix against names and email
    #[serde(default)]
    pub q: String,
}

/// Directory entry returned by search
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryResponse {
    /// User ID
    pub id: String,

    /// Email address
    pub email: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Gravatar URL derived from the email address
    pub avatar_url: String,
}

impl From<&UserSummary> for UserSummaryResponse {
    fn from(user: &UserSummary) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            avatar_url: gravatar_url(&user.email),
        }
    }
}

/// Directory entry returned by the collaborator listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaboratorResponse {
    /// User ID
    pub id: String,

    /// Email address
    pub email: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Gravatar URL derived from the email address
    pub avatar_url: String,

    /// Presence status, `"ONLINE"` or `"OFFLINE"`
    pub status: String,
}

impl From<&Collaborator> for CollaboratorResponse {
    fn from(collaborator: &Collaborator) -> Self {
        Self {
            id: collaborator.id.to_string(),
            email: collaborator.email.clone(),
            first_name: collaborator.first_name.clone(),
            last_name: collaborator.last_name.clone(),
            avatar_url: gravatar_url(&collaborator.email),
            status: collaborator.status.clone(),
        }
    }
}

/// Presence lookup response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// `"ONLINE"` when the user holds at least one live session
    pub status: PresenceStatus,
}

/// Presence reset response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetStatusResponse {
    /// Users whose cached status was set to OFFLINE (everyone)
    pub marked_offline: u64,

    /// Users subsequently marked ONLINE because they hold a session
    pub marked_online: u64,
}

/// Search users by name or email prefix
///
/// An empty or whitespace-only term yields an empty list without touching
/// the database.
///
/// # Endpoint
///
/// ```text
/// GET /v1/users/search?q=ada
/// Authorization: Bearer crew_...
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid session token
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<UserSummaryResponse>>> {
    let users = directory::search_users(&state.db, &query.q).await?;

    Ok(Json(users.iter().map(UserSummaryResponse::from).collect()))
}

/// List the caller's collaborators
///
/// Collaborators are the members of every project the caller can see,
/// with online members listed first.
///
/// # Endpoint
///
/// ```text
/// GET /v1/users/collaborators
/// Authorization: Bearer crew_...
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid session token
pub async fn collaborators(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<CollaboratorResponse>>> {
    let collaborators = directory::list_collaborators(&state.db, user.id).await?;

    Ok(Json(
        collaborators.iter().map(CollaboratorResponse::from).collect(),
    ))
}

/// Look up the presence of a single user
///
/// # Endpoint
///
/// ```text
/// GET /v1/users/:id/status
/// Authorization: Bearer crew_...
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "ONLINE"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid session token
/// - `404 Not Found`: No such user
pub async fn status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<StatusResponse>> {
    let status = presence::get_status(&state.db, id).await?;

    Ok(Json(StatusResponse { status }))
}

/// Rebuild cached presence for every user
///
/// Marks everyone OFFLINE, then marks users holding at least one live
/// session ONLINE again, in a single transaction.
///
/// # Endpoint
///
/// ```text
/// POST /v1/users/reset-status
/// Authorization: Bearer crew_...
/// ```
///
/// # Response
///
/// ```json
/// {
///   "markedOffline": 12,
///   "markedOnline": 3
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid session token
pub async fn reset_status(State(state): State<AppState>) -> ApiResult<Json<ResetStatusResponse>> {
    let reset = presence::reset_all_status(&state.db).await?;

    Ok(Json(ResetStatusResponse {
        marked_offline: reset.marked_offline,
        marked_online: reset.marked_online,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_response_wire_format() {
        let response = StatusResponse {
            status: PresenceStatus::Online,
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json, serde_json::json!({ "status": "ONLINE" }));
    }

    #[test]
    fn test_reset_response_camel_case() {
        let response = ResetStatusResponse {
            marked_offline: 2,
            marked_online: 1,
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["markedOffline"], 2);
        assert_eq!(json["markedOnline"], 1);
    }
}
