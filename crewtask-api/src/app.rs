/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use crewtask_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = crewtask_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```
use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, patch, post},
    Router,
};
use crewtask_shared::{auth::session, models::user::User};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Authenticated user for the current request
///
/// Inserted into request extensions by the session middleware and read by
/// handlers via `Extension<CurrentUser>`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// The router is organized as follows:
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// ├── /v1/                           # API v1 (versioned)
/// │   ├── /auth/                     # Authentication
/// │   │   ├── POST   /signup
/// │   │   ├── POST   /login
/// │   │   ├── DELETE /logout
/// │   │   └── GET    /me             # (session required)
/// │   ├── /users/                    # Directory and presence (session required)
/// │   │   ├── GET  /search
/// │   │   ├── GET  /collaborators
/// │   │   ├── GET  /:id/status
/// │   │   └── POST /reset-status
/// │   ├── /projects/                 # Projects (session required)
/// │   │   ├── POST  /
/// │   │   ├── GET   /
/// │   │   ├── GET   /:id
/// │   │   ├── PATCH /:id
/// │   │   ├── GET   /:id/tasks
/// │   │   └── POST  /:id/tasks
/// │   └── /tasks/                    # Tasks (session required)
/// │       ├── PATCH  /:id
/// │       ├── GET    /:id/completed
/// │       ├── PATCH  /:id/completed
/// │       ├── GET    /:id/assignees
/// │       ├── POST   /:id/assignees
/// │       └── DELETE /:id/assignees/:user_id
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. Compression (tower-http CompressionLayer)
/// 3. CORS (tower-http CorsLayer)
/// 4. Security headers
/// 5. Session authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    // Import route handlers
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Signup, login and logout are public. Logout reads the Authorization
    // header itself so that revoking an unknown token still succeeds.
    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login))
        .route("/logout", delete(routes::auth::logout))
        .merge(
            Router::new()
                .route("/me", get(routes::auth::me))
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    session_auth_layer,
                )),
        );

    // Directory and presence routes (require a live session)
    let user_routes = Router::new()
        .route("/search", get(routes::users::search))
        .route("/collaborators", get(routes::users::collaborators))
        .route("/:id/status", get(routes::users::status))
        .route("/reset-status", post(routes::users::reset_status))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    // Project routes (require a live session)
    let project_routes = Router::new()
        .route(
            "/",
            post(routes::projects::create).get(routes::projects::list),
        )
        .route(
            "/:id",
            get(routes::projects::show).patch(routes::projects::update),
        )
        .route(
            "/:id/tasks",
            get(routes::projects::list_tasks).post(routes::projects::create_task),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    // Task routes (require a live session)
    let task_routes = Router::new()
        .route("/:id", patch(routes::tasks::update))
        .route(
            "/:id/completed",
            get(routes::tasks::completed).patch(routes::tasks::set_completed),
        )
        .route(
            "/:id/assignees",
            get(routes::tasks::list_assignees).post(routes::tasks::assign),
        )
        .route(
            "/:id/assignees/:user_id",
            delete(routes::tasks::unassign),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    // Build complete v1 API
    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/projects", project_routes)
        .nest("/tasks", task_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.is_empty() {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    // Combine all routes with middleware stack
    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Extracts the bearer token from an Authorization header
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::BadRequest("Expected Bearer token".to_string()))
}

/// Session authentication middleware layer
///
/// Extracts the bearer token from the Authorization header, resolves it to
/// a user, then injects [`CurrentUser`] into request extensions.
async fn session_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())?.to_string();

    let user = session::resolve(&state.db, &token).await?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer crew_abc123"),
        );

        assert_eq!(bearer_token(&headers).unwrap(), "crew_abc123");
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let headers = HeaderMap::new();

        assert!(matches!(
            bearer_token(&headers),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );

        assert!(matches!(
            bearer_token(&headers),
            Err(ApiError::BadRequest(_))
        ));
    }
}
