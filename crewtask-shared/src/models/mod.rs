/// Database models
///
/// This module contains the entity stores and their CRUD operations. Each
/// store is explicit: operations take the pool handle they run against,
/// and nothing here consults ambient state.
///
/// # Models
///
/// - `user`: User accounts
/// - `session`: Live bearer-token sessions
/// - `project`: Projects with a single owning admin
/// - `task`: Tasks within a project
/// - `assignment`: User-task assignment join rows
///
/// # Example
///
/// ```no_run
/// use crewtask_shared::models::user::{CreateUser, User};
/// use crewtask_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(
///     &pool,
///     CreateUser {
///         email: "ada@example.com".to_string(),
///         first_name: "Ada".to_string(),
///         last_name: "Lovelace".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
/// # let _ = user;
/// # Ok(())
/// # }
/// ```
pub mod assignment;
pub mod project;
pub mod session;
pub mod task;
pub mod user;
