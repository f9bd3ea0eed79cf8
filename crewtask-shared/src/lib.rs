//! # CrewTask Shared Library
//!
//! Domain core for the CrewTask collaboration backend, used by the API
//! server and by tooling. The HTTP layer lives in `crewtask-api`; this
//! crate owns the entities and the rules.
//!
//! ## Module Organization
//!
//! - `models`: Entity stores (users, sessions, projects, tasks, assignments)
//! - `auth`: Password hashing, session tokens, and ownership guards
//! - `presence`: Live presence and the cached-status sweep
//! - `directory`: Collaborator listing and user search
//! - `db`: Connection pool and migrations
//! - `error`: Common error taxonomy

pub mod auth;
pub mod db;
pub mod directory;
pub mod error;
pub mod models;
pub mod presence;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
