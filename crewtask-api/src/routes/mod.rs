/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Account and session endpoints (signup, login, logout, me)
/// - `users`: Directory search, collaborators and presence
/// - `projects`: Project CRUD and nested task collection
/// - `tasks`: Task editing, completion and assignees
pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod users;
