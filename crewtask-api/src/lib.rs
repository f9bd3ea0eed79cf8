//! # CrewTask API Server Library
//!
//! This library provides the core functionality for the CrewTask API server.
//!
//! ## Modules
//!
//! - `app`: Application state, session middleware and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
