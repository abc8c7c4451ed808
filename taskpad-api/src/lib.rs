//! # Taskpad API Server Library
//!
//! This library provides the core functionality for the Taskpad API server:
//! a per-user task list with JWT authentication.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `pagination`: Fixed-size page windowing for list endpoints
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod pagination;
pub mod routes;
