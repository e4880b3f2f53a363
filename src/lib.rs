//! Shelfdesk Library Management Server
//!
//! A small Rust web server for managing a library catalog: librarians
//! register books, members sign in with email and password, and the server
//! tracks per-book checkout availability.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
