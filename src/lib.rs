//! Gather - events and ticketing platform
//!
//! REST JSON API for publishing events, joining them through participation
//! requests, and curating event compilations, plus a companion stats
//! service that records endpoint hits.

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
