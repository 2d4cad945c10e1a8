//! Compilation model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::event::EventShortDto;

/// Curated group of events
#[derive(Debug, Clone, FromRow)]
pub struct Compilation {
    pub id: i64,
    pub pinned: bool,
    pub title: String,
}

/// Compilation with its referenced events
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompilationDto {
    pub id: i64,
    pub pinned: bool,
    pub title: String,
    pub events: Vec<EventShortDto>,
}

/// Create compilation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewCompilationDto {
    pub events: Option<Vec<i64>>,
    pub pinned: Option<bool>,
    #[validate(length(min = 1, max = 50, message = "Title must be 1-50 characters"))]
    pub title: String,
}

/// Update compilation request; absent fields stay untouched
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCompilationRequest {
    pub events: Option<Vec<i64>>,
    pub pinned: Option<bool>,
    #[validate(length(min = 1, max = 50, message = "Title must be 1-50 characters"))]
    pub title: Option<String>,
}

/// Public compilation listing parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct CompilationQuery {
    pub pinned: Option<bool>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}
