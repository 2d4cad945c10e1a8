//! Category model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Event category
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Create or rename category request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewCategoryDto {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,
}

/// Public category listing parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct CategoryQuery {
    pub from: Option<i64>,
    pub size: Option<i64>,
}
