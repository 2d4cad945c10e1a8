//! User model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// User account as stored and returned by the admin API
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
}

/// Short user representation embedded in event DTOs
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserShortDto {
    pub id: i64,
    pub name: String,
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewUserRequest {
    #[validate(email(message = "Invalid email format"))]
    #[validate(length(min = 6, max = 254, message = "Email must be 6-254 characters"))]
    pub email: String,
    #[validate(length(min = 2, max = 250, message = "Name must be 2-250 characters"))]
    pub name: String,
}

/// Admin user listing parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct UserQuery {
    /// Comma-separated list of user ids to restrict the listing to
    #[serde(default, deserialize_with = "super::csv_ids::deserialize")]
    pub ids: Option<Vec<i64>>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}
