//! Location value object attached to events

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Stored location row, owned by exactly one event
#[derive(Debug, Clone, FromRow)]
pub struct Location {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
}

/// Latitude/longitude pair as exchanged over the API
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate, ToSchema)]
pub struct LocationDto {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be within [-90, 90]"))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be within [-180, 180]"))]
    pub lon: f64,
}
