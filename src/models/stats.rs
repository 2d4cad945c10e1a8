//! Stats service DTOs: endpoint hits and aggregated view counts

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// One recorded visit to a tracked URI
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EndpointHit {
    pub app: String,
    pub uri: String,
    pub ip: String,
    #[serde(with = "super::date_time")]
    pub timestamp: NaiveDateTime,
}

/// Aggregate hit count for one (app, uri) pair
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct ViewStats {
    pub app: String,
    pub uri: String,
    pub hits: i64,
}

/// Stats query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct StatsQuery {
    #[serde(deserialize_with = "super::date_time::deserialize")]
    pub start: NaiveDateTime,
    #[serde(deserialize_with = "super::date_time::deserialize")]
    pub end: NaiveDateTime,
    #[serde(default, deserialize_with = "super::csv_strings::deserialize")]
    pub uris: Option<Vec<String>>,
    #[serde(default)]
    pub unique: bool,
}
