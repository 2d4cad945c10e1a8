//! Stats service endpoints: hit intake and view aggregation

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::stats::{EndpointHit, StatsQuery, ViewStats},
};

/// Record one endpoint hit
#[utoipa::path(
    post,
    path = "/hit",
    tag = "stats",
    request_body = EndpointHit,
    responses(
        (status = 201, description = "Hit recorded", body = EndpointHit)
    )
)]
pub async fn record_hit(
    State(state): State<crate::AppState>,
    Json(payload): Json<EndpointHit>,
) -> AppResult<(StatusCode, Json<EndpointHit>)> {
    let recorded = state.services.stats.record_hit(&payload).await?;
    Ok((StatusCode::CREATED, Json(recorded)))
}

/// Aggregate view counts over a time window
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Hit counts per (app, uri)", body = [ViewStats]),
        (status = 400, description = "Window start is after its end")
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<Vec<ViewStats>>> {
    let stats = state.services.stats.get_stats(&query).await?;
    Ok(Json(stats))
}
