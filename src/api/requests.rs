//! Participation request endpoints, private surface

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{error::AppResult, models::request::ParticipationRequestDto};

#[derive(Debug, Deserialize)]
pub struct CreateRequestQuery {
    #[serde(rename = "eventId")]
    pub event_id: i64,
}

/// List the user's own participation requests
#[utoipa::path(
    get,
    path = "/users/{user_id}/requests",
    tag = "private: requests",
    params(
        ("user_id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Requests made by the user", body = [ParticipationRequestDto]),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_own_requests(
    State(state): State<crate::AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<ParticipationRequestDto>>> {
    let requests = state.services.requests.list_own(user_id).await?;
    Ok(Json(requests))
}

/// Submit a participation request
#[utoipa::path(
    post,
    path = "/users/{user_id}/requests",
    tag = "private: requests",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("eventId" = i64, Query, description = "Target event ID")
    ),
    responses(
        (status = 201, description = "Request created", body = ParticipationRequestDto),
        (status = 404, description = "User or event not found"),
        (status = 409, description = "Duplicate, own event, unpublished event or full event")
    )
)]
pub async fn create_request(
    State(state): State<crate::AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<CreateRequestQuery>,
) -> AppResult<(StatusCode, Json<ParticipationRequestDto>)> {
    let created = state
        .services
        .requests
        .create(user_id, query.event_id)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Cancel one of the user's own requests
#[utoipa::path(
    patch,
    path = "/users/{user_id}/requests/{request_id}/cancel",
    tag = "private: requests",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("request_id" = i64, Path, description = "Request ID")
    ),
    responses(
        (status = 200, description = "Request canceled", body = ParticipationRequestDto),
        (status = 404, description = "Request not found for this user")
    )
)]
pub async fn cancel_request(
    State(state): State<crate::AppState>,
    Path((user_id, request_id)): Path<(i64, i64)>,
) -> AppResult<Json<ParticipationRequestDto>> {
    let canceled = state.services.requests.cancel(user_id, request_id).await?;
    Ok(Json(canceled))
}
