//! Event endpoints: owner (private), public and admin surfaces

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, OriginalUri, Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        event::{
            AdminEventQuery, EventFullDto, EventShortDto, NewEventDto, PublicEventQuery,
            UpdateEventAdminRequest, UpdateEventUserRequest,
        },
        request::{
            EventRequestStatusUpdateRequest, EventRequestStatusUpdateResult,
            ParticipationRequestDto,
        },
    },
};

/// List the user's own events
#[utoipa::path(
    get,
    path = "/users/{user_id}/events",
    tag = "private: events",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("from" = Option<i64>, Query, description = "Offset into the result set"),
        ("size" = Option<i64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Events initiated by the user", body = [EventShortDto]),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_own_events(
    State(state): State<crate::AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<EventShortDto>>> {
    let events = state
        .services
        .events
        .list_by_initiator(user_id, query.from, query.size)
        .await?;
    Ok(Json(events))
}

/// Create an event
#[utoipa::path(
    post,
    path = "/users/{user_id}/events",
    tag = "private: events",
    params(
        ("user_id" = i64, Path, description = "User ID")
    ),
    request_body = NewEventDto,
    responses(
        (status = 201, description = "Event created in pending state", body = EventFullDto),
        (status = 400, description = "Invalid input or event date too close"),
        (status = 404, description = "User or category not found")
    )
)]
pub async fn create_event(
    State(state): State<crate::AppState>,
    Path(user_id): Path<i64>,
    Json(payload): Json<NewEventDto>,
) -> AppResult<(StatusCode, Json<EventFullDto>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state.services.events.create(user_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get one of the user's own events
#[utoipa::path(
    get,
    path = "/users/{user_id}/events/{event_id}",
    tag = "private: events",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("event_id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Full event details", body = EventFullDto),
        (status = 404, description = "Event not found for this user")
    )
)]
pub async fn get_own_event(
    State(state): State<crate::AppState>,
    Path((user_id, event_id)): Path<(i64, i64)>,
) -> AppResult<Json<EventFullDto>> {
    let event = state
        .services
        .events
        .get_by_initiator(user_id, event_id)
        .await?;
    Ok(Json(event))
}

/// Edit one of the user's own events
#[utoipa::path(
    patch,
    path = "/users/{user_id}/events/{event_id}",
    tag = "private: events",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("event_id" = i64, Path, description = "Event ID")
    ),
    request_body = UpdateEventUserRequest,
    responses(
        (status = 200, description = "Event updated", body = EventFullDto),
        (status = 404, description = "Event not found for this user"),
        (status = 409, description = "Event is published")
    )
)]
pub async fn update_own_event(
    State(state): State<crate::AppState>,
    Path((user_id, event_id)): Path<(i64, i64)>,
    Json(payload): Json<UpdateEventUserRequest>,
) -> AppResult<Json<EventFullDto>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = state
        .services
        .events
        .update_by_initiator(user_id, event_id, &payload)
        .await?;
    Ok(Json(updated))
}

/// List participation requests for one of the user's own events
#[utoipa::path(
    get,
    path = "/users/{user_id}/events/{event_id}/requests",
    tag = "private: events",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("event_id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Requests targeting the event", body = [ParticipationRequestDto]),
        (status = 404, description = "Event not found for this user")
    )
)]
pub async fn list_event_requests(
    State(state): State<crate::AppState>,
    Path((user_id, event_id)): Path<(i64, i64)>,
) -> AppResult<Json<Vec<ParticipationRequestDto>>> {
    let requests = state
        .services
        .events
        .owner_requests(user_id, event_id)
        .await?;
    Ok(Json(requests))
}

/// Confirm or reject pending participation requests in one batch
#[utoipa::path(
    patch,
    path = "/users/{user_id}/events/{event_id}/requests",
    tag = "private: events",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("event_id" = i64, Path, description = "Event ID")
    ),
    request_body = EventRequestStatusUpdateRequest,
    responses(
        (status = 200, description = "Batch decision applied", body = EventRequestStatusUpdateResult),
        (status = 404, description = "Event not found for this user"),
        (status = 409, description = "Request not pending or participant limit reached")
    )
)]
pub async fn update_event_requests(
    State(state): State<crate::AppState>,
    Path((user_id, event_id)): Path<(i64, i64)>,
    Json(payload): Json<EventRequestStatusUpdateRequest>,
) -> AppResult<Json<EventRequestStatusUpdateResult>> {
    let result = state
        .services
        .events
        .update_request_statuses(user_id, event_id, &payload)
        .await?;
    Ok(Json(result))
}

/// Public search over published events
#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    params(PublicEventQuery),
    responses(
        (status = 200, description = "Matching published events", body = [EventShortDto]),
        (status = 400, description = "Invalid time window")
    )
)]
pub async fn search_events(
    State(state): State<crate::AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PublicEventQuery>,
) -> AppResult<Json<Vec<EventShortDto>>> {
    let events = state
        .services
        .events
        .search_public(&query, uri.path(), &addr.ip().to_string())
        .await?;
    Ok(Json(events))
}

/// Get a published event by ID
#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "events",
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Full event details", body = EventFullDto),
        (status = 404, description = "Event not found or not published")
    )
)]
pub async fn get_event(
    State(state): State<crate::AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> AppResult<Json<EventFullDto>> {
    let event = state
        .services
        .events
        .get_published(id, uri.path(), &addr.ip().to_string())
        .await?;
    Ok(Json(event))
}

/// Admin event listing with filters
#[utoipa::path(
    get,
    path = "/admin/events",
    tag = "admin: events",
    params(AdminEventQuery),
    responses(
        (status = 200, description = "Matching events in any state", body = [EventFullDto]),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn search_events_admin(
    State(state): State<crate::AppState>,
    Query(query): Query<AdminEventQuery>,
) -> AppResult<Json<Vec<EventFullDto>>> {
    let events = state.services.events.search_admin(&query).await?;
    Ok(Json(events))
}

/// Admin event update, including publish and reject moderation actions
#[utoipa::path(
    patch,
    path = "/admin/events/{event_id}",
    tag = "admin: events",
    params(
        ("event_id" = i64, Path, description = "Event ID")
    ),
    request_body = UpdateEventAdminRequest,
    responses(
        (status = 200, description = "Event updated", body = EventFullDto),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Moderation action conflicts with the event state")
    )
)]
pub async fn update_event_admin(
    State(state): State<crate::AppState>,
    Path(event_id): Path<i64>,
    Json(payload): Json<UpdateEventAdminRequest>,
) -> AppResult<Json<EventFullDto>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = state
        .services
        .events
        .update_by_admin(event_id, &payload)
        .await?;
    Ok(Json(updated))
}

/// Paging parameters shared by the private listing endpoints
#[derive(Debug, serde::Deserialize)]
pub struct PageQuery {
    pub from: Option<i64>,
    pub size: Option<i64>,
}
