//! Compilation endpoints, public reads and admin writes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::compilation::{
        CompilationDto, CompilationQuery, NewCompilationDto, UpdateCompilationRequest,
    },
};

/// Create a compilation
#[utoipa::path(
    post,
    path = "/admin/compilations",
    tag = "admin: compilations",
    request_body = NewCompilationDto,
    responses(
        (status = 201, description = "Compilation created", body = CompilationDto),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_compilation(
    State(state): State<crate::AppState>,
    Json(payload): Json<NewCompilationDto>,
) -> AppResult<(StatusCode, Json<CompilationDto>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state.services.compilations.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a compilation; an absent body leaves it unchanged
#[utoipa::path(
    patch,
    path = "/admin/compilations/{comp_id}",
    tag = "admin: compilations",
    params(
        ("comp_id" = i64, Path, description = "Compilation ID")
    ),
    request_body = UpdateCompilationRequest,
    responses(
        (status = 200, description = "Compilation updated", body = CompilationDto),
        (status = 404, description = "Compilation not found")
    )
)]
pub async fn update_compilation(
    State(state): State<crate::AppState>,
    Path(comp_id): Path<i64>,
    payload: Option<Json<UpdateCompilationRequest>>,
) -> AppResult<Json<CompilationDto>> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = state
        .services
        .compilations
        .update(comp_id, &payload)
        .await?;
    Ok(Json(updated))
}

/// Delete a compilation
#[utoipa::path(
    delete,
    path = "/admin/compilations/{comp_id}",
    tag = "admin: compilations",
    params(
        ("comp_id" = i64, Path, description = "Compilation ID")
    ),
    responses(
        (status = 204, description = "Compilation deleted"),
        (status = 404, description = "Compilation not found")
    )
)]
pub async fn delete_compilation(
    State(state): State<crate::AppState>,
    Path(comp_id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.compilations.delete(comp_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List compilations
#[utoipa::path(
    get,
    path = "/compilations",
    tag = "compilations",
    params(CompilationQuery),
    responses(
        (status = 200, description = "List of compilations", body = [CompilationDto])
    )
)]
pub async fn list_compilations(
    State(state): State<crate::AppState>,
    Query(query): Query<CompilationQuery>,
) -> AppResult<Json<Vec<CompilationDto>>> {
    let compilations = state
        .services
        .compilations
        .list(query.pinned, query.from, query.size)
        .await?;
    Ok(Json(compilations))
}

/// Get compilation by ID
#[utoipa::path(
    get,
    path = "/compilations/{comp_id}",
    tag = "compilations",
    params(
        ("comp_id" = i64, Path, description = "Compilation ID")
    ),
    responses(
        (status = 200, description = "Compilation details", body = CompilationDto),
        (status = 404, description = "Compilation not found")
    )
)]
pub async fn get_compilation(
    State(state): State<crate::AppState>,
    Path(comp_id): Path<i64>,
) -> AppResult<Json<CompilationDto>> {
    let compilation = state.services.compilations.get_by_id(comp_id).await?;
    Ok(Json(compilation))
}
