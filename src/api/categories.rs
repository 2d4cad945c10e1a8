//! Category endpoints, public reads and admin writes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::category::{Category, CategoryQuery, NewCategoryDto},
};

/// Create a category
#[utoipa::path(
    post,
    path = "/admin/categories",
    tag = "admin: categories",
    request_body = NewCategoryDto,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Name already in use")
    )
)]
pub async fn create_category(
    State(state): State<crate::AppState>,
    Json(payload): Json<NewCategoryDto>,
) -> AppResult<(StatusCode, Json<Category>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state.services.categories.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Rename a category
#[utoipa::path(
    patch,
    path = "/admin/categories/{cat_id}",
    tag = "admin: categories",
    params(
        ("cat_id" = i64, Path, description = "Category ID")
    ),
    request_body = NewCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Name already in use")
    )
)]
pub async fn update_category(
    State(state): State<crate::AppState>,
    Path(cat_id): Path<i64>,
    Json(payload): Json<NewCategoryDto>,
) -> AppResult<Json<Category>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = state.services.categories.update(cat_id, &payload).await?;
    Ok(Json(updated))
}

/// Delete a category
#[utoipa::path(
    delete,
    path = "/admin/categories/{cat_id}",
    tag = "admin: categories",
    params(
        ("cat_id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    State(state): State<crate::AppState>,
    Path(cat_id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.categories.delete(cat_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    params(CategoryQuery),
    responses(
        (status = 200, description = "List of categories", body = [Category])
    )
)]
pub async fn list_categories(
    State(state): State<crate::AppState>,
    Query(query): Query<CategoryQuery>,
) -> AppResult<Json<Vec<Category>>> {
    let categories = state.services.categories.list(query.from, query.size).await?;
    Ok(Json(categories))
}

/// Get category by ID
#[utoipa::path(
    get,
    path = "/categories/{cat_id}",
    tag = "categories",
    params(
        ("cat_id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category details", body = Category),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<crate::AppState>,
    Path(cat_id): Path<i64>,
) -> AppResult<Json<Category>> {
    let category = state.services.categories.get_by_id(cat_id).await?;
    Ok(Json(category))
}
