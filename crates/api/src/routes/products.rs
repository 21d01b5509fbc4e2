//! Product CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::ProductId;
use store::EntityStore;
use uuid::Uuid;

use crate::auth::{AdminUser, AuthUser};
use crate::dto::ProductDto;
use crate::error::ApiError;
use crate::routes::AppState;

/// GET /Products — list all products.
#[tracing::instrument(skip(state, _user))]
pub async fn list<S: EntityStore + 'static>(
    _user: AuthUser,
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ProductDto>>, ApiError> {
    let products = state.products.list().await?;
    Ok(Json(
        products.into_iter().map(ProductDto::from_record).collect(),
    ))
}

/// GET /Products/:id — fetch one product.
#[tracing::instrument(skip(state, _user))]
pub async fn get<S: EntityStore + 'static>(
    _user: AuthUser,
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductDto>, ApiError> {
    let product = state.products.get(ProductId::from_uuid(id)).await?;
    Ok(Json(ProductDto::from_record(product)))
}

/// POST /Products — create a product (admin only).
#[tracing::instrument(skip(state, _admin, dto))]
pub async fn create<S: EntityStore + 'static>(
    _admin: AdminUser,
    State(state): State<Arc<AppState<S>>>,
    Json(dto): Json<ProductDto>,
) -> Result<(StatusCode, Json<ProductDto>), ApiError> {
    dto.validate()?;
    let product = state.products.create(dto.into_input()).await?;
    Ok((StatusCode::CREATED, Json(ProductDto::from_record(product))))
}

/// PUT /Products/:id — update a product (admin only).
#[tracing::instrument(skip(state, _admin, dto))]
pub async fn update<S: EntityStore + 'static>(
    _admin: AdminUser,
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<Uuid>,
    Json(dto): Json<ProductDto>,
) -> Result<StatusCode, ApiError> {
    let id = ProductId::from_uuid(id);
    if dto.id != Some(id) {
        return Err(ApiError::BadRequest("ID mismatch".to_string()));
    }
    dto.validate()?;
    state.products.update(id, dto.into_input()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /Products/:id — delete a product unconditionally (admin only).
#[tracing::instrument(skip(state, _admin))]
pub async fn delete<S: EntityStore + 'static>(
    _admin: AdminUser,
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.products.delete(ProductId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
