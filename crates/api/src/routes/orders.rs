//! Order endpoints: placement, retrieval, status, deletion.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::OrderId;
use store::EntityStore;
use uuid::Uuid;

use crate::auth::{AdminUser, AuthUser};
use crate::dto::{CreateOrderDto, OrderDto};
use crate::error::ApiError;
use crate::routes::AppState;

/// GET /Orders — list all orders with names resolved (admin only).
#[tracing::instrument(skip(state, _admin))]
pub async fn list<S: EntityStore + 'static>(
    _admin: AdminUser,
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<OrderDto>>, ApiError> {
    let orders = state.orders.list().await?;
    Ok(Json(orders.into_iter().map(OrderDto::from_view).collect()))
}

/// GET /Orders/:id — fetch one order.
///
/// Any authenticated caller may fetch any order; the source never wired
/// order ownership to caller identity.
#[tracing::instrument(skip(state, _user))]
pub async fn get<S: EntityStore + 'static>(
    _user: AuthUser,
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderDto>, ApiError> {
    let view = state.orders.get(OrderId::from_uuid(id)).await?;
    Ok(Json(OrderDto::from_view(view)))
}

/// POST /Orders — place an order.
#[tracing::instrument(skip(state, _user, dto))]
pub async fn create<S: EntityStore + 'static>(
    _user: AuthUser,
    State(state): State<Arc<AppState<S>>>,
    Json(dto): Json<CreateOrderDto>,
) -> Result<(StatusCode, Json<OrderDto>), ApiError> {
    dto.validate()?;
    let view = state.orders.create_order(dto.into_command()).await?;
    Ok((StatusCode::CREATED, Json(OrderDto::from_view(view))))
}

/// PUT /Orders/:id/status — overwrite the status (admin only).
///
/// The body is the raw status string; it must be one of the four
/// recognized literals.
#[tracing::instrument(skip(state, _admin))]
pub async fn update_status<S: EntityStore + 'static>(
    _admin: AdminUser,
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<Uuid>,
    Json(status): Json<String>,
) -> Result<StatusCode, ApiError> {
    state
        .orders
        .update_status(OrderId::from_uuid(id), &status)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /Orders/:id — delete an order and its details (admin only).
#[tracing::instrument(skip(state, _admin))]
pub async fn delete<S: EntityStore + 'static>(
    _admin: AdminUser,
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.orders.delete(OrderId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
