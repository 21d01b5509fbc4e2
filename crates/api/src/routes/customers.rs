//! Customer CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::CustomerId;
use store::EntityStore;
use uuid::Uuid;

use crate::auth::{AdminUser, AuthUser};
use crate::dto::CustomerDto;
use crate::error::ApiError;
use crate::routes::AppState;

/// GET /Customers — list all customers (admin only).
#[tracing::instrument(skip(state, _admin))]
pub async fn list<S: EntityStore + 'static>(
    _admin: AdminUser,
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<CustomerDto>>, ApiError> {
    let customers = state.customers.list().await?;
    Ok(Json(
        customers.into_iter().map(CustomerDto::from_record).collect(),
    ))
}

/// GET /Customers/:id — fetch one customer.
#[tracing::instrument(skip(state, _user))]
pub async fn get<S: EntityStore + 'static>(
    _user: AuthUser,
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerDto>, ApiError> {
    let customer = state.customers.get(CustomerId::from_uuid(id)).await?;
    Ok(Json(CustomerDto::from_record(customer)))
}

/// POST /Customers — create a customer (admin only).
#[tracing::instrument(skip(state, _admin, dto))]
pub async fn create<S: EntityStore + 'static>(
    _admin: AdminUser,
    State(state): State<Arc<AppState<S>>>,
    Json(dto): Json<CustomerDto>,
) -> Result<(StatusCode, Json<CustomerDto>), ApiError> {
    dto.validate()?;
    let customer = state.customers.create(dto.into_input()).await?;
    Ok((StatusCode::CREATED, Json(CustomerDto::from_record(customer))))
}

/// PUT /Customers/:id — update a customer (admin only).
#[tracing::instrument(skip(state, _admin, dto))]
pub async fn update<S: EntityStore + 'static>(
    _admin: AdminUser,
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<Uuid>,
    Json(dto): Json<CustomerDto>,
) -> Result<StatusCode, ApiError> {
    let id = CustomerId::from_uuid(id);
    if dto.id != Some(id) {
        return Err(ApiError::BadRequest("ID mismatch".to_string()));
    }
    dto.validate()?;
    state.customers.update(id, dto.into_input()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /Customers/:id — delete a customer (admin only); blocked while
/// any order references it.
#[tracing::instrument(skip(state, _admin))]
pub async fn delete<S: EntityStore + 'static>(
    _admin: AdminUser,
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.customers.delete(CustomerId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
