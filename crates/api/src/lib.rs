//! HTTP API server for the order management system.
//!
//! Exposes authenticated REST endpoints for customers, products, and
//! orders, with structured logging (tracing) and Prometheus metrics.

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, put};
use domain::{CustomerService, OrderService, ProductService};
use metrics_exporter_prometheus::PrometheusHandle;
use store::EntityStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use auth::AuthKeys;
use routes::AppState;

/// Creates the application state wrapping the given store.
pub fn create_state<S: EntityStore + Clone + 'static>(
    store: S,
    jwt_secret: &str,
) -> Arc<AppState<S>> {
    Arc::new(AppState {
        customers: CustomerService::new(store.clone()),
        products: ProductService::new(store.clone()),
        orders: OrderService::new(store),
        auth: AuthKeys::new(jwt_secret),
    })
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: EntityStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/Customers",
            get(routes::customers::list::<S>).post(routes::customers::create::<S>),
        )
        .route(
            "/Customers/{id}",
            get(routes::customers::get::<S>)
                .put(routes::customers::update::<S>)
                .delete(routes::customers::delete::<S>),
        )
        .route(
            "/Products",
            get(routes::products::list::<S>).post(routes::products::create::<S>),
        )
        .route(
            "/Products/{id}",
            get(routes::products::get::<S>)
                .put(routes::products::update::<S>)
                .delete(routes::products::delete::<S>),
        )
        .route(
            "/Orders",
            get(routes::orders::list::<S>).post(routes::orders::create::<S>),
        )
        .route(
            "/Orders/{id}",
            get(routes::orders::get::<S>).delete(routes::orders::delete::<S>),
        )
        .route("/Orders/{id}/status", put(routes::orders::update_status::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
