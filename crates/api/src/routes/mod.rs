//! Route handlers, grouped by resource.

pub mod customers;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;

use domain::{CustomerService, OrderService, ProductService};
use store::EntityStore;

use crate::auth::AuthKeys;

/// Shared application state accessible from all handlers.
pub struct AppState<S: EntityStore> {
    pub customers: CustomerService<S>,
    pub products: ProductService<S>,
    pub orders: OrderService<S>,
    pub auth: AuthKeys,
}
