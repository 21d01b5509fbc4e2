//! Domain services for the order management system.
//!
//! The services sit between the HTTP layer and the entity store:
//! - `CustomerService` and `ProductService` are thin CRUD services with
//!   duplicate-email and referential checks
//! - `OrderService` carries the order-creation workflow (validate, snapshot
//!   prices, compute the total, commit atomically with stock decrements)

pub mod customers;
pub mod error;
pub mod orders;
pub mod products;

pub use customers::{CustomerInput, CustomerService};
pub use error::DomainError;
pub use orders::{CreateOrder, OrderDetailView, OrderLine, OrderService, OrderView};
pub use products::{ProductInput, ProductService};
