//! Entity store for the order management system.
//!
//! The store is the persistence boundary: it speaks in plain record types
//! and guarantees atomic multi-row writes for order creation. Two
//! implementations are provided — an in-memory store for tests and local
//! runs, and a PostgreSQL store backed by sqlx.

pub mod entity;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use entity::{CustomerRecord, OrderDetailRecord, OrderRecord, ProductRecord};
pub use error::{Result, StoreError};
pub use memory::InMemoryEntityStore;
pub use postgres::PostgresEntityStore;
pub use store::EntityStore;
