use thiserror::Error;
use uuid::Uuid;

use common::ProductId;

/// Errors that can occur when interacting with the entity store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An update presented a stale version, or the row was deleted
    /// concurrently. Callers re-check existence to tell the two apart.
    #[error("Version conflict on {entity} {id}")]
    VersionConflict { entity: &'static str, id: Uuid },

    /// The atomic stock decrement during order creation found less stock
    /// than requested (or the product row gone).
    #[error("Insufficient stock for product {0}")]
    StockConflict(ProductId),

    /// A unique-email constraint was violated on insert or update.
    #[error("Email already exists")]
    DuplicateEmail(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for entity store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
