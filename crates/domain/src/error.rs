//! Domain error taxonomy.

use common::ProductId;
use store::StoreError;
use thiserror::Error;

/// Errors that can occur during domain operations.
///
/// Messages are human-readable and surface verbatim in API error bodies.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The named entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// An order line referenced a product that does not exist.
    #[error("Product with ID {0} not found")]
    ProductMissing(ProductId),

    /// An order line requested more units than are in stock.
    #[error("Insufficient stock for product: {0}")]
    InsufficientStock(String),

    /// A customer with this email already exists.
    #[error("Email already exists")]
    DuplicateEmail,

    /// The customer is still referenced by at least one order.
    #[error("Cannot delete customer with existing orders")]
    CustomerHasOrders,

    /// The status string is not one of the recognized literals.
    #[error("Invalid status")]
    InvalidStatus,

    /// An order was submitted with no lines.
    #[error("Order must have at least one item")]
    EmptyOrder,

    /// An order line carried a zero quantity.
    #[error("Quantity must be greater than 0")]
    InvalidQuantity,

    /// The row was modified by another request between read and write.
    #[error("The record was modified by another request")]
    Conflict,

    /// An error occurred in the entity store.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail(_) => DomainError::DuplicateEmail,
            other => DomainError::Store(other),
        }
    }
}
