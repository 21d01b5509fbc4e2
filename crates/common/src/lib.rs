//! Shared types for the order management system.
//!
//! Provides the typed identifiers, the `Money` value type, and the
//! `OrderStatus` enum used across the store, domain, and API crates.

pub mod types;

pub use types::{
    CustomerId, Money, OrderDetailId, OrderId, OrderStatus, ParseStatusError, ProductId,
};
