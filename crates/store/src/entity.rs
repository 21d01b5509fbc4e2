//! Persisted record types.
//!
//! These are the shapes the store reads and writes. The API layer maps
//! them to and from transfer objects; nothing here is wire-visible.

use chrono::{DateTime, Utc};
use common::{CustomerId, Money, OrderDetailId, OrderId, OrderStatus, ProductId};
use serde::{Deserialize, Serialize};

/// A customer row.
///
/// `version` is the optimistic-concurrency token: updates must present the
/// version they read, and the store bumps it on every successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub version: i64,
}

impl CustomerRecord {
    /// Creates a fresh customer row with a new ID at version 1.
    pub fn new(name: String, email: String, phone: String, address: Option<String>) -> Self {
        Self {
            id: CustomerId::new(),
            name,
            email,
            phone,
            address,
            version: 1,
        }
    }
}

/// A product row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub description: Option<String>,
    pub stock: u32,
    pub version: i64,
}

impl ProductRecord {
    /// Creates a fresh product row with a new ID at version 1.
    pub fn new(name: String, price: Money, description: Option<String>, stock: u32) -> Self {
        Self {
            id: ProductId::new(),
            name,
            price,
            description,
            stock,
            version: 1,
        }
    }
}

/// An order row. The total is derived at creation and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub total_amount: Money,
}

/// An order line. `unit_price` is a snapshot of the product price at the
/// time the order was placed and is immune to later price changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetailRecord {
    pub id: OrderDetailId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Money,
}

impl OrderDetailRecord {
    /// Line subtotal: `unit_price × quantity`.
    pub fn subtotal(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}
