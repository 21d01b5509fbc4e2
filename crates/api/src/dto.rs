//! Transfer objects and their mapping to persisted records.
//!
//! Every wire shape is explicit: each field is listed, mapping functions
//! are total, and money crosses the wire as a decimal number of major
//! units while the records keep integer cents.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use common::{CustomerId, Money, OrderDetailId, OrderId, ProductId};
use domain::{CustomerInput, OrderDetailView, OrderView, ProductInput};
use serde::{Deserialize, Serialize};
use store::{CustomerRecord, ProductRecord};

/// Field-level validation failures, keyed by field name.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, Vec<String>>);

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Minimal `local@domain` shape check; uniqueness is the domain's concern.
fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

fn money_from_major_units(amount: f64) -> Money {
    Money::from_cents((amount * 100.0).round() as i64)
}

fn money_to_major_units(money: Money) -> f64 {
    money.cents() as f64 / 100.0
}

// -- Customer --

/// Wire shape of a customer. `id` is absent on create and required to
/// match the path on update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CustomerId>,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
}

impl CustomerDto {
    /// Schema-level field constraints, checked before domain logic runs.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.name.trim().is_empty() {
            errors.push("name", "The Name field is required");
        } else if self.name.len() > 100 {
            errors.push("name", "Name must be at most 100 characters");
        }
        if self.email.is_empty() {
            errors.push("email", "The Email field is required");
        } else if !is_plausible_email(&self.email) {
            errors.push("email", "The Email field is not a valid e-mail address");
        }
        if self.phone.trim().is_empty() {
            errors.push("phone", "The Phone field is required");
        }
        if let Some(address) = &self.address
            && address.len() > 200
        {
            errors.push("address", "Address must be at most 200 characters");
        }
        errors.into_result()
    }

    /// Maps the wire shape to validated domain input.
    pub fn into_input(self) -> CustomerInput {
        CustomerInput {
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
        }
    }

    /// Maps a persisted row to the wire shape.
    pub fn from_record(record: CustomerRecord) -> Self {
        Self {
            id: Some(record.id),
            name: record.name,
            email: record.email,
            phone: record.phone,
            address: record.address,
        }
    }
}

// -- Product --

/// Largest accepted price in major units; keeps line subtotals far away
/// from the integer-cents range limit.
const MAX_PRICE: f64 = 100_000_000.0;

/// Wire shape of a product. Price is in major units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    pub stock: u32,
}

impl ProductDto {
    /// Schema-level field constraints, checked before domain logic runs.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.name.trim().is_empty() {
            errors.push("name", "The Name field is required");
        } else if self.name.len() > 100 {
            errors.push("name", "Name must be at most 100 characters");
        }
        if !self.price.is_finite() || self.price < 0.0 {
            errors.push("price", "Price must be a non-negative number");
        } else if self.price > MAX_PRICE {
            errors.push("price", "Price must be at most 100000000");
        }
        if let Some(description) = &self.description
            && description.len() > 500
        {
            errors.push("description", "Description must be at most 500 characters");
        }
        errors.into_result()
    }

    /// Maps the wire shape to validated domain input.
    pub fn into_input(self) -> ProductInput {
        ProductInput {
            name: self.name,
            price: money_from_major_units(self.price),
            description: self.description,
            stock: self.stock,
        }
    }

    /// Maps a persisted row to the wire shape.
    pub fn from_record(record: ProductRecord) -> Self {
        Self {
            id: Some(record.id),
            name: record.name,
            price: money_to_major_units(record.price),
            description: record.description,
            stock: record.stock,
        }
    }
}

// -- Orders --

/// Request body for placing an order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderDto {
    pub customer_id: CustomerId,
    pub items: Vec<OrderItemDto>,
}

/// One requested line within a [`CreateOrderDto`].
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl CreateOrderDto {
    /// Schema-level constraints; existence and stock are the domain's concern.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.items.is_empty() {
            errors.push("items", "Order must have at least one item");
        }
        if self.items.iter().any(|item| item.quantity == 0) {
            errors.push("items", "Quantity must be greater than 0");
        }
        errors.into_result()
    }

    /// Maps the wire shape to the domain command.
    pub fn into_command(self) -> domain::CreateOrder {
        domain::CreateOrder {
            customer_id: self.customer_id,
            items: self
                .items
                .into_iter()
                .map(|item| domain::OrderLine {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

/// Wire shape of an order with display names resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub created_at: DateTime<Utc>,
    pub status: String,
    pub total_amount: f64,
    pub order_details: Vec<OrderDetailDto>,
}

/// Wire shape of one order line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailDto {
    pub id: OrderDetailId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub subtotal: f64,
}

impl OrderDto {
    /// Maps a resolved order view to the wire shape.
    pub fn from_view(view: OrderView) -> Self {
        Self {
            id: view.order.id,
            customer_id: view.order.customer_id,
            customer_name: view.customer_name,
            created_at: view.order.created_at,
            status: view.order.status.as_str().to_string(),
            total_amount: money_to_major_units(view.order.total_amount),
            order_details: view
                .details
                .into_iter()
                .map(OrderDetailDto::from_view)
                .collect(),
        }
    }
}

impl OrderDetailDto {
    fn from_view(view: OrderDetailView) -> Self {
        Self {
            id: view.detail.id,
            product_id: view.detail.product_id,
            product_name: view.product_name,
            quantity: view.detail.quantity,
            unit_price: money_to_major_units(view.detail.unit_price),
            subtotal: money_to_major_units(view.detail.subtotal()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer_dto() -> CustomerDto {
        CustomerDto {
            id: None,
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            phone: "555-0100".to_string(),
            address: None,
        }
    }

    #[test]
    fn valid_customer_passes() {
        assert!(customer_dto().validate().is_ok());
    }

    #[test]
    fn blank_name_and_bad_email_both_reported() {
        let dto = CustomerDto {
            name: "  ".to_string(),
            email: "not-an-email".to_string(),
            ..customer_dto()
        };
        let errors = dto.validate().unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();
        assert!(json.get("name").is_some());
        assert!(json.get("email").is_some());
    }

    #[test]
    fn overlong_name_rejected() {
        let dto = CustomerDto {
            name: "x".repeat(101),
            ..customer_dto()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn negative_price_rejected() {
        let dto = ProductDto {
            id: None,
            name: "Pen".to_string(),
            price: -0.01,
            description: None,
            stock: 0,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn absurd_price_rejected() {
        let dto = ProductDto {
            id: None,
            name: "Pen".to_string(),
            price: 1e17,
            description: None,
            stock: 1,
        };
        let errors = dto.validate().unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();
        assert!(json.get("price").is_some());
    }

    #[test]
    fn price_maps_to_cents_and_back() {
        let dto = ProductDto {
            id: None,
            name: "Pen".to_string(),
            price: 10.99,
            description: None,
            stock: 5,
        };
        let input = dto.into_input();
        assert_eq!(input.price, Money::from_cents(1099));
        assert_eq!(money_to_major_units(input.price), 10.99);
    }

    #[test]
    fn empty_items_rejected() {
        let dto = CreateOrderDto {
            customer_id: CustomerId::new(),
            items: vec![],
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn zero_quantity_rejected() {
        let dto = CreateOrderDto {
            customer_id: CustomerId::new(),
            items: vec![OrderItemDto {
                product_id: ProductId::new(),
                quantity: 0,
            }],
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn customer_round_trip_preserves_fields() {
        let record = CustomerRecord::new(
            "Alice".to_string(),
            "a@x.com".to_string(),
            "555-0100".to_string(),
            Some("1 Main St".to_string()),
        );
        let dto = CustomerDto::from_record(record.clone());
        assert_eq!(dto.id, Some(record.id));
        let input = dto.into_input();
        assert_eq!(input.name, record.name);
        assert_eq!(input.email, record.email);
        assert_eq!(input.address, record.address);
    }
}
