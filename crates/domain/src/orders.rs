//! The order workflow: creation with stock validation, plus the admin
//! read/update/delete side.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::Utc;
use common::{CustomerId, Money, OrderDetailId, OrderId, OrderStatus, ProductId};
use store::{EntityStore, OrderDetailRecord, OrderRecord, ProductRecord, StoreError};

use crate::error::DomainError;

/// Command to place a new order.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub customer_id: CustomerId,
    pub items: Vec<OrderLine>,
}

/// One requested product + quantity within a [`CreateOrder`].
#[derive(Debug, Clone, Copy)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// An order with its customer and product names resolved for display.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub order: OrderRecord,
    pub customer_name: String,
    pub details: Vec<OrderDetailView>,
}

/// One order line with its product name resolved for display.
///
/// The name falls back to the empty string when the product has since
/// been deleted.
#[derive(Debug, Clone)]
pub struct OrderDetailView {
    pub detail: OrderDetailRecord,
    pub product_name: String,
}

/// Service for placing and managing orders.
pub struct OrderService<S: EntityStore> {
    store: S,
}

impl<S: EntityStore> OrderService<S> {
    /// Creates a new order service with the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Places a new order.
    ///
    /// Validate-then-commit: the customer and every product are checked,
    /// unit prices are snapshotted and the total accumulated, and only
    /// then is the order graph persisted together with the stock
    /// decrements as one atomic unit. Any failure along the way leaves
    /// stock and order state untouched.
    #[tracing::instrument(skip(self, cmd), fields(customer_id = %cmd.customer_id, lines = cmd.items.len()))]
    pub async fn create_order(&self, cmd: CreateOrder) -> Result<OrderView, DomainError> {
        let customer = self
            .store
            .get_customer(cmd.customer_id)
            .await?
            .ok_or(DomainError::NotFound("Customer"))?;

        if cmd.items.is_empty() {
            return Err(DomainError::EmptyOrder);
        }

        let order_id = OrderId::new();
        let mut total = Money::zero();
        let mut details = Vec::with_capacity(cmd.items.len());

        // Load each referenced product once; the cached copy carries a
        // working stock figure so repeated lines for one product are
        // checked against what earlier lines already claimed.
        let mut products: HashMap<ProductId, ProductRecord> = HashMap::new();
        for line in &cmd.items {
            if line.quantity == 0 {
                return Err(DomainError::InvalidQuantity);
            }
            let product = match products.entry(line.product_id) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let fetched = self
                        .store
                        .get_product(line.product_id)
                        .await?
                        .ok_or(DomainError::ProductMissing(line.product_id))?;
                    entry.insert(fetched)
                }
            };
            if product.stock < line.quantity {
                metrics::counter!("orders_rejected_total").increment(1);
                return Err(DomainError::InsufficientStock(product.name.clone()));
            }
            product.stock -= line.quantity;

            let detail = OrderDetailRecord {
                id: OrderDetailId::new(),
                order_id,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: product.price,
            };
            total += detail.subtotal();
            details.push(detail);
        }

        let order = OrderRecord {
            id: order_id,
            customer_id: cmd.customer_id,
            created_at: Utc::now(),
            status: OrderStatus::Pending,
            total_amount: total,
        };

        // The store re-validates stock inside its atomic unit, so a
        // concurrent order that got there first surfaces here as a
        // conflict rather than oversold stock.
        match self.store.create_order(&order, &details).await {
            Ok(()) => {}
            Err(StoreError::StockConflict(product_id)) => {
                metrics::counter!("orders_rejected_total").increment(1);
                let name = products
                    .get(&product_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| product_id.to_string());
                return Err(DomainError::InsufficientStock(name));
            }
            Err(e) => return Err(e.into()),
        }

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %order.id, total_cents = total.cents(), "order placed");

        let details = details
            .into_iter()
            .map(|detail| {
                let product_name = products
                    .get(&detail.product_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_default();
                OrderDetailView {
                    detail,
                    product_name,
                }
            })
            .collect();

        Ok(OrderView {
            order,
            customer_name: customer.name,
            details,
        })
    }

    /// Looks up an order by ID with names resolved.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: OrderId) -> Result<OrderView, DomainError> {
        let order = self
            .store
            .get_order(id)
            .await?
            .ok_or(DomainError::NotFound("Order"))?;
        self.resolve_view(order).await
    }

    /// Returns all orders with names resolved.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<OrderView>, DomainError> {
        let orders = self.store.list_orders().await?;
        let mut views = Vec::with_capacity(orders.len());
        for order in orders {
            views.push(self.resolve_view(order).await?);
        }
        Ok(views)
    }

    /// Overwrites an order's status.
    ///
    /// The raw string must parse as one of the four recognized literals;
    /// beyond that, no transition graph is enforced.
    #[tracing::instrument(skip(self))]
    pub async fn update_status(&self, id: OrderId, status: &str) -> Result<(), DomainError> {
        let status: OrderStatus = status.parse().map_err(|_| DomainError::InvalidStatus)?;
        if !self.store.update_order_status(id, status).await? {
            return Err(DomainError::NotFound("Order"));
        }
        Ok(())
    }

    /// Deletes an order and its details.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: OrderId) -> Result<(), DomainError> {
        if !self.store.delete_order(id).await? {
            return Err(DomainError::NotFound("Order"));
        }
        Ok(())
    }

    async fn resolve_view(&self, order: OrderRecord) -> Result<OrderView, DomainError> {
        let customer_name = self
            .store
            .get_customer(order.customer_id)
            .await?
            .map(|c| c.name)
            .unwrap_or_default();

        let records = self.store.list_order_details(order.id).await?;
        let mut details = Vec::with_capacity(records.len());
        for detail in records {
            let product_name = self
                .store
                .get_product(detail.product_id)
                .await?
                .map(|p| p.name)
                .unwrap_or_default();
            details.push(OrderDetailView {
                detail,
                product_name,
            });
        }

        Ok(OrderView {
            order,
            customer_name,
            details,
        })
    }
}
