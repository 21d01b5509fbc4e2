use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use common::{CustomerId, OrderId, OrderStatus, ProductId};

use crate::{
    Result, StoreError,
    entity::{CustomerRecord, OrderDetailRecord, OrderRecord, ProductRecord},
    store::EntityStore,
};

#[derive(Default)]
struct Tables {
    customers: HashMap<CustomerId, CustomerRecord>,
    products: HashMap<ProductId, ProductRecord>,
    orders: HashMap<OrderId, OrderRecord>,
    details: HashMap<OrderId, Vec<OrderDetailRecord>>,
}

/// In-memory entity store for tests and local runs.
///
/// All tables live behind a single `RwLock`, so `create_order` holds one
/// write guard across the stock checks, the decrements, and the inserts —
/// that is what makes it atomic here.
#[derive(Clone, Default)]
pub struct InMemoryEntityStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryEntityStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all tables.
    pub async fn clear(&self) {
        let mut tables = self.tables.write().await;
        tables.customers.clear();
        tables.products.clear();
        tables.orders.clear();
        tables.details.clear();
    }
}

#[async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn list_customers(&self) -> Result<Vec<CustomerRecord>> {
        let tables = self.tables.read().await;
        let mut customers: Vec<_> = tables.customers.values().cloned().collect();
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(customers)
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Option<CustomerRecord>> {
        Ok(self.tables.read().await.customers.get(&id).cloned())
    }

    async fn find_customer_by_email(&self, email: &str) -> Result<Option<CustomerRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .customers
            .values()
            .find(|c| c.email == email)
            .cloned())
    }

    async fn insert_customer(&self, customer: &CustomerRecord) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.customers.values().any(|c| c.email == customer.email) {
            return Err(StoreError::DuplicateEmail(customer.email.clone()));
        }
        tables.customers.insert(customer.id, customer.clone());
        Ok(())
    }

    async fn update_customer(&self, customer: &CustomerRecord) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables
            .customers
            .values()
            .any(|c| c.email == customer.email && c.id != customer.id)
        {
            return Err(StoreError::DuplicateEmail(customer.email.clone()));
        }
        match tables.customers.get_mut(&customer.id) {
            Some(existing) if existing.version == customer.version => {
                *existing = CustomerRecord {
                    version: customer.version + 1,
                    ..customer.clone()
                };
                Ok(())
            }
            _ => Err(StoreError::VersionConflict {
                entity: "Customer",
                id: customer.id.as_uuid(),
            }),
        }
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<bool> {
        Ok(self.tables.write().await.customers.remove(&id).is_some())
    }

    async fn customer_has_orders(&self, id: CustomerId) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables.orders.values().any(|o| o.customer_id == id))
    }

    async fn list_products(&self) -> Result<Vec<ProductRecord>> {
        let tables = self.tables.read().await;
        let mut products: Vec<_> = tables.products.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<ProductRecord>> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn insert_product(&self, product: &ProductRecord) -> Result<()> {
        self.tables
            .write()
            .await
            .products
            .insert(product.id, product.clone());
        Ok(())
    }

    async fn update_product(&self, product: &ProductRecord) -> Result<()> {
        let mut tables = self.tables.write().await;
        match tables.products.get_mut(&product.id) {
            Some(existing) if existing.version == product.version => {
                *existing = ProductRecord {
                    version: product.version + 1,
                    ..product.clone()
                };
                Ok(())
            }
            _ => Err(StoreError::VersionConflict {
                entity: "Product",
                id: product.id.as_uuid(),
            }),
        }
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool> {
        Ok(self.tables.write().await.products.remove(&id).is_some())
    }

    async fn list_orders(&self) -> Result<Vec<OrderRecord>> {
        let tables = self.tables.read().await;
        let mut orders: Vec<_> = tables.orders.values().cloned().collect();
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<OrderRecord>> {
        Ok(self.tables.read().await.orders.get(&id).cloned())
    }

    async fn list_order_details(&self, order_id: OrderId) -> Result<Vec<OrderDetailRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.details.get(&order_id).cloned().unwrap_or_default())
    }

    async fn create_order(
        &self,
        order: &OrderRecord,
        details: &[OrderDetailRecord],
    ) -> Result<()> {
        let mut tables = self.tables.write().await;

        // Re-validate every line before touching anything; a single
        // shortfall aborts with no decrements applied. Quantities are
        // aggregated per product so repeated lines cannot slip past the
        // per-line check.
        let mut required: HashMap<ProductId, u64> = HashMap::new();
        for detail in details {
            let needed = required.entry(detail.product_id).or_insert(0);
            *needed += u64::from(detail.quantity);
            match tables.products.get(&detail.product_id) {
                Some(product) if u64::from(product.stock) >= *needed => {}
                _ => return Err(StoreError::StockConflict(detail.product_id)),
            }
        }

        for (product_id, needed) in required {
            if let Some(product) = tables.products.get_mut(&product_id) {
                product.stock -= needed as u32;
                product.version += 1;
            }
        }

        tables.orders.insert(order.id, order.clone());
        tables.details.insert(order.id, details.to_vec());
        Ok(())
    }

    async fn update_order_status(&self, id: OrderId, status: OrderStatus) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables.orders.get_mut(&id) {
            Some(order) => {
                order.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_order(&self, id: OrderId) -> Result<bool> {
        let mut tables = self.tables.write().await;
        tables.details.remove(&id);
        Ok(tables.orders.remove(&id).is_some())
    }
}
