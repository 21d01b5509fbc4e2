use async_trait::async_trait;
use common::{CustomerId, OrderId, OrderStatus, ProductId};

use crate::{
    Result,
    entity::{CustomerRecord, OrderDetailRecord, OrderRecord, ProductRecord},
};

/// The persistence contract for customers, products, and orders.
///
/// Implementations must provide atomic multi-row writes for
/// [`create_order`](EntityStore::create_order): the order row, its details,
/// and the stock decrements land together or not at all, and the decrement
/// re-validates `stock >= quantity` inside the atomic unit so concurrent
/// order creation cannot drive stock negative.
#[async_trait]
pub trait EntityStore: Send + Sync {
    // -- Customers --

    /// Returns all customer rows.
    async fn list_customers(&self) -> Result<Vec<CustomerRecord>>;

    /// Looks up a customer by ID.
    async fn get_customer(&self, id: CustomerId) -> Result<Option<CustomerRecord>>;

    /// Looks up a customer by exact (case-sensitive) email.
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<CustomerRecord>>;

    /// Inserts a new customer row.
    ///
    /// Fails with [`StoreError::DuplicateEmail`](crate::StoreError::DuplicateEmail)
    /// when the email is already taken.
    async fn insert_customer(&self, customer: &CustomerRecord) -> Result<()>;

    /// Updates a customer row, checking the optimistic version token.
    ///
    /// Fails with [`StoreError::VersionConflict`](crate::StoreError::VersionConflict)
    /// when the presented version is stale or the row no longer exists.
    async fn update_customer(&self, customer: &CustomerRecord) -> Result<()>;

    /// Deletes a customer row. Returns false when no such row existed.
    async fn delete_customer(&self, id: CustomerId) -> Result<bool>;

    /// Returns true when at least one order references the customer.
    async fn customer_has_orders(&self, id: CustomerId) -> Result<bool>;

    // -- Products --

    /// Returns all product rows.
    async fn list_products(&self) -> Result<Vec<ProductRecord>>;

    /// Looks up a product by ID.
    async fn get_product(&self, id: ProductId) -> Result<Option<ProductRecord>>;

    /// Inserts a new product row.
    async fn insert_product(&self, product: &ProductRecord) -> Result<()>;

    /// Updates a product row, checking the optimistic version token.
    async fn update_product(&self, product: &ProductRecord) -> Result<()>;

    /// Deletes a product row. Returns false when no such row existed.
    async fn delete_product(&self, id: ProductId) -> Result<bool>;

    // -- Orders --

    /// Returns all order rows.
    async fn list_orders(&self) -> Result<Vec<OrderRecord>>;

    /// Looks up an order by ID.
    async fn get_order(&self, id: OrderId) -> Result<Option<OrderRecord>>;

    /// Returns the lines of an order, in insertion order.
    async fn list_order_details(&self, order_id: OrderId) -> Result<Vec<OrderDetailRecord>>;

    /// Persists a new order graph and decrements stock, all-or-nothing.
    ///
    /// Each detail's product stock is conditionally decremented; if any
    /// product has less stock than the requested quantity (or vanished),
    /// the whole operation fails with
    /// [`StoreError::StockConflict`](crate::StoreError::StockConflict) and
    /// nothing is persisted.
    async fn create_order(
        &self,
        order: &OrderRecord,
        details: &[OrderDetailRecord],
    ) -> Result<()>;

    /// Overwrites an order's status. Returns false when no such row existed.
    async fn update_order_status(&self, id: OrderId, status: OrderStatus) -> Result<bool>;

    /// Deletes an order and its details. Returns false when no such row existed.
    async fn delete_order(&self, id: OrderId) -> Result<bool>;
}
