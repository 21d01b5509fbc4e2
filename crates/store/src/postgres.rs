use std::str::FromStr;

use async_trait::async_trait;
use common::{CustomerId, Money, OrderDetailId, OrderId, OrderStatus, ProductId};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Result, StoreError,
    entity::{CustomerRecord, OrderDetailRecord, OrderRecord, ProductRecord},
    store::EntityStore,
};

/// PostgreSQL-backed entity store.
#[derive(Clone)]
pub struct PostgresEntityStore {
    pool: PgPool,
}

impl PostgresEntityStore {
    /// Creates a new PostgreSQL entity store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_customer(row: &PgRow) -> Result<CustomerRecord> {
        Ok(CustomerRecord {
            id: CustomerId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            address: row.try_get("address")?,
            version: row.try_get("version")?,
        })
    }

    fn row_to_product(row: &PgRow) -> Result<ProductRecord> {
        Ok(ProductRecord {
            id: ProductId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            price: Money::from_cents(row.try_get("price_cents")?),
            description: row.try_get("description")?,
            stock: count_from_db(row.try_get("stock")?)?,
            version: row.try_get("version")?,
        })
    }

    fn row_to_order(row: &PgRow) -> Result<OrderRecord> {
        let status: String = row.try_get("status")?;
        Ok(OrderRecord {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            customer_id: CustomerId::from_uuid(row.try_get::<Uuid, _>("customer_id")?),
            created_at: row.try_get("created_at")?,
            status: OrderStatus::from_str(&status)
                .map_err(|e| StoreError::Database(sqlx::Error::Decode(Box::new(e))))?,
            total_amount: Money::from_cents(row.try_get("total_amount_cents")?),
        })
    }

    fn row_to_detail(row: &PgRow) -> Result<OrderDetailRecord> {
        Ok(OrderDetailRecord {
            id: OrderDetailId::from_uuid(row.try_get::<Uuid, _>("id")?),
            order_id: OrderId::from_uuid(row.try_get::<Uuid, _>("order_id")?),
            product_id: ProductId::from_uuid(row.try_get::<Uuid, _>("product_id")?),
            quantity: count_from_db(row.try_get("quantity")?)?,
            unit_price: Money::from_cents(row.try_get("unit_price_cents")?),
        })
    }
}

/// Converts a stored count column back to `u32`. The schema CHECKs keep
/// these columns non-negative, so a failure here means corrupt data.
fn count_from_db(value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|e| StoreError::Database(sqlx::Error::Decode(Box::new(e))))
}

fn map_email_violation(e: sqlx::Error, email: &str) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.constraint() == Some("customers_email_key")
    {
        return StoreError::DuplicateEmail(email.to_string());
    }
    StoreError::Database(e)
}

#[async_trait]
impl EntityStore for PostgresEntityStore {
    async fn list_customers(&self) -> Result<Vec<CustomerRecord>> {
        let rows = sqlx::query(
            "SELECT id, name, email, phone, address, version FROM customers ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_customer).collect()
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Option<CustomerRecord>> {
        let row = sqlx::query(
            "SELECT id, name, email, phone, address, version FROM customers WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_customer).transpose()
    }

    async fn find_customer_by_email(&self, email: &str) -> Result<Option<CustomerRecord>> {
        let row = sqlx::query(
            "SELECT id, name, email, phone, address, version FROM customers WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_customer).transpose()
    }

    async fn insert_customer(&self, customer: &CustomerRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO customers (id, name, email, phone, address, version)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(customer.id.as_uuid())
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(customer.version)
        .execute(&self.pool)
        .await
        .map_err(|e| map_email_violation(e, &customer.email))?;

        Ok(())
    }

    async fn update_customer(&self, customer: &CustomerRecord) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET name = $2, email = $3, phone = $4, address = $5, version = version + 1
            WHERE id = $1 AND version = $6
            "#,
        )
        .bind(customer.id.as_uuid())
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(customer.version)
        .execute(&self.pool)
        .await
        .map_err(|e| map_email_violation(e, &customer.email))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::VersionConflict {
                entity: "Customer",
                id: customer.id.as_uuid(),
            });
        }
        Ok(())
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn customer_has_orders(&self, id: CustomerId) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM orders WHERE customer_id = $1)")
                .bind(id.as_uuid())
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn list_products(&self) -> Result<Vec<ProductRecord>> {
        let rows = sqlx::query(
            "SELECT id, name, price_cents, description, stock, version FROM products ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_product).collect()
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<ProductRecord>> {
        let row = sqlx::query(
            "SELECT id, name, price_cents, description, stock, version FROM products WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_product).transpose()
    }

    async fn insert_product(&self, product: &ProductRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, price_cents, description, stock, version)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(product.price.cents())
        .bind(&product.description)
        .bind(i64::from(product.stock))
        .bind(product.version)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_product(&self, product: &ProductRecord) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, price_cents = $3, description = $4, stock = $5, version = version + 1
            WHERE id = $1 AND version = $6
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(product.price.cents())
        .bind(&product.description)
        .bind(i64::from(product.stock))
        .bind(product.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::VersionConflict {
                entity: "Product",
                id: product.id.as_uuid(),
            });
        }
        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_orders(&self) -> Result<Vec<OrderRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, customer_id, created_at, status, total_amount_cents
            FROM orders ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_order).collect()
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<OrderRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, customer_id, created_at, status, total_amount_cents
            FROM orders WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_order).transpose()
    }

    async fn list_order_details(&self, order_id: OrderId) -> Result<Vec<OrderDetailRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, order_id, product_id, quantity, unit_price_cents
            FROM order_details WHERE order_id = $1 ORDER BY line_no
            "#,
        )
        .bind(order_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_detail).collect()
    }

    async fn create_order(
        &self,
        order: &OrderRecord,
        details: &[OrderDetailRecord],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        // Conditional decrement re-validates stock inside the transaction;
        // zero rows affected means a shortfall (or a vanished product),
        // which aborts the whole order before anything is inserted.
        for detail in details {
            let result = sqlx::query(
                r#"
                UPDATE products
                SET stock = stock - $2, version = version + 1
                WHERE id = $1 AND stock >= $2
                "#,
            )
            .bind(detail.product_id.as_uuid())
            .bind(i64::from(detail.quantity))
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(StoreError::StockConflict(detail.product_id));
            }
        }

        sqlx::query(
            r#"
            INSERT INTO orders (id, customer_id, created_at, status, total_amount_cents)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.customer_id.as_uuid())
        .bind(order.created_at)
        .bind(order.status.as_str())
        .bind(order.total_amount.cents())
        .execute(&mut *tx)
        .await?;

        for (line_no, detail) in details.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_details (id, order_id, product_id, quantity, unit_price_cents, line_no)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(detail.id.as_uuid())
            .bind(detail.order_id.as_uuid())
            .bind(detail.product_id.as_uuid())
            .bind(i64::from(detail.quantity))
            .bind(detail.unit_price.cents())
            .bind(line_no as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn update_order_status(&self, id: OrderId, status: OrderStatus) -> Result<bool> {
        let result = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_order(&self, id: OrderId) -> Result<bool> {
        // order_details cascade on delete.
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
