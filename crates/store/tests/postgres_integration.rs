//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration
//! ```

use std::sync::Arc;

use chrono::Utc;
use common::{CustomerId, Money, OrderDetailId, OrderId, OrderStatus};
use sqlx::PgPool;
use store::{
    CustomerRecord, EntityStore, OrderDetailRecord, OrderRecord, PostgresEntityStore,
    ProductRecord, StoreError,
};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Apply the schema with raw_sql to execute multiple statements
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!("../../../migrations/001_create_tables.sql"))
                .execute(&temp_pool)
                .await
                .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

async fn get_store() -> PostgresEntityStore {
    let info = get_container_info().await;
    let pool = PgPool::connect(&info.connection_string).await.unwrap();
    PostgresEntityStore::new(pool)
}

fn customer(email: &str) -> CustomerRecord {
    CustomerRecord::new(
        "Alice".to_string(),
        email.to_string(),
        "555-0100".to_string(),
        None,
    )
}

fn product(name: &str, price_cents: i64, stock: u32) -> ProductRecord {
    ProductRecord::new(name.to_string(), Money::from_cents(price_cents), None, stock)
}

fn order(customer_id: CustomerId, total_cents: i64) -> OrderRecord {
    OrderRecord {
        id: OrderId::new(),
        customer_id,
        created_at: Utc::now(),
        status: OrderStatus::Pending,
        total_amount: Money::from_cents(total_cents),
    }
}

fn detail(
    order_id: OrderId,
    product: &ProductRecord,
    quantity: u32,
) -> OrderDetailRecord {
    OrderDetailRecord {
        id: OrderDetailId::new(),
        order_id,
        product_id: product.id,
        quantity,
        unit_price: product.price,
    }
}

#[tokio::test]
async fn customer_roundtrip_and_email_lookup() {
    let store = get_store().await;
    let alice = customer("pg-roundtrip@x.com");

    store.insert_customer(&alice).await.unwrap();

    let fetched = store.get_customer(alice.id).await.unwrap().unwrap();
    assert_eq!(fetched, alice);

    let by_email = store
        .find_customer_by_email("pg-roundtrip@x.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, alice.id);

    assert!(
        store
            .find_customer_by_email("pg-missing@x.com")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn duplicate_email_maps_to_duplicate_error() {
    let store = get_store().await;
    store
        .insert_customer(&customer("pg-dup@x.com"))
        .await
        .unwrap();

    let err = store
        .insert_customer(&customer("pg-dup@x.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateEmail(_)));
}

#[tokio::test]
async fn stale_product_update_is_a_version_conflict() {
    let store = get_store().await;
    let mut pen = product("pg-pen-versioned", 1000, 5);
    store.insert_product(&pen).await.unwrap();

    pen.price = Money::from_cents(1100);
    store.update_product(&pen).await.unwrap();

    // Still holding version 1.
    let err = store.update_product(&pen).await.unwrap_err();
    assert!(matches!(err, StoreError::VersionConflict { entity: "Product", .. }));

    let fetched = store.get_product(pen.id).await.unwrap().unwrap();
    assert_eq!(fetched.price, Money::from_cents(1100));
    assert_eq!(fetched.version, 2);
}

#[tokio::test]
async fn create_order_decrements_stock_atomically() {
    let store = get_store().await;
    let alice = customer("pg-order@x.com");
    store.insert_customer(&alice).await.unwrap();
    let pen = product("pg-pen", 1000, 5);
    store.insert_product(&pen).await.unwrap();

    let ord = order(alice.id, 3000);
    store
        .create_order(&ord, &[detail(ord.id, &pen, 3)])
        .await
        .unwrap();

    assert_eq!(store.get_product(pen.id).await.unwrap().unwrap().stock, 2);
    assert!(store.customer_has_orders(alice.id).await.unwrap());

    let details = store.list_order_details(ord.id).await.unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].quantity, 3);
    assert_eq!(details[0].unit_price, Money::from_cents(1000));
}

#[tokio::test]
async fn create_order_shortfall_rolls_back_everything() {
    let store = get_store().await;
    let alice = customer("pg-shortfall@x.com");
    store.insert_customer(&alice).await.unwrap();
    let pen = product("pg-pen-plenty", 1000, 10);
    let ink = product("pg-ink-scarce", 500, 1);
    store.insert_product(&pen).await.unwrap();
    store.insert_product(&ink).await.unwrap();

    let ord = order(alice.id, 0);
    let err = store
        .create_order(
            &ord,
            &[detail(ord.id, &pen, 3), detail(ord.id, &ink, 2)],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::StockConflict(id) if id == ink.id));
    // The first line's decrement must have been rolled back.
    assert_eq!(store.get_product(pen.id).await.unwrap().unwrap().stock, 10);
    assert_eq!(store.get_product(ink.id).await.unwrap().unwrap().stock, 1);
    assert!(store.get_order(ord.id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_order_cascades_details() {
    let store = get_store().await;
    let alice = customer("pg-cascade@x.com");
    store.insert_customer(&alice).await.unwrap();
    let pen = product("pg-pen-cascade", 1000, 5);
    store.insert_product(&pen).await.unwrap();

    let ord = order(alice.id, 1000);
    store
        .create_order(&ord, &[detail(ord.id, &pen, 1)])
        .await
        .unwrap();

    assert!(store.delete_order(ord.id).await.unwrap());
    assert!(store.get_order(ord.id).await.unwrap().is_none());
    assert!(store.list_order_details(ord.id).await.unwrap().is_empty());
    assert!(!store.delete_order(ord.id).await.unwrap());
}

#[tokio::test]
async fn status_overwrite_and_missing_row() {
    let store = get_store().await;
    let alice = customer("pg-status@x.com");
    store.insert_customer(&alice).await.unwrap();
    let pen = product("pg-pen-status", 1000, 5);
    store.insert_product(&pen).await.unwrap();

    let ord = order(alice.id, 1000);
    store
        .create_order(&ord, &[detail(ord.id, &pen, 1)])
        .await
        .unwrap();

    assert!(
        store
            .update_order_status(ord.id, OrderStatus::Completed)
            .await
            .unwrap()
    );
    let fetched = store.get_order(ord.id).await.unwrap().unwrap();
    assert_eq!(fetched.status, OrderStatus::Completed);

    assert!(
        !store
            .update_order_status(OrderId::new(), OrderStatus::Pending)
            .await
            .unwrap()
    );
}
