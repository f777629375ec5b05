#![allow(dead_code)]

use ecommerce_data_api::{
    entity::{categories, customers, enums::Currency, products},
    migration::Migrator,
    state::AppState,
    unit_of_work::UnitOfWork,
};
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

/// A fresh, migrated in-memory database. One connection, so every handle sees the same data.
pub async fn connect() -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let conn = Database::connect(options).await?;
    Migrator::up(&conn, None).await?;
    Ok(conn)
}

pub async fn state() -> anyhow::Result<AppState> {
    Ok(AppState::new(connect().await?))
}

/// Adds and saves a category.
pub async fn category(
    uow: &UnitOfWork,
    name: &str,
    parent: Option<Uuid>,
) -> anyhow::Result<categories::Model> {
    let category = uow
        .categories()
        .add(categories::Model::new(name, format!("{name} department"), parent))
        .await;
    uow.save_changes().await?;
    Ok(category)
}

pub fn product(
    category_id: Uuid,
    name: &str,
    sku: &str,
    price: Decimal,
    stock: i32,
) -> products::Model {
    products::Model::new(category_id, name, sku, price, Currency::Usd, stock)
}

pub fn customer(first_name: &str, email: &str) -> customers::Model {
    customers::Model::new(first_name, "Tester", email)
        .with_phone_number("+1 555 0100")
        .with_address("1 Main Street", "Springfield", "USA", "12345")
}
