use ecommerce_data_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{categories, customers, enums::Currency, products},
    repository::Filter,
    unit_of_work::UnitOfWork,
};
use rust_decimal::Decimal;
use sea_orm::ColumnTrait;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let uow = UnitOfWork::new(orm);
    uow.begin_transaction().await?;

    let electronics = ensure_category(&uow, "Electronics", "Devices and gadgets", None).await?;
    let phones = ensure_category(&uow, "Phones", "Smartphones", Some(electronics)).await?;
    let books = ensure_category(&uow, "Books", "Printed and digital books", None).await?;
    uow.save_changes().await?;

    seed_products(&uow, phones, books).await?;
    ensure_customer(&uow, "Ada", "Lovelace", "ada@example.com").await?;
    let written = uow.save_changes().await?;

    uow.commit_transaction().await?;
    println!("Seed completed, {written} rows written in the last batch");
    Ok(())
}

async fn ensure_category(
    uow: &UnitOfWork,
    name: &str,
    description: &str,
    parent: Option<Uuid>,
) -> anyhow::Result<Uuid> {
    let existing = uow
        .categories()
        .get(Filter::new(categories::Column::Name.eq(name)), &[], false)
        .await?;
    if let Some(category) = existing {
        return Ok(category.id);
    }

    let category = uow
        .categories()
        .add(categories::Model::new(name, description, parent))
        .await;
    println!("Staged category {name}");
    Ok(category.id)
}

async fn seed_products(uow: &UnitOfWork, phones: Uuid, books: Uuid) -> anyhow::Result<()> {
    let products = vec![
        (phones, "Ferris Phone", "PH-FERRIS", Decimal::new(69_900, 2), Currency::Usd, 25),
        (phones, "Crab Phone Mini", "PH-CRAB-MINI", Decimal::new(49_900, 2), Currency::Eur, 8),
        (books, "Async Rust", "BK-ASYNC", Decimal::new(3_999, 2), Currency::Usd, 120),
        (books, "Ownership Explained", "BK-OWN", Decimal::new(2_450, 2), Currency::Gbp, 3),
    ];

    for (category_id, name, sku, price, currency, stock) in products {
        if !uow.products().is_sku_unique(sku).await? {
            continue;
        }
        uow.products()
            .add(
                products::Model::new(category_id, name, sku, price, currency, stock)
                    .with_description(format!("{name} demo product")),
            )
            .await;
        println!("Staged product {sku}");
    }
    Ok(())
}

async fn ensure_customer(
    uow: &UnitOfWork,
    first_name: &str,
    last_name: &str,
    email: &str,
) -> anyhow::Result<()> {
    if !uow.customers().is_email_unique(email).await? {
        return Ok(());
    }
    uow.customers()
        .add(
            customers::Model::new(first_name, last_name, email)
                .with_phone_number("+44 20 7946 0000")
                .with_address("12 Analytical Row", "London", "United Kingdom", "N1 9GU"),
        )
        .await;
    println!("Staged customer {email}");
    Ok(())
}
