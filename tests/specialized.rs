mod common;

use chrono::Duration;
use ecommerce_data_api::{
    audit,
    entity::{
        ShoppingCarts, cart_items, customers,
        enums::{Currency, OrderStatus, PaymentMethod},
        order_items, orders, products, shopping_carts,
    },
    error::AppError,
    repository::CategoryInclude,
    unit_of_work::UnitOfWork,
};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, sea_query::Expr};

#[tokio::test]
async fn category_tree_queries() -> anyhow::Result<()> {
    let uow = UnitOfWork::new(common::connect().await?);
    let electronics = common::category(&uow, "Electronics", None).await?;
    let phones = common::category(&uow, "Phones", Some(electronics.id)).await?;
    common::category(&uow, "Books", None).await?;

    let roots: Vec<String> = uow
        .categories()
        .root_categories()
        .await?
        .into_iter()
        .map(|c| c.model.name)
        .collect();
    assert_eq!(roots, vec!["Books", "Electronics"]);

    let children = uow.categories().sub_categories(electronics.id).await?;
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, phones.id);

    let loaded = uow
        .categories()
        .find_by_id(
            phones.id,
            &[CategoryInclude::Parent, CategoryInclude::SubCategories],
            false,
        )
        .await?
        .expect("phones");
    assert_eq!(
        loaded.related.parent.as_ref().map(|p| p.name.as_str()),
        Some("Electronics")
    );
    assert!(loaded.related.sub_categories.is_empty());

    let active = uow.categories().active_categories().await?;
    assert_eq!(active.len(), 3);
    Ok(())
}

#[tokio::test]
async fn category_products_skip_soft_deleted_rows() -> anyhow::Result<()> {
    let uow = UnitOfWork::new(common::connect().await?);
    let books = common::category(&uow, "Books", None).await?;
    uow.products()
        .add(common::product(books.id, "Dune", "BK-1", Decimal::new(1250, 2), 4))
        .await;
    let gone = uow
        .products()
        .add(common::product(books.id, "Gone", "BK-2", Decimal::new(1250, 2), 4))
        .await;
    uow.save_changes().await?;
    uow.products().delete(gone, false).await;
    uow.save_changes().await?;

    let loaded = uow.categories().with_products(books.id).await?.expect("books");
    let names: Vec<&str> = loaded
        .related
        .products
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["Dune"]);
    Ok(())
}

#[tokio::test]
async fn product_lookups() -> anyhow::Result<()> {
    let uow = UnitOfWork::new(common::connect().await?);
    let books = common::category(&uow, "Books", None).await?;
    uow.products()
        .add(common::product(books.id, "Dune", "BK-1", Decimal::new(1250, 2), 40))
        .await;
    uow.products()
        .add(common::product(books.id, "Emma", "BK-2", Decimal::new(900, 2), 2))
        .await;
    uow.products()
        .add(products::Model::new(
            books.id,
            "Faust",
            "BK-3",
            Decimal::new(1100, 2),
            Currency::Eur,
            0,
        ))
        .await;
    let hidden = uow
        .products()
        .add(common::product(books.id, "Hidden", "BK-4", Decimal::new(500, 2), 1))
        .await;
    uow.save_changes().await?;
    uow.products()
        .update(products::Model {
            is_active: false,
            ..hidden
        })
        .await;
    uow.save_changes().await?;

    let active: Vec<String> = uow
        .products()
        .active_products()
        .await?
        .into_iter()
        .map(|p| p.model.name)
        .collect();
    assert_eq!(active, vec!["Dune", "Emma", "Faust"]);

    let low: Vec<String> = uow
        .products()
        .low_stock(5)
        .await?
        .into_iter()
        .map(|p| p.model.sku)
        .collect();
    assert_eq!(low, vec!["BK-3", "BK-2"]);

    let euro = uow.products().by_currency(Currency::Eur).await?;
    assert_eq!(euro.len(), 1);
    assert_eq!(euro[0].name, "Faust");

    let dune = uow.products().by_sku("BK-1").await?.expect("dune");
    assert_eq!(
        dune.related.category.as_ref().map(|c| c.name.as_str()),
        Some("Books")
    );
    assert_eq!(uow.products().by_category(books.id).await?.len(), 3);
    Ok(())
}

#[tokio::test]
async fn duplicate_sku_is_reported_before_and_at_save() -> anyhow::Result<()> {
    let uow = UnitOfWork::new(common::connect().await?);
    let books = common::category(&uow, "Books", None).await?;
    uow.products()
        .add(common::product(books.id, "Dune", "SKU-1", Decimal::new(1250, 2), 4))
        .await;
    uow.save_changes().await?;

    assert!(!uow.products().is_sku_unique("SKU-1").await?);
    assert!(uow.products().is_sku_unique("SKU-2").await?);

    uow.products()
        .add(common::product(books.id, "Copy", "SKU-1", Decimal::new(1250, 2), 4))
        .await;
    let err = uow
        .save_changes()
        .await
        .map_err(AppError::constraint_as_conflict)
        .expect_err("unique index");
    assert!(matches!(err, AppError::Conflict(_)));
    Ok(())
}

async fn place_order(
    uow: &UnitOfWork,
    customer_id: uuid::Uuid,
    product: &products::Model,
    quantity: i32,
    status: OrderStatus,
    days_ago: i64,
) -> anyhow::Result<orders::Model> {
    let order = uow
        .orders()
        .add(orders::Model {
            status,
            order_date: audit::now() - Duration::days(days_ago),
            total_amount: order_items::line_total(quantity, product.price),
            ..orders::Model::new(customer_id, PaymentMethod::Cash)
                .with_shipping("1 Main Street", "Springfield", "USA", "12345")
        })
        .await;
    uow.order_items()
        .add(order_items::Model::new(order.id, product, quantity))
        .await;
    uow.save_changes().await?;
    Ok(order)
}

#[tokio::test]
async fn customer_and_order_lookups() -> anyhow::Result<()> {
    let uow = UnitOfWork::new(common::connect().await?);
    let books = common::category(&uow, "Books", None).await?;
    let dune = uow
        .products()
        .add(common::product(books.id, "Dune", "BK-1", Decimal::new(1250, 2), 40))
        .await;
    let ada = uow.customers().add(common::customer("Ada", "ada@example.com")).await;
    let bob = uow
        .customers()
        .add(
            customers::Model::new("Bob", "Builder", "bob@example.com")
                .with_address("2 Side Street", "Leeds", "UK", "LS1"),
        )
        .await;
    uow.save_changes().await?;

    let old = place_order(&uow, ada.id, &dune, 2, OrderStatus::Delivered, 10).await?;
    let recent = place_order(&uow, ada.id, &dune, 1, OrderStatus::Pending, 1).await?;
    place_order(&uow, bob.id, &dune, 3, OrderStatus::Pending, 0).await?;

    // customers
    assert!(uow.customers().by_email("ada@example.com").await?.is_some());
    assert!(!uow.customers().is_email_unique("ada@example.com").await?);
    assert!(uow.customers().is_email_unique("eve@example.com").await?);
    assert_eq!(uow.customers().by_country("UK").await?.len(), 1);
    assert_eq!(uow.customers().by_city("Springfield").await?.len(), 1);
    assert_eq!(uow.customers().active_customers().await?.len(), 2);

    let with_orders = uow.customers().with_orders(ada.id).await?.expect("ada");
    assert_eq!(with_orders.related.orders.len(), 2);
    assert!(with_orders.related.orders.iter().all(|o| o.related.items.len() == 1));

    // orders
    let ada_orders: Vec<_> = uow
        .orders()
        .by_customer(ada.id)
        .await?
        .into_iter()
        .map(|o| o.model.id)
        .collect();
    assert_eq!(ada_orders, vec![recent.id, old.id]);

    assert_eq!(uow.orders().by_status(OrderStatus::Pending).await?.len(), 2);

    let by_number = uow
        .orders()
        .by_order_number(&old.order_number)
        .await?
        .expect("order by number");
    assert_eq!(by_number.id, old.id);
    assert_eq!(
        by_number.related.customer.as_ref().map(|c| c.email.as_str()),
        Some("ada@example.com")
    );

    let in_range = uow
        .orders()
        .by_date_range(audit::now() - Duration::days(5), audit::now())
        .await?;
    assert_eq!(in_range.len(), 2);
    assert!(in_range.iter().all(|o| o.id != old.id));

    let detailed = uow.orders().with_items(old.id).await?.expect("order");
    let item = &detailed.related.items[0];
    assert_eq!(item.quantity, 2);
    assert_eq!(item.total_price, Decimal::new(2500, 2));
    assert_eq!(
        item.related.product.as_ref().map(|p| p.sku.as_str()),
        Some("BK-1")
    );

    // order items
    let lines = uow.order_items().by_order(old.id).await?;
    assert_eq!(lines.len(), 1);
    assert!(lines[0].related.product.is_some());
    let sold = uow.order_items().by_product(dune.id).await?;
    assert_eq!(sold.len(), 3);
    assert!(sold.iter().all(|l| l.related.order.is_some()));
    Ok(())
}

#[tokio::test]
async fn cart_lookups() -> anyhow::Result<()> {
    let conn = common::connect().await?;
    let uow = UnitOfWork::new(conn.clone());
    let books = common::category(&uow, "Books", None).await?;
    let dune = uow
        .products()
        .add(common::product(books.id, "Dune", "BK-1", Decimal::new(1250, 2), 40))
        .await;
    let emma = uow
        .products()
        .add(common::product(books.id, "Emma", "BK-2", Decimal::new(900, 2), 40))
        .await;
    let ada = uow.customers().add(common::customer("Ada", "ada@example.com")).await;
    uow.save_changes().await?;

    let stale = uow.shopping_carts().add(shopping_carts::Model::new(ada.id)).await;
    uow.save_changes().await?;
    let current = uow.shopping_carts().add(shopping_carts::Model::new(ada.id)).await;
    uow.cart_items()
        .add(cart_items::Model::new(current.id, dune.id, 1, dune.price))
        .await;
    uow.cart_items()
        .add(cart_items::Model::new(current.id, emma.id, 2, emma.price))
        .await;
    uow.save_changes().await?;

    // age the first cart past the abandonment cutoff
    ShoppingCarts::update_many()
        .col_expr(
            shopping_carts::Column::CreatedAt,
            Expr::value(audit::now() - Duration::days(30)),
        )
        .filter(shopping_carts::Column::Id.eq(stale.id))
        .exec(&conn)
        .await?;

    let latest = uow
        .shopping_carts()
        .by_customer(ada.id)
        .await?
        .expect("latest cart");
    assert_eq!(latest.id, current.id);
    assert_eq!(latest.related.items.len(), 2);
    assert!(latest.related.items.iter().all(|i| i.related.product.is_some()));

    let detailed = uow
        .shopping_carts()
        .with_items(current.id)
        .await?
        .expect("cart");
    assert_eq!(
        detailed.related.customer.as_ref().map(|c| c.id),
        Some(ada.id)
    );

    let abandoned = uow.shopping_carts().abandoned(7).await?;
    assert_eq!(abandoned.len(), 1);
    assert_eq!(abandoned[0].id, stale.id);

    assert_eq!(uow.cart_items().by_cart(current.id).await?.len(), 2);
    let line = uow
        .cart_items()
        .by_cart_and_product(current.id, emma.id)
        .await?
        .expect("cart line");
    assert_eq!(line.quantity, 2);
    assert!(
        uow.cart_items()
            .by_cart_and_product(stale.id, emma.id)
            .await?
            .is_none()
    );

    let result = uow.shopping_carts().abandoned(i64::MAX).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn the_same_product_twice_in_a_cart_fails_at_save() -> anyhow::Result<()> {
    let uow = UnitOfWork::new(common::connect().await?);
    let books = common::category(&uow, "Books", None).await?;
    let dune = uow
        .products()
        .add(common::product(books.id, "Dune", "BK-1", Decimal::new(1250, 2), 40))
        .await;
    let ada = uow.customers().add(common::customer("Ada", "ada@example.com")).await;
    let cart = uow.shopping_carts().add(shopping_carts::Model::new(ada.id)).await;
    uow.cart_items()
        .add(cart_items::Model::new(cart.id, dune.id, 1, dune.price))
        .await;
    uow.save_changes().await?;

    uow.cart_items()
        .add(cart_items::Model::new(cart.id, dune.id, 3, dune.price))
        .await;
    let err = uow.save_changes().await.expect_err("duplicate cart line");
    assert!(matches!(err, AppError::OrmError(_)));
    assert!(matches!(err.constraint_as_conflict(), AppError::Conflict(_)));

    assert_eq!(uow.discard_changes().await, 1);
    assert_eq!(uow.cart_items().by_cart(cart.id).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn a_taken_email_fails_at_save() -> anyhow::Result<()> {
    let uow = UnitOfWork::new(common::connect().await?);
    uow.customers().add(common::customer("Ada", "ada@example.com")).await;
    uow.save_changes().await?;

    uow.customers().add(common::customer("Eve", "ada@example.com")).await;
    let err = uow.save_changes().await.expect_err("duplicate email");
    assert!(matches!(err, AppError::OrmError(_)));
    assert!(matches!(err.constraint_as_conflict(), AppError::Conflict(_)));

    uow.discard_changes().await;
    let stored = uow
        .customers()
        .by_email("ada@example.com")
        .await?
        .expect("first customer");
    assert_eq!(stored.first_name, "Ada");
    Ok(())
}

#[tokio::test]
async fn permanently_deleting_a_cart_removes_its_lines() -> anyhow::Result<()> {
    let uow = UnitOfWork::new(common::connect().await?);
    let books = common::category(&uow, "Books", None).await?;
    let dune = uow
        .products()
        .add(common::product(books.id, "Dune", "BK-1", Decimal::new(1250, 2), 40))
        .await;
    let ada = uow.customers().add(common::customer("Ada", "ada@example.com")).await;
    let cart = uow.shopping_carts().add(shopping_carts::Model::new(ada.id)).await;
    uow.cart_items()
        .add(cart_items::Model::new(cart.id, dune.id, 1, dune.price))
        .await;
    uow.save_changes().await?;

    uow.shopping_carts().delete(cart, true).await;
    uow.save_changes().await?;

    assert!(!uow.shopping_carts().exists(None, true).await?);
    assert!(!uow.cart_items().exists(None, true).await?);
    assert!(uow.products().exists(None, false).await?);
    Ok(())
}

#[tokio::test]
async fn permanently_deleting_an_order_removes_its_items() -> anyhow::Result<()> {
    let uow = UnitOfWork::new(common::connect().await?);
    let books = common::category(&uow, "Books", None).await?;
    let dune = uow
        .products()
        .add(common::product(books.id, "Dune", "BK-1", Decimal::new(1250, 2), 40))
        .await;
    let ada = uow.customers().add(common::customer("Ada", "ada@example.com")).await;
    uow.save_changes().await?;
    let order = place_order(&uow, ada.id, &dune, 2, OrderStatus::Pending, 0).await?;
    assert!(uow.order_items().exists(None, true).await?);

    uow.orders().delete(order, true).await;
    uow.save_changes().await?;

    assert!(!uow.orders().exists(None, true).await?);
    assert!(!uow.order_items().exists(None, true).await?);
    assert!(uow.products().exists(None, false).await?);
    Ok(())
}

#[tokio::test]
async fn a_category_with_products_cannot_be_removed() -> anyhow::Result<()> {
    let uow = UnitOfWork::new(common::connect().await?);
    let books = common::category(&uow, "Books", None).await?;
    uow.products()
        .add(common::product(books.id, "Dune", "BK-1", Decimal::new(1250, 2), 40))
        .await;
    uow.save_changes().await?;

    uow.categories().delete(books.clone(), true).await;
    let err = uow.save_changes().await.expect_err("category still referenced");
    assert!(matches!(err.constraint_as_conflict(), AppError::Conflict(_)));

    uow.discard_changes().await;
    assert!(uow.categories().find_by_id(books.id, &[], false).await?.is_some());
    assert!(uow.products().exists(None, false).await?);
    Ok(())
}
