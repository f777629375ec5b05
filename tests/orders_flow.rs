mod common;

use ecommerce_data_api::{
    dto::{
        categories::CreateCategoryRequest,
        customers::CreateCustomerRequest,
        orders::{CreateOrderItemRequest, CreateOrderRequest, UpdateOrderStatusRequest},
        products::{CreateProductRequest, UpdateProductRequest},
    },
    entity::enums::{Currency, OrderStatus, PaymentMethod},
    error::AppError,
    routes::params::{OrderListQuery, ProductQuery},
    services::{category_service, customer_service, order_service, product_service},
    state::AppState,
};
use rust_decimal::Decimal;
use uuid::Uuid;

async fn catalogue(state: &AppState) -> anyhow::Result<(Uuid, Uuid, Uuid)> {
    let electronics = category_service::create_category(
        state,
        CreateCategoryRequest {
            name: "Electronics".into(),
            description: "Devices".into(),
            parent_category_id: None,
        },
    )
    .await?
    .data
    .expect("category");

    let phones = category_service::create_category(
        state,
        CreateCategoryRequest {
            name: "Phones".into(),
            description: String::new(),
            parent_category_id: Some(electronics.id),
        },
    )
    .await?
    .data
    .expect("sub-category");
    assert_eq!(phones.parent_category_name.as_deref(), Some("Electronics"));

    let phone = product_service::create_product(state, phone_request(phones.id, "PH-1")).await?;
    let phone = phone.data.expect("product");
    assert_eq!(phone.category_name.as_deref(), Some("Phones"));

    let customer = customer_service::create_customer(
        state,
        CreateCustomerRequest {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone_number: "+44 20 7946 0000".into(),
            address: "12 Analytical Row".into(),
            city: "London".into(),
            country: "United Kingdom".into(),
            postal_code: "N1 9GU".into(),
        },
    )
    .await?
    .data
    .expect("customer");
    assert_eq!(customer.full_name, "Ada Lovelace");

    Ok((phones.id, phone.id, customer.id))
}

fn phone_request(category_id: Uuid, sku: &str) -> CreateProductRequest {
    CreateProductRequest {
        name: "Ferris Phone".into(),
        description: "A phone".into(),
        price: Decimal::new(25050, 2),
        price_currency: Currency::Usd,
        stock: 10,
        sku: sku.into(),
        image_url: String::new(),
        category_id,
    }
}

#[tokio::test]
async fn order_is_placed_and_shipped() -> anyhow::Result<()> {
    let state = common::state().await?;
    let (_, phone_id, customer_id) = catalogue(&state).await?;

    let created = order_service::create_order(
        &state,
        CreateOrderRequest {
            customer_id,
            payment_method: PaymentMethod::CreditCard,
            items: vec![CreateOrderItemRequest {
                product_id: phone_id,
                quantity: 2,
            }],
            shipping_address: "12 Analytical Row".into(),
            shipping_city: "London".into(),
            shipping_country: "United Kingdom".into(),
            shipping_postal_code: "N1 9GU".into(),
        },
    )
    .await?
    .data
    .expect("order");

    assert_eq!(created.status, OrderStatus::Pending);
    assert_eq!(created.total_amount, Decimal::new(50100, 2));
    assert_eq!(created.items.len(), 1);
    assert_eq!(created.items[0].product_name, "Ferris Phone");
    assert_eq!(created.customer_email.as_deref(), Some("ada@example.com"));
    assert!(created.order_number.starts_with("ORD-"));

    let shipped = order_service::update_order_status(
        &state,
        created.id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Shipped,
        },
    )
    .await?
    .data
    .expect("order");
    assert_eq!(shipped.status, OrderStatus::Shipped);

    let by_number = order_service::get_order_by_number(&state, &created.order_number)
        .await?
        .data
        .expect("order");
    assert_eq!(by_number.status, OrderStatus::Shipped);

    let shipped_orders = order_service::list_orders(
        &state,
        OrderListQuery {
            status: Some(OrderStatus::Shipped),
            ..Default::default()
        },
    )
    .await?;
    let meta = shipped_orders.meta.expect("page meta");
    assert_eq!(meta.total_count, Some(1));
    assert_eq!(meta.page_size, Some(10));

    let pending = order_service::list_orders_by_status(&state, OrderStatus::Pending).await?;
    assert!(pending.data.expect("orders").is_empty());

    let mine = order_service::list_customer_orders(&state, customer_id).await?;
    assert_eq!(mine.data.expect("orders").len(), 1);
    Ok(())
}

#[tokio::test]
async fn order_for_unknown_product_is_rejected() -> anyhow::Result<()> {
    let state = common::state().await?;
    let (_, _, customer_id) = catalogue(&state).await?;

    let result = order_service::create_order(
        &state,
        CreateOrderRequest {
            customer_id,
            payment_method: PaymentMethod::Cash,
            items: vec![CreateOrderItemRequest {
                product_id: Uuid::new_v4(),
                quantity: 1,
            }],
            shipping_address: "Somewhere".into(),
            shipping_city: "Nowhere".into(),
            shipping_country: "Atlantis".into(),
            shipping_postal_code: String::new(),
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let orders = order_service::list_orders(&state, OrderListQuery::default()).await?;
    assert_eq!(orders.meta.and_then(|m| m.total_count), Some(0));
    Ok(())
}

#[tokio::test]
async fn duplicate_sku_is_a_conflict() -> anyhow::Result<()> {
    let state = common::state().await?;
    let (phones, _, _) = catalogue(&state).await?;

    let result = product_service::create_product(&state, phone_request(phones, "PH-1")).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    Ok(())
}

#[tokio::test]
async fn product_update_and_delete() -> anyhow::Result<()> {
    let state = common::state().await?;
    let (phones, phone_id, _) = catalogue(&state).await?;

    let updated = product_service::update_product(
        &state,
        phone_id,
        UpdateProductRequest {
            name: "Ferris Phone 2".into(),
            description: "A newer phone".into(),
            price: Decimal::new(30000, 2),
            price_currency: Currency::Eur,
            stock: 3,
            sku: "PH-2".into(),
            image_url: String::new(),
            category_id: phones,
            is_active: true,
        },
    )
    .await?
    .data
    .expect("product");
    assert_eq!(updated.sku, "PH-2");
    assert!(updated.updated_at.is_some());

    let low = product_service::list_low_stock(&state, 5).await?;
    assert_eq!(low.data.expect("products").len(), 1);

    let listed = product_service::list_products(
        &state,
        ProductQuery {
            q: Some("Ferris".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(listed.data.expect("products").len(), 1);

    product_service::delete_product(&state, phone_id, false).await?;
    assert!(matches!(
        product_service::get_product(&state, phone_id).await,
        Err(AppError::NotFound)
    ));

    // soft-deleted rows can still be removed for good
    product_service::delete_product(&state, phone_id, true).await?;
    assert!(matches!(
        product_service::delete_product(&state, phone_id, true).await,
        Err(AppError::NotFound)
    ));
    Ok(())
}

#[tokio::test]
async fn category_with_children_cannot_be_deleted() -> anyhow::Result<()> {
    let state = common::state().await?;
    let (phones, _, _) = catalogue(&state).await?;

    let parent = category_service::get_category(&state, phones)
        .await?
        .data
        .expect("category")
        .parent_category_id
        .expect("parent");

    let result = category_service::delete_category(&state, parent).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let roots = category_service::list_root_categories(&state).await?;
    assert_eq!(roots.data.expect("categories").len(), 1);

    let parent = category_service::get_category(&state, parent)
        .await?
        .data
        .expect("category");
    assert_eq!(parent.sub_category_count, 1);
    Ok(())
}

#[tokio::test]
async fn permanent_delete_of_an_ordered_product_is_a_conflict() -> anyhow::Result<()> {
    let state = common::state().await?;
    let (_, phone_id, customer_id) = catalogue(&state).await?;
    order_service::create_order(
        &state,
        CreateOrderRequest {
            customer_id,
            payment_method: PaymentMethod::Cash,
            items: vec![CreateOrderItemRequest {
                product_id: phone_id,
                quantity: 1,
            }],
            shipping_address: "Somewhere".into(),
            shipping_city: "Nowhere".into(),
            shipping_country: "Atlantis".into(),
            shipping_postal_code: String::new(),
        },
    )
    .await?;

    let result = product_service::delete_product(&state, phone_id, true).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    Ok(())
}

#[tokio::test]
async fn huge_page_index_is_a_bad_request() -> anyhow::Result<()> {
    let state = common::state().await?;
    let result = product_service::list_products(
        &state,
        ProductQuery {
            page_index: Some(u64::MAX),
            ..ProductQuery::default()
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
    Ok(())
}
