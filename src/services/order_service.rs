use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use sea_orm::ColumnTrait;
use uuid::Uuid;

use crate::{
    dto::orders::{CreateOrderRequest, UpdateOrderStatusRequest},
    entity::{
        Orders, customers,
        enums::OrderStatus,
        order_items,
        orders::{self, Column},
    },
    error::{AppError, AppResult},
    models::Order,
    repository::{Filter, ListQuery, Loaded, OrderInclude, Sort},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder, normalize_page},
    state::AppState,
    unit_of_work::UnitOfWork,
};

pub async fn list_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<Vec<Order>>> {
    let (page_index, page_size) = normalize_page(query.page_index, query.page_size);
    let mut filter = Filter::all();

    if let Some(status) = query.status {
        filter = filter.and(Column::Status.eq(status));
    }
    if let Some(customer_id) = query.customer_id {
        filter = filter.and(Column::CustomerId.eq(customer_id));
    }

    let sort = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => Sort::asc(Column::OrderDate),
        SortOrder::Desc => Sort::desc(Column::OrderDate),
    }
    .then_asc(Column::Id);

    let page = state
        .unit_of_work()
        .orders()
        .get_list(
            ListQuery::new()
                .filter(filter)
                .sort(sort)
                .include(OrderInclude::Customer)
                .include(OrderInclude::Items)
                .page(page_index, page_size),
        )
        .await?;

    Ok(ApiResponse::page("Orders", page.map(Order::from)))
}

pub async fn get_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Order>> {
    let order = state
        .unit_of_work()
        .orders()
        .with_items(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Order", order.into(), None))
}

pub async fn get_order_by_number(
    state: &AppState,
    order_number: &str,
) -> AppResult<ApiResponse<Order>> {
    let order = state
        .unit_of_work()
        .orders()
        .by_order_number(order_number)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Order", order.into(), None))
}

pub async fn list_customer_orders(
    state: &AppState,
    customer_id: Uuid,
) -> AppResult<ApiResponse<Vec<Order>>> {
    let uow = state.unit_of_work();
    let known = uow
        .customers()
        .exists(Some(Filter::new(customers::Column::Id.eq(customer_id))), false)
        .await?;
    if !known {
        return Err(AppError::NotFound);
    }

    let items = uow.orders().by_customer(customer_id).await?;
    Ok(list("Customer orders", items))
}

pub async fn list_orders_by_status(
    state: &AppState,
    status: OrderStatus,
) -> AppResult<ApiResponse<Vec<Order>>> {
    let items = state.unit_of_work().orders().by_status(status).await?;
    Ok(list("Orders", items))
}

pub async fn list_orders_by_date_range(
    state: &AppState,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
) -> AppResult<ApiResponse<Vec<Order>>> {
    if start > end {
        return Err(AppError::BadRequest("start must not be after end".into()));
    }
    let items = state
        .unit_of_work()
        .orders()
        .by_date_range(start, end)
        .await?;
    Ok(list("Orders", items))
}

/// Places a pending order. Names and prices are snapshotted from the catalogue and the total
/// is the sum of the line totals. The order and its lines are saved together.
pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    payload.validate()?;
    let uow = state.unit_of_work();

    let customer = uow
        .customers()
        .find_by_id(payload.customer_id, &[], false)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest(format!("customer {} does not exist", payload.customer_id))
        })?;

    let mut lines = Vec::with_capacity(payload.items.len());
    for item in &payload.items {
        let product = uow
            .products()
            .find_by_id(item.product_id, &[], false)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| {
                AppError::BadRequest(format!("product {} is not available", item.product_id))
            })?;
        lines.push((product.into_model(), item.quantity));
    }

    let total = lines
        .iter()
        .map(|(product, quantity)| order_items::line_total(*quantity, product.price))
        .sum::<Decimal>();

    let order = uow
        .orders()
        .add(orders::Model {
            total_amount: total,
            ..orders::Model::new(customer.id, payload.payment_method).with_shipping(
                payload.shipping_address,
                payload.shipping_city,
                payload.shipping_country,
                payload.shipping_postal_code,
            )
        })
        .await;
    for (product, quantity) in &lines {
        uow.order_items()
            .add(order_items::Model::new(order.id, product, *quantity))
            .await;
    }

    uow.save_changes()
        .await
        .map_err(AppError::constraint_as_conflict)?;
    tracing::info!(
        order_id = %order.id,
        order_number = %order.order_number,
        lines = lines.len(),
        %total,
        "order placed"
    );

    let created = reload(&uow, order.id).await?;
    Ok(ApiResponse::success("Order created", created, Some(Meta::empty())))
}

pub async fn update_order_status(
    state: &AppState,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let uow = state.unit_of_work();
    let order = uow
        .orders()
        .find_by_id(id, &[], false)
        .await?
        .ok_or(AppError::NotFound)?
        .into_model();

    let from = order.status;
    uow.orders()
        .update(orders::Model {
            status: payload.status,
            ..order
        })
        .await;
    uow.save_changes().await?;
    tracing::info!(order_id = %id, ?from, to = ?payload.status, "order status changed");

    let updated = reload(&uow, id).await?;
    Ok(ApiResponse::success("Updated", updated, Some(Meta::empty())))
}

pub async fn delete_order(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let uow = state.unit_of_work();
    let order = uow
        .orders()
        .find_by_id(id, &[], false)
        .await?
        .ok_or(AppError::NotFound)?;

    uow.orders().delete(order.into_model(), false).await;
    uow.save_changes().await?;
    tracing::info!(order_id = %id, "order deleted");

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

async fn reload(uow: &UnitOfWork, id: Uuid) -> AppResult<Order> {
    uow.orders()
        .with_items(id)
        .await?
        .map(Order::from)
        .ok_or(AppError::NotFound)
}

fn list(message: &str, items: Vec<Loaded<Orders>>) -> ApiResponse<Vec<Order>> {
    ApiResponse::success(
        message,
        items.into_iter().map(Order::from).collect(),
        Some(Meta::empty()),
    )
}
