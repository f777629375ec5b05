use sea_orm::{ColumnTrait, Condition};
use uuid::Uuid;

use crate::{
    dto::products::{CreateProductRequest, UpdateProductRequest},
    entity::{
        categories,
        enums::Currency,
        products::{self, Column},
    },
    error::{AppError, AppResult},
    models::Product,
    repository::{Filter, ListQuery, ProductInclude, Sort},
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSortBy, SortOrder, normalize_page},
    state::AppState,
    unit_of_work::UnitOfWork,
};

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<Vec<Product>>> {
    let (page_index, page_size) = normalize_page(query.page_index, query.page_size);
    let mut filter = Filter::all();

    if let Some(search) = query.q.as_deref().filter(|s| !s.is_empty()) {
        filter = filter.and(
            Condition::any()
                .add(Column::Name.contains(search))
                .add(Column::Description.contains(search)),
        );
    }
    if let Some(category_id) = query.category_id {
        filter = filter.and(Column::CategoryId.eq(category_id));
    }
    if let Some(is_active) = query.is_active {
        filter = filter.and(Column::IsActive.eq(is_active));
    }
    if let Some(min_price) = query.min_price {
        filter = filter.and(Column::Price.gte(min_price));
    }
    if let Some(max_price) = query.max_price {
        filter = filter.and(Column::Price.lte(max_price));
    }

    let sort_col = match query.sort_by.unwrap_or(ProductSortBy::CreatedAt) {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Name => Column::Name,
        ProductSortBy::Stock => Column::Stock,
    };
    let sort = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => Sort::asc(sort_col),
        SortOrder::Desc => Sort::desc(sort_col),
    }
    .then_asc(Column::Id);

    let page = state
        .unit_of_work()
        .products()
        .get_list(
            ListQuery::new()
                .filter(filter)
                .sort(sort)
                .include(ProductInclude::Category)
                .page(page_index, page_size),
        )
        .await?;

    Ok(ApiResponse::page("Products", page.map(Product::from)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = state
        .unit_of_work()
        .products()
        .find_by_id(id, &[ProductInclude::Category], false)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Product", product.into(), None))
}

pub async fn get_product_by_sku(state: &AppState, sku: &str) -> AppResult<ApiResponse<Product>> {
    let product = state
        .unit_of_work()
        .products()
        .by_sku(sku)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Product", product.into(), None))
}

pub async fn list_active_products(state: &AppState) -> AppResult<ApiResponse<Vec<Product>>> {
    let items = state.unit_of_work().products().active_products().await?;
    Ok(list("Active products", items.into_iter().map(Product::from).collect()))
}

pub async fn list_by_category(
    state: &AppState,
    category_id: Uuid,
) -> AppResult<ApiResponse<Vec<Product>>> {
    let uow = state.unit_of_work();
    ensure_category(&uow, category_id).await?;
    let items = uow.products().by_category(category_id).await?;
    Ok(list("Products", items.into_iter().map(Product::from).collect()))
}

pub async fn list_low_stock(
    state: &AppState,
    threshold: i32,
) -> AppResult<ApiResponse<Vec<Product>>> {
    if threshold < 0 {
        return Err(AppError::BadRequest("threshold must not be negative".into()));
    }
    let items = state.unit_of_work().products().low_stock(threshold).await?;
    Ok(list("Low stock products", items.into_iter().map(Product::from).collect()))
}

pub async fn list_by_currency(
    state: &AppState,
    currency: Currency,
) -> AppResult<ApiResponse<Vec<Product>>> {
    let items = state.unit_of_work().products().by_currency(currency).await?;
    Ok(list("Products", items.into_iter().map(Product::from).collect()))
}

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    payload.validate()?;
    let uow = state.unit_of_work();

    ensure_category(&uow, payload.category_id).await?;
    if !uow.products().is_sku_unique(&payload.sku).await? {
        return Err(AppError::Conflict(format!("sku {} is already in use", payload.sku)));
    }

    let product = uow
        .products()
        .add(
            products::Model::new(
                payload.category_id,
                payload.name,
                payload.sku,
                payload.price,
                payload.price_currency,
                payload.stock,
            )
            .with_description(payload.description)
            .with_image_url(payload.image_url),
        )
        .await;
    uow.save_changes()
        .await
        .map_err(AppError::constraint_as_conflict)?;
    tracing::info!(product_id = %product.id, sku = %product.sku, "product created");

    let created = reload(&uow, product.id).await?;
    Ok(ApiResponse::success("Product created", created, Some(Meta::empty())))
}

pub async fn update_product(
    state: &AppState,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    payload.validate()?;
    let uow = state.unit_of_work();

    let mut product = uow
        .products()
        .find_by_id(id, &[], false)
        .await?
        .ok_or(AppError::NotFound)?
        .into_model();

    if product.category_id != payload.category_id {
        ensure_category(&uow, payload.category_id).await?;
    }
    if product.sku != payload.sku && !uow.products().is_sku_unique(&payload.sku).await? {
        return Err(AppError::Conflict(format!("sku {} is already in use", payload.sku)));
    }

    product.name = payload.name;
    product.description = payload.description;
    product.price = payload.price;
    product.price_currency = payload.price_currency;
    product.stock = payload.stock;
    product.sku = payload.sku;
    product.image_url = payload.image_url;
    product.category_id = payload.category_id;
    product.is_active = payload.is_active;

    uow.products().update(product).await;
    uow.save_changes()
        .await
        .map_err(AppError::constraint_as_conflict)?;

    let updated = reload(&uow, id).await?;
    Ok(ApiResponse::success("Updated", updated, Some(Meta::empty())))
}

/// Soft delete unless `permanent`. A permanent delete of a product that order or cart lines
/// still reference is a conflict.
pub async fn delete_product(
    state: &AppState,
    id: Uuid,
    permanent: bool,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let uow = state.unit_of_work();
    let product = uow
        .products()
        .find_by_id(id, &[], permanent)
        .await?
        .ok_or(AppError::NotFound)?;

    uow.products().delete(product.into_model(), permanent).await;
    uow.save_changes()
        .await
        .map_err(AppError::constraint_as_conflict)?;
    tracing::info!(product_id = %id, permanent, "product deleted");

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id, "permanent": permanent }),
        Some(Meta::empty()),
    ))
}

async fn ensure_category(uow: &UnitOfWork, category_id: Uuid) -> AppResult<()> {
    let exists = uow
        .categories()
        .exists(
            Some(Filter::new(categories::Column::Id.eq(category_id))),
            false,
        )
        .await?;
    if exists {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("category {category_id} does not exist")))
    }
}

async fn reload(uow: &UnitOfWork, id: Uuid) -> AppResult<Product> {
    uow.products()
        .find_by_id(id, &[ProductInclude::Category], false)
        .await?
        .map(Product::from)
        .ok_or(AppError::NotFound)
}

fn list(message: &str, items: Vec<Product>) -> ApiResponse<Vec<Product>> {
    ApiResponse::success(message, items, Some(Meta::empty()))
}
