use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::products::{CreateProductRequest, UpdateProductRequest},
    entity::enums::Currency,
    error::{AppError, AppResult},
    models::Product,
    response::ApiResponse,
    routes::params::{DeleteQuery, LowStockQuery, ProductQuery},
    services::product_service,
    state::AppState,
};

const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/active", get(list_active_products))
        .route("/low-stock", get(list_low_stock))
        .route("/sku/{sku}", get(get_product_by_sku))
        .route("/currency/{currency}", get(list_by_currency))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page_index" = Option<u64>, Query, description = "Zero-based page index, default 0"),
        ("page_size" = Option<u64>, Query, description = "Items per page, default 10, max 100"),
        ("q" = Option<String>, Query, description = "Search in name and description"),
        ("category_id" = Option<Uuid>, Query, description = "Filter by category"),
        ("is_active" = Option<bool>, Query, description = "Filter by active flag"),
        ("min_price" = Option<String>, Query, description = "Minimum price"),
        ("max_price" = Option<String>, Query, description = "Maximum price"),
        ("sort_by" = Option<String>, Query, description = "created_at, price, name, stock"),
        ("sort_order" = Option<String>, Query, description = "asc, desc")
    ),
    responses(
        (status = 200, description = "List products", body = ApiResponse<Vec<Product>>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let resp = product_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/active",
    responses(
        (status = 200, description = "Active products by name", body = ApiResponse<Vec<Product>>)
    ),
    tag = "Products"
)]
pub async fn list_active_products(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let resp = product_service::list_active_products(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/low-stock",
    params(
        ("threshold" = Option<i32>, Query, description = "Stock at or below this value, default 10")
    ),
    responses(
        (status = 200, description = "Active products running low", body = ApiResponse<Vec<Product>>),
        (status = 400, description = "Negative threshold"),
    ),
    tag = "Products"
)]
pub async fn list_low_stock(
    State(state): State<AppState>,
    Query(query): Query<LowStockQuery>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let threshold = query.threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
    let resp = product_service::list_low_stock(&state, threshold).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/sku/{sku}",
    params(
        ("sku" = String, Path, description = "Stock keeping unit")
    ),
    responses(
        (status = 200, description = "Get product by SKU", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product_by_sku(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::get_product_by_sku(&state, &sku).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/currency/{currency}",
    params(
        ("currency" = Currency, Path, description = "USD, EUR, GBP or TRY")
    ),
    responses(
        (status = 200, description = "Active products priced in a currency", body = ApiResponse<Vec<Product>>),
        (status = 400, description = "Unknown currency"),
    ),
    tag = "Products"
)]
pub async fn list_by_currency(
    State(state): State<AppState>,
    Path(currency): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let currency = currency.parse::<Currency>().map_err(AppError::BadRequest)?;
    let resp = product_service::list_by_currency(&state, currency).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Create product", body = ApiResponse<Product>),
        (status = 400, description = "Invalid payload or unknown category"),
        (status = 409, description = "SKU already in use"),
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let resp = product_service::create_product(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
        (status = 409, description = "SKU already in use"),
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::update_product(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("permanent" = Option<bool>, Query, description = "Remove the row instead of soft deleting it")
    ),
    responses(
        (status = 200, description = "Deleted product"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product is still referenced"),
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp =
        product_service::delete_product(&state, id, query.permanent.unwrap_or(false)).await?;
    Ok(Json(resp))
}
