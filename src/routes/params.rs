use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::enums::OrderStatus;
use crate::repository::query::DEFAULT_PAGE_SIZE;

pub const MAX_PAGE_SIZE: u64 = 100;

/// Zero-based page index and a page size clamped to `1..=MAX_PAGE_SIZE`.
pub fn normalize_page(page_index: Option<u64>, page_size: Option<u64>) -> (u64, u64) {
    let index = page_index.unwrap_or(0);
    let size = page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    (index, size)
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortBy {
    CreatedAt,
    Price,
    Name,
    Stock,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProductQuery {
    pub page_index: Option<u64>,
    pub page_size: Option<u64>,
    pub q: Option<String>,
    pub category_id: Option<Uuid>,
    pub is_active: Option<bool>,
    #[schema(value_type = Option<String>)]
    pub min_price: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub max_price: Option<Decimal>,
    pub sort_by: Option<ProductSortBy>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CategoryQuery {
    pub page_index: Option<u64>,
    pub page_size: Option<u64>,
    pub q: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CustomerQuery {
    pub page_index: Option<u64>,
    pub page_size: Option<u64>,
    pub q: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OrderListQuery {
    pub page_index: Option<u64>,
    pub page_size: Option<u64>,
    pub status: Option<OrderStatus>,
    pub customer_id: Option<Uuid>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DateRangeQuery {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LowStockQuery {
    pub threshold: Option<i32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DeleteQuery {
    pub permanent: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_ten() {
        assert_eq!(normalize_page(None, None), (0, 10));
    }

    #[test]
    fn page_size_is_clamped() {
        assert_eq!(normalize_page(Some(3), Some(0)), (3, 1));
        assert_eq!(normalize_page(None, Some(1_000)), (0, MAX_PAGE_SIZE));
    }
}
