use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{limit, require};
use crate::{
    entity::enums::{OrderStatus, PaymentMethod},
    error::{AppError, AppResult},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Prices, names and the order total are taken from the catalogue, never from the client.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub items: Vec<CreateOrderItemRequest>,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_country: String,
    #[serde(default)]
    pub shipping_postal_code: String,
}

impl CreateOrderRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.items.is_empty() {
            return Err(AppError::BadRequest("an order needs at least one item".into()));
        }
        if self.items.iter().any(|i| i.quantity <= 0) {
            return Err(AppError::BadRequest("item quantity must be positive".into()));
        }
        require("shipping_address", &self.shipping_address, 500)?;
        require("shipping_city", &self.shipping_city, 100)?;
        require("shipping_country", &self.shipping_country, 100)?;
        limit("shipping_postal_code", &self.shipping_postal_code, 20)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}
