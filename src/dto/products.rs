use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{limit, require};
use crate::{
    entity::enums::Currency,
    error::{AppError, AppResult},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[schema(value_type = String)]
    pub price: Decimal,
    #[serde(default)]
    pub price_currency: Currency,
    pub stock: i32,
    pub sku: String,
    #[serde(default)]
    pub image_url: String,
    pub category_id: Uuid,
}

impl CreateProductRequest {
    pub fn validate(&self) -> AppResult<()> {
        require("name", &self.name, 200)?;
        limit("description", &self.description, 1000)?;
        require("sku", &self.sku, 50)?;
        limit("image_url", &self.image_url, 500)?;
        check_price_and_stock(self.price, self.stock)
    }
}

/// Full replacement of a product's editable fields.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: String,
    pub description: String,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub price_currency: Currency,
    pub stock: i32,
    pub sku: String,
    #[serde(default)]
    pub image_url: String,
    pub category_id: Uuid,
    pub is_active: bool,
}

impl UpdateProductRequest {
    pub fn validate(&self) -> AppResult<()> {
        require("name", &self.name, 200)?;
        require("description", &self.description, 1000)?;
        require("sku", &self.sku, 50)?;
        limit("image_url", &self.image_url, 500)?;
        check_price_and_stock(self.price, self.stock)
    }
}

fn check_price_and_stock(price: Decimal, stock: i32) -> AppResult<()> {
    if price <= Decimal::ZERO {
        return Err(AppError::BadRequest("price must be greater than 0".into()));
    }
    if stock < 0 {
        return Err(AppError::BadRequest("stock must not be negative".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateProductRequest {
        CreateProductRequest {
            name: "Phone".into(),
            description: String::new(),
            price: Decimal::new(19_999, 2),
            price_currency: Currency::Usd,
            stock: 3,
            sku: "PH-1".into(),
            image_url: String::new(),
            category_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn accepts_a_minimal_product() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_prices_and_negative_stock() {
        let mut free = request();
        free.price = Decimal::ZERO;
        assert!(free.validate().is_err());

        let mut oversold = request();
        oversold.stock = -1;
        assert!(oversold.validate().is_err());
    }
}
