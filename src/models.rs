//! Transport shapes returned by the HTTP layer.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::{
        Categories, Customers, OrderItems, Orders, Products,
        enums::{Currency, OrderStatus, PaymentMethod},
    },
    repository::Loaded,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub price_currency: Currency,
    pub stock: i32,
    pub sku: String,
    pub image_url: String,
    pub is_active: bool,
    pub category_id: Uuid,
    pub category_name: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: Option<DateTime<FixedOffset>>,
}

impl From<Loaded<Products>> for Product {
    fn from(loaded: Loaded<Products>) -> Self {
        let Loaded { model, related } = loaded;
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            price_currency: model.price_currency,
            stock: model.stock,
            sku: model.sku,
            image_url: model.image_url,
            is_active: model.is_active,
            category_id: model.category_id,
            category_name: related.category.map(|c| c.name),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub parent_category_id: Option<Uuid>,
    pub parent_category_name: Option<String>,
    pub sub_category_count: usize,
    pub created_at: DateTime<FixedOffset>,
}

impl From<Loaded<Categories>> for Category {
    fn from(loaded: Loaded<Categories>) -> Self {
        let Loaded { model, related } = loaded;
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            is_active: model.is_active,
            parent_category_id: model.parent_category_id,
            parent_category_name: related.parent.map(|p| p.name),
            sub_category_count: related.sub_categories.len(),
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    pub is_active: bool,
    pub created_at: DateTime<FixedOffset>,
}

impl From<Loaded<Customers>> for Customer {
    fn from(loaded: Loaded<Customers>) -> Self {
        let model = loaded.into_model();
        Self {
            full_name: model.full_name(),
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            phone_number: model.phone_number,
            address: model.address,
            city: model.city,
            country: model.country,
            postal_code: model.postal_code,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerWithOrders {
    #[serde(flatten)]
    pub customer: Customer,
    pub orders: Vec<Order>,
}

impl From<Loaded<Customers>> for CustomerWithOrders {
    fn from(mut loaded: Loaded<Customers>) -> Self {
        let orders = std::mem::take(&mut loaded.related.orders)
            .into_iter()
            .map(Order::from)
            .collect();
        Self {
            customer: loaded.into(),
            orders,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub unit_price: Decimal,
    #[schema(value_type = String)]
    pub total_price: Decimal,
}

impl From<Loaded<OrderItems>> for OrderItem {
    fn from(loaded: Loaded<OrderItems>) -> Self {
        let model = loaded.into_model();
        Self {
            id: model.id,
            product_id: model.product_id,
            product_name: model.product_name,
            quantity: model.quantity,
            unit_price: model.unit_price,
            total_price: model.total_price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub order_date: DateTime<FixedOffset>,
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub customer_id: Uuid,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_country: String,
    pub shipping_postal_code: String,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<Loaded<Orders>> for Order {
    fn from(loaded: Loaded<Orders>) -> Self {
        let Loaded { model, related } = loaded;
        Self {
            id: model.id,
            order_number: model.order_number,
            order_date: model.order_date,
            total_amount: model.total_amount,
            status: model.status,
            payment_method: model.payment_method,
            customer_id: model.customer_id,
            customer_name: related.customer.as_ref().map(|c| c.full_name()),
            customer_email: related.customer.map(|c| c.email),
            shipping_address: model.shipping_address,
            shipping_city: model.shipping_city,
            shipping_country: model.shipping_country,
            shipping_postal_code: model.shipping_postal_code,
            items: related.items.into_iter().map(OrderItem::from).collect(),
            created_at: model.created_at,
        }
    }
}
