use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::enums::{OrderStatus, PaymentMethod};
use crate::audit;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub order_number: String,
    pub order_date: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub customer_id: Uuid,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_country: String,
    pub shipping_postal_code: String,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id",
        on_delete = "Restrict"
    )]
    Customers,
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// A pending order with a freshly generated order number and no total yet.
    pub fn new(customer_id: Uuid, payment_method: PaymentMethod) -> Self {
        let now = audit::now();
        Self {
            id: Uuid::nil(),
            order_number: generate_order_number(),
            order_date: now,
            total_amount: Decimal::ZERO,
            status: OrderStatus::Pending,
            payment_method,
            customer_id,
            shipping_address: String::new(),
            shipping_city: String::new(),
            shipping_country: String::new(),
            shipping_postal_code: String::new(),
            is_active: true,
            is_deleted: false,
            created_at: now,
            updated_at: None,
            deleted_at: None,
        }
    }

    pub fn with_shipping(
        mut self,
        address: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        self.shipping_address = address.into();
        self.shipping_city = city.into();
        self.shipping_country = country.into();
        self.shipping_postal_code = postal_code.into();
        self
    }
}

/// `ORD-<yyyyMMdd>-<8 upper-case hex>`. Uniqueness is only guaranteed by the unique index.
pub fn generate_order_number() -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = Uuid::new_v4().simple().to_string();
    format!("ORD-{}-{}", date, suffix[..8].to_uppercase())
}
