use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use crate::audit;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub unit_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub total_price: Decimal,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id",
        on_delete = "Cascade"
    )]
    Orders,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_delete = "Restrict"
    )]
    Products,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Snapshots the product's current name and price so later renames or repricing do not
    /// rewrite order history.
    pub fn new(order_id: Uuid, product: &super::products::Model, quantity: i32) -> Self {
        Self {
            id: Uuid::nil(),
            order_id,
            product_id: product.id,
            product_name: product.name.clone(),
            quantity,
            unit_price: product.price,
            total_price: line_total(quantity, product.price),
            is_active: true,
            is_deleted: false,
            created_at: audit::now(),
            updated_at: None,
            deleted_at: None,
        }
    }
}

pub fn line_total(quantity: i32, unit_price: Decimal) -> Decimal {
    Decimal::from(quantity) * unit_price
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{enums::Currency, products};

    #[test]
    fn snapshots_product_name_and_price() {
        let mut product = products::Model::new(
            Uuid::new_v4(),
            "Desk Lamp",
            "LAMP-1",
            Decimal::new(2550, 2),
            Currency::Eur,
            4,
        );
        product.id = Uuid::new_v4();

        let item = Model::new(Uuid::new_v4(), &product, 3);
        product.name = "Renamed Lamp".into();

        assert_eq!(item.product_name, "Desk Lamp");
        assert_eq!(item.unit_price, Decimal::new(2550, 2));
        assert_eq!(item.total_price, Decimal::new(7650, 2));
    }
}
