use std::ops::Deref;

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr};
use uuid::Uuid;

use super::{
    eager::{EagerLoad, Loaded, load_by_ids},
    generic::Repository,
    query::{Filter, ListQuery, Sort},
    session::Session,
};
use crate::{
    entity::{OrderItems, Orders, Products, order_items, orders, products},
    error::AppResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderItemInclude {
    Order,
    Product,
}

#[derive(Debug, Clone, Default)]
pub struct OrderItemRelations {
    pub order: Option<orders::Model>,
    pub product: Option<products::Model>,
}

impl EagerLoad for OrderItems {
    type Include = OrderItemInclude;
    type Related = OrderItemRelations;

    async fn load<C: ConnectionTrait>(
        models: &[order_items::Model],
        include: &[OrderItemInclude],
        db: &C,
    ) -> Result<Vec<OrderItemRelations>, DbErr> {
        let mut related = vec![OrderItemRelations::default(); models.len()];

        if include.contains(&OrderItemInclude::Order) {
            let orders = load_by_ids::<Orders, _>(models.iter().map(|i| i.order_id), db).await?;
            for (slot, item) in related.iter_mut().zip(models) {
                slot.order = orders.get(&item.order_id).cloned();
            }
        }

        if include.contains(&OrderItemInclude::Product) {
            let products =
                load_by_ids::<Products, _>(models.iter().map(|i| i.product_id), db).await?;
            for (slot, item) in related.iter_mut().zip(models) {
                slot.product = products.get(&item.product_id).cloned();
            }
        }

        Ok(related)
    }
}

#[derive(Clone)]
pub struct OrderItemRepository(Repository<OrderItems>);

impl OrderItemRepository {
    pub fn new(session: Session) -> Self {
        Self(Repository::new(session))
    }

    pub async fn by_order(&self, order_id: Uuid) -> AppResult<Vec<Loaded<OrderItems>>> {
        self.list(
            ListQuery::new()
                .filter(Filter::new(order_items::Column::OrderId.eq(order_id)))
                .include(OrderItemInclude::Product)
                .sort(Sort::asc(order_items::Column::CreatedAt)),
        )
        .await
    }

    pub async fn by_product(&self, product_id: Uuid) -> AppResult<Vec<Loaded<OrderItems>>> {
        self.list(
            ListQuery::new()
                .filter(Filter::new(order_items::Column::ProductId.eq(product_id)))
                .include(OrderItemInclude::Order)
                .sort(Sort::desc(order_items::Column::CreatedAt)),
        )
        .await
    }
}

impl Deref for OrderItemRepository {
    type Target = Repository<OrderItems>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
