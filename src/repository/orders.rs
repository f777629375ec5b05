use std::{collections::HashMap, ops::Deref};

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, prelude::DateTimeWithTimeZone};
use uuid::Uuid;

use super::{
    eager::{EagerLoad, Loaded, load_by_ids, load_children},
    generic::Repository,
    order_items::OrderItemInclude,
    query::{Filter, ListQuery, Sort},
    session::Session,
};
use crate::{
    entity::{Customers, OrderItems, Orders, customers, enums::OrderStatus, order_items, orders},
    error::AppResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderInclude {
    Customer,
    Items,
    /// Items together with their products. Implies `Items`.
    ItemProducts,
}

#[derive(Debug, Clone, Default)]
pub struct OrderRelations {
    pub customer: Option<customers::Model>,
    pub items: Vec<Loaded<OrderItems>>,
}

impl EagerLoad for Orders {
    type Include = OrderInclude;
    type Related = OrderRelations;

    async fn load<C: ConnectionTrait>(
        models: &[orders::Model],
        include: &[OrderInclude],
        db: &C,
    ) -> Result<Vec<OrderRelations>, DbErr> {
        let mut related = vec![OrderRelations::default(); models.len()];

        if include.contains(&OrderInclude::Customer) {
            let customers =
                load_by_ids::<Customers, _>(models.iter().map(|o| o.customer_id), db).await?;
            for (slot, order) in related.iter_mut().zip(models) {
                slot.customer = customers.get(&order.customer_id).cloned();
            }
        }

        let with_products = include.contains(&OrderInclude::ItemProducts);
        if with_products || include.contains(&OrderInclude::Items) {
            let items: Vec<order_items::Model> = load_children::<OrderItems, _>(
                order_items::Column::OrderId,
                models.iter().map(|o| o.id),
                |i| i.order_id,
                db,
            )
            .await?
            .into_values()
            .flatten()
            .collect();

            let item_include: &[OrderItemInclude] = if with_products {
                &[OrderItemInclude::Product]
            } else {
                &[]
            };
            let item_related = if item_include.is_empty() {
                vec![Default::default(); items.len()]
            } else {
                OrderItems::load(&items, item_include, db).await?
            };

            let position: HashMap<Uuid, usize> =
                models.iter().enumerate().map(|(i, o)| (o.id, i)).collect();
            for item in Loaded::<OrderItems>::zip(items, item_related) {
                if let Some(&at) = position.get(&item.order_id) {
                    related[at].items.push(item);
                }
            }
            for slot in &mut related {
                slot.items.sort_by_key(|i| i.created_at);
            }
        }

        Ok(related)
    }
}

#[derive(Clone)]
pub struct OrderRepository(Repository<Orders>);

impl OrderRepository {
    pub fn new(session: Session) -> Self {
        Self(Repository::new(session))
    }

    /// A customer's orders with their items, newest first.
    pub async fn by_customer(&self, customer_id: Uuid) -> AppResult<Vec<Loaded<Orders>>> {
        self.list(
            ListQuery::new()
                .filter(Filter::new(orders::Column::CustomerId.eq(customer_id)))
                .include(OrderInclude::Items)
                .sort(Sort::desc(orders::Column::OrderDate)),
        )
        .await
    }

    pub async fn with_items(&self, id: Uuid) -> AppResult<Option<Loaded<Orders>>> {
        self.find_by_id(
            id,
            &[OrderInclude::ItemProducts, OrderInclude::Customer],
            false,
        )
        .await
    }

    pub async fn by_status(&self, status: OrderStatus) -> AppResult<Vec<Loaded<Orders>>> {
        self.list(
            ListQuery::new()
                .filter(Filter::new(orders::Column::Status.eq(status)))
                .include(OrderInclude::Items)
                .sort(Sort::desc(orders::Column::OrderDate)),
        )
        .await
    }

    pub async fn by_order_number(&self, order_number: &str) -> AppResult<Option<Loaded<Orders>>> {
        self.get(
            Filter::new(orders::Column::OrderNumber.eq(order_number)),
            &[OrderInclude::Items, OrderInclude::Customer],
            false,
        )
        .await
    }

    /// Orders placed within `[start, end]`, newest first.
    pub async fn by_date_range(
        &self,
        start: DateTimeWithTimeZone,
        end: DateTimeWithTimeZone,
    ) -> AppResult<Vec<Loaded<Orders>>> {
        self.list(
            ListQuery::new()
                .filter(Filter::new(orders::Column::OrderDate.between(start, end)))
                .include(OrderInclude::Items)
                .sort(Sort::desc(orders::Column::OrderDate)),
        )
        .await
    }
}

impl Deref for OrderRepository {
    type Target = Repository<Orders>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
