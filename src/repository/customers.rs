use std::{collections::HashMap, ops::Deref};

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr};
use uuid::Uuid;

use super::{
    eager::{EagerLoad, Loaded, load_children},
    generic::Repository,
    orders::OrderInclude,
    query::{Filter, ListQuery, Sort},
    session::Session,
};
use crate::{
    entity::{Customers, Orders, ShoppingCarts, customers, orders, shopping_carts},
    error::AppResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerInclude {
    Orders,
    /// Orders together with their items. Implies `Orders`.
    OrderItems,
    ShoppingCarts,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerRelations {
    pub orders: Vec<Loaded<Orders>>,
    pub shopping_carts: Vec<shopping_carts::Model>,
}

impl EagerLoad for Customers {
    type Include = CustomerInclude;
    type Related = CustomerRelations;

    async fn load<C: ConnectionTrait>(
        models: &[customers::Model],
        include: &[CustomerInclude],
        db: &C,
    ) -> Result<Vec<CustomerRelations>, DbErr> {
        let mut related = vec![CustomerRelations::default(); models.len()];
        let position: HashMap<Uuid, usize> =
            models.iter().enumerate().map(|(i, c)| (c.id, i)).collect();

        let with_items = include.contains(&CustomerInclude::OrderItems);
        if with_items || include.contains(&CustomerInclude::Orders) {
            let orders: Vec<orders::Model> = load_children::<Orders, _>(
                orders::Column::CustomerId,
                models.iter().map(|c| c.id),
                |o| o.customer_id,
                db,
            )
            .await?
            .into_values()
            .flatten()
            .collect();

            let order_related = if with_items {
                Orders::load(&orders, &[OrderInclude::Items], db).await?
            } else {
                vec![Default::default(); orders.len()]
            };

            for order in Loaded::<Orders>::zip(orders, order_related) {
                if let Some(&at) = position.get(&order.customer_id) {
                    related[at].orders.push(order);
                }
            }
            for slot in &mut related {
                slot.orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
            }
        }

        if include.contains(&CustomerInclude::ShoppingCarts) {
            let mut carts = load_children::<ShoppingCarts, _>(
                shopping_carts::Column::CustomerId,
                models.iter().map(|c| c.id),
                |s| s.customer_id,
                db,
            )
            .await?;
            for (slot, customer) in related.iter_mut().zip(models) {
                slot.shopping_carts = carts.remove(&customer.id).unwrap_or_default();
            }
        }

        Ok(related)
    }
}

#[derive(Clone)]
pub struct CustomerRepository(Repository<Customers>);

impl CustomerRepository {
    pub fn new(session: Session) -> Self {
        Self(Repository::new(session))
    }

    fn by_name() -> Sort<Customers> {
        Sort::asc(customers::Column::LastName).then_asc(customers::Column::FirstName)
    }

    pub async fn by_email(&self, email: &str) -> AppResult<Option<Loaded<Customers>>> {
        self.get(Filter::new(customers::Column::Email.eq(email)), &[], false)
            .await
    }

    /// The customer with every order and each order's items.
    pub async fn with_orders(&self, id: Uuid) -> AppResult<Option<Loaded<Customers>>> {
        self.find_by_id(id, &[CustomerInclude::OrderItems], false)
            .await
    }

    pub async fn by_country(&self, country: &str) -> AppResult<Vec<Loaded<Customers>>> {
        self.list(
            ListQuery::new()
                .filter(Filter::new(customers::Column::Country.eq(country)))
                .sort(Self::by_name()),
        )
        .await
    }

    pub async fn by_city(&self, city: &str) -> AppResult<Vec<Loaded<Customers>>> {
        self.list(
            ListQuery::new()
                .filter(Filter::new(customers::Column::City.eq(city)))
                .sort(Self::by_name()),
        )
        .await
    }

    pub async fn active_customers(&self) -> AppResult<Vec<Loaded<Customers>>> {
        self.list(
            ListQuery::new()
                .filter(Filter::new(customers::Column::IsActive.eq(true)))
                .sort(Self::by_name()),
        )
        .await
    }

    /// Whether no live customer uses `email`.
    pub async fn is_email_unique(&self, email: &str) -> AppResult<bool> {
        let taken = self
            .exists(Some(Filter::new(customers::Column::Email.eq(email))), false)
            .await?;
        Ok(!taken)
    }
}

impl Deref for CustomerRepository {
    type Target = Repository<Customers>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
