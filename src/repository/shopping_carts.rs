use std::{collections::HashMap, ops::Deref};

use chrono::TimeDelta;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, DbErr};
use uuid::Uuid;

use super::{
    cart_items::CartItemInclude,
    eager::{EagerLoad, Loaded, load_by_ids, load_children},
    generic::Repository,
    query::{Filter, ListQuery, Sort},
    session::Session,
};
use crate::{
    audit,
    entity::{CartItems, Customers, ShoppingCarts, cart_items, customers, shopping_carts},
    error::{AppError, AppResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShoppingCartInclude {
    Customer,
    Items,
    /// Items together with their products. Implies `Items`.
    ItemProducts,
}

#[derive(Debug, Clone, Default)]
pub struct ShoppingCartRelations {
    pub customer: Option<customers::Model>,
    pub items: Vec<Loaded<CartItems>>,
}

impl EagerLoad for ShoppingCarts {
    type Include = ShoppingCartInclude;
    type Related = ShoppingCartRelations;

    async fn load<C: ConnectionTrait>(
        models: &[shopping_carts::Model],
        include: &[ShoppingCartInclude],
        db: &C,
    ) -> Result<Vec<ShoppingCartRelations>, DbErr> {
        let mut related = vec![ShoppingCartRelations::default(); models.len()];

        if include.contains(&ShoppingCartInclude::Customer) {
            let customers =
                load_by_ids::<Customers, _>(models.iter().map(|c| c.customer_id), db).await?;
            for (slot, cart) in related.iter_mut().zip(models) {
                slot.customer = customers.get(&cart.customer_id).cloned();
            }
        }

        let with_products = include.contains(&ShoppingCartInclude::ItemProducts);
        if with_products || include.contains(&ShoppingCartInclude::Items) {
            let items: Vec<cart_items::Model> = load_children::<CartItems, _>(
                cart_items::Column::ShoppingCartId,
                models.iter().map(|c| c.id),
                |i| i.shopping_cart_id,
                db,
            )
            .await?
            .into_values()
            .flatten()
            .collect();

            let item_related = if with_products {
                CartItems::load(&items, &[CartItemInclude::Product], db).await?
            } else {
                vec![Default::default(); items.len()]
            };

            let position: HashMap<Uuid, usize> =
                models.iter().enumerate().map(|(i, c)| (c.id, i)).collect();
            for item in Loaded::<CartItems>::zip(items, item_related) {
                if let Some(&at) = position.get(&item.shopping_cart_id) {
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
pub struct ShoppingCartRepository(Repository<ShoppingCarts>);

impl ShoppingCartRepository {
    pub fn new(session: Session) -> Self {
        Self(Repository::new(session))
    }

    /// The customer's most recent cart with its items and their products.
    pub async fn by_customer(
        &self,
        customer_id: Uuid,
    ) -> AppResult<Option<Loaded<ShoppingCarts>>> {
        let mut page = self
            .get_list(
                ListQuery::new()
                    .filter(Filter::new(
                        shopping_carts::Column::CustomerId.eq(customer_id),
                    ))
                    .include(ShoppingCartInclude::ItemProducts)
                    .sort(Sort::desc(shopping_carts::Column::CreatedAt))
                    .page(0, 1),
            )
            .await?;
        Ok(page.items.pop())
    }

    pub async fn with_items(&self, id: Uuid) -> AppResult<Option<Loaded<ShoppingCarts>>> {
        self.find_by_id(
            id,
            &[ShoppingCartInclude::ItemProducts, ShoppingCartInclude::Customer],
            false,
        )
        .await
    }

    /// Carts untouched for more than `days_old` days. A cart never updated counts from its
    /// creation time.
    pub async fn abandoned(&self, days_old: i64) -> AppResult<Vec<Loaded<ShoppingCarts>>> {
        let cutoff = TimeDelta::try_days(days_old)
            .and_then(|age| audit::now().checked_sub_signed(age))
            .ok_or_else(|| AppError::BadRequest(format!("{days_old} days is out of range")))?;
        let stale = Condition::any()
            .add(shopping_carts::Column::UpdatedAt.lt(cutoff))
            .add(
                Condition::all()
                    .add(shopping_carts::Column::UpdatedAt.is_null())
                    .add(shopping_carts::Column::CreatedAt.lt(cutoff)),
            );

        self.list(
            ListQuery::new()
                .filter(Filter::new(stale))
                .include(ShoppingCartInclude::Items)
                .sort(Sort::asc(shopping_carts::Column::CreatedAt)),
        )
        .await
    }
}

impl Deref for ShoppingCartRepository {
    type Target = Repository<ShoppingCarts>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
