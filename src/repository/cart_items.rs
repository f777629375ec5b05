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
    entity::{CartItems, Products, ShoppingCarts, cart_items, products, shopping_carts},
    error::AppResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartItemInclude {
    Cart,
    Product,
}

#[derive(Debug, Clone, Default)]
pub struct CartItemRelations {
    pub cart: Option<shopping_carts::Model>,
    pub product: Option<products::Model>,
}

impl EagerLoad for CartItems {
    type Include = CartItemInclude;
    type Related = CartItemRelations;

    async fn load<C: ConnectionTrait>(
        models: &[cart_items::Model],
        include: &[CartItemInclude],
        db: &C,
    ) -> Result<Vec<CartItemRelations>, DbErr> {
        let mut related = vec![CartItemRelations::default(); models.len()];

        if include.contains(&CartItemInclude::Cart) {
            let carts =
                load_by_ids::<ShoppingCarts, _>(models.iter().map(|i| i.shopping_cart_id), db)
                    .await?;
            for (slot, item) in related.iter_mut().zip(models) {
                slot.cart = carts.get(&item.shopping_cart_id).cloned();
            }
        }

        if include.contains(&CartItemInclude::Product) {
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
pub struct CartItemRepository(Repository<CartItems>);

impl CartItemRepository {
    pub fn new(session: Session) -> Self {
        Self(Repository::new(session))
    }

    pub async fn by_cart(&self, cart_id: Uuid) -> AppResult<Vec<Loaded<CartItems>>> {
        self.list(
            ListQuery::new()
                .filter(Filter::new(cart_items::Column::ShoppingCartId.eq(cart_id)))
                .include(CartItemInclude::Product)
                .sort(Sort::asc(cart_items::Column::CreatedAt)),
        )
        .await
    }

    pub async fn by_cart_and_product(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<Loaded<CartItems>>> {
        self.get(
            Filter::new(cart_items::Column::ShoppingCartId.eq(cart_id))
                .and(cart_items::Column::ProductId.eq(product_id)),
            &[CartItemInclude::Product],
            false,
        )
        .await
    }
}

impl Deref for CartItemRepository {
    type Target = Repository<CartItems>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
