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
    entity::{Categories, Products, categories, enums::Currency, products},
    error::AppResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductInclude {
    Category,
}

#[derive(Debug, Clone, Default)]
pub struct ProductRelations {
    pub category: Option<categories::Model>,
}

impl EagerLoad for Products {
    type Include = ProductInclude;
    type Related = ProductRelations;

    async fn load<C: ConnectionTrait>(
        models: &[products::Model],
        include: &[ProductInclude],
        db: &C,
    ) -> Result<Vec<ProductRelations>, DbErr> {
        let mut related = vec![ProductRelations::default(); models.len()];

        if include.contains(&ProductInclude::Category) {
            let categories =
                load_by_ids::<Categories, _>(models.iter().map(|p| p.category_id), db).await?;
            for (slot, product) in related.iter_mut().zip(models) {
                slot.category = categories.get(&product.category_id).cloned();
            }
        }

        Ok(related)
    }
}

#[derive(Clone)]
pub struct ProductRepository(Repository<Products>);

impl ProductRepository {
    pub fn new(session: Session) -> Self {
        Self(Repository::new(session))
    }

    fn active() -> Filter {
        Filter::new(products::Column::IsActive.eq(true))
    }

    pub async fn active_products(&self) -> AppResult<Vec<Loaded<Products>>> {
        self.list(
            ListQuery::new()
                .filter(Self::active())
                .include(ProductInclude::Category)
                .sort(Sort::asc(products::Column::Name)),
        )
        .await
    }

    pub async fn by_category(&self, category_id: Uuid) -> AppResult<Vec<Loaded<Products>>> {
        self.list(
            ListQuery::new()
                .filter(Self::active().and(products::Column::CategoryId.eq(category_id)))
                .include(ProductInclude::Category)
                .sort(Sort::asc(products::Column::Name)),
        )
        .await
    }

    pub async fn by_sku(&self, sku: &str) -> AppResult<Option<Loaded<Products>>> {
        self.get(
            Filter::new(products::Column::Sku.eq(sku)),
            &[ProductInclude::Category],
            false,
        )
        .await
    }

    /// Active products with at most `threshold` units left, scarcest first.
    pub async fn low_stock(&self, threshold: i32) -> AppResult<Vec<Loaded<Products>>> {
        self.list(
            ListQuery::new()
                .filter(Self::active().and(products::Column::Stock.lte(threshold)))
                .include(ProductInclude::Category)
                .sort(Sort::asc(products::Column::Stock).then_asc(products::Column::Name)),
        )
        .await
    }

    pub async fn by_currency(&self, currency: Currency) -> AppResult<Vec<Loaded<Products>>> {
        self.list(
            ListQuery::new()
                .filter(Self::active().and(products::Column::PriceCurrency.eq(currency)))
                .include(ProductInclude::Category)
                .sort(Sort::asc(products::Column::Name)),
        )
        .await
    }

    /// Whether no live product uses `sku`.
    pub async fn is_sku_unique(&self, sku: &str) -> AppResult<bool> {
        let taken = self
            .exists(Some(Filter::new(products::Column::Sku.eq(sku))), false)
            .await?;
        Ok(!taken)
    }
}

impl Deref for ProductRepository {
    type Target = Repository<Products>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
