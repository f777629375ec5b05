use std::ops::Deref;

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr};
use uuid::Uuid;

use super::{
    eager::{EagerLoad, Loaded, load_by_ids, load_children},
    generic::Repository,
    query::{Filter, ListQuery, Sort},
    session::Session,
};
use crate::{
    entity::{Categories, Products, categories, products},
    error::AppResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryInclude {
    Parent,
    SubCategories,
    Products,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryRelations {
    pub parent: Option<categories::Model>,
    pub sub_categories: Vec<categories::Model>,
    pub products: Vec<products::Model>,
}

impl EagerLoad for Categories {
    type Include = CategoryInclude;
    type Related = CategoryRelations;

    async fn load<C: ConnectionTrait>(
        models: &[categories::Model],
        include: &[CategoryInclude],
        db: &C,
    ) -> Result<Vec<CategoryRelations>, DbErr> {
        let mut related = vec![CategoryRelations::default(); models.len()];
        let ids = || models.iter().map(|c| c.id);

        if include.contains(&CategoryInclude::Parent) {
            let parents =
                load_by_ids::<Categories, _>(models.iter().filter_map(|c| c.parent_category_id), db)
                    .await?;
            for (slot, category) in related.iter_mut().zip(models) {
                slot.parent = category
                    .parent_category_id
                    .and_then(|id| parents.get(&id).cloned());
            }
        }

        if include.contains(&CategoryInclude::SubCategories) {
            let mut children = load_children::<Categories, _>(
                categories::Column::ParentCategoryId,
                ids(),
                |c| c.parent_category_id.unwrap_or_default(),
                db,
            )
            .await?;
            for (slot, category) in related.iter_mut().zip(models) {
                slot.sub_categories = children.remove(&category.id).unwrap_or_default();
                slot.sub_categories.sort_by(|a, b| a.name.cmp(&b.name));
            }
        }

        if include.contains(&CategoryInclude::Products) {
            let mut products = load_children::<Products, _>(
                products::Column::CategoryId,
                ids(),
                |p| p.category_id,
                db,
            )
            .await?;
            for (slot, category) in related.iter_mut().zip(models) {
                slot.products = products.remove(&category.id).unwrap_or_default();
                slot.products.sort_by(|a, b| a.name.cmp(&b.name));
            }
        }

        Ok(related)
    }
}

#[derive(Clone)]
pub struct CategoryRepository(Repository<Categories>);

impl CategoryRepository {
    pub fn new(session: Session) -> Self {
        Self(Repository::new(session))
    }

    fn active() -> Filter {
        Filter::new(categories::Column::IsActive.eq(true))
    }

    pub async fn active_categories(&self) -> AppResult<Vec<Loaded<Categories>>> {
        self.list(
            ListQuery::new()
                .filter(Self::active())
                .sort(Sort::asc(categories::Column::Name)),
        )
        .await
    }

    /// Active categories without a parent.
    pub async fn root_categories(&self) -> AppResult<Vec<Loaded<Categories>>> {
        self.list(
            ListQuery::new()
                .filter(Self::active().and(categories::Column::ParentCategoryId.is_null()))
                .sort(Sort::asc(categories::Column::Name)),
        )
        .await
    }

    pub async fn sub_categories(&self, parent_id: Uuid) -> AppResult<Vec<Loaded<Categories>>> {
        self.list(
            ListQuery::new()
                .filter(Self::active().and(categories::Column::ParentCategoryId.eq(parent_id)))
                .sort(Sort::asc(categories::Column::Name)),
        )
        .await
    }

    pub async fn with_products(&self, id: Uuid) -> AppResult<Option<Loaded<Categories>>> {
        self.find_by_id(id, &[CategoryInclude::Products], false)
            .await
    }
}

impl Deref for CategoryRepository {
    type Target = Repository<Categories>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
