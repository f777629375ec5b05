//! Query inputs for the generic repository: filters, sort keys and list queries.

use sea_orm::{
    Condition, EntityTrait, QueryFilter, QueryOrder, Select,
    sea_query::{IntoCondition, Order},
};

use super::eager::EagerLoad;

/// Row predicate. Filters are plain data so they can be combined and passed around freely.
#[derive(Debug, Clone)]
pub struct Filter(Condition);

impl Filter {
    pub fn new<C: IntoCondition>(expr: C) -> Self {
        Self(Condition::all().add(expr.into_condition()))
    }

    /// Matches every row.
    pub fn all() -> Self {
        Self(Condition::all())
    }

    /// Logical AND with another predicate.
    pub fn and<C: IntoCondition>(self, expr: C) -> Self {
        Self(self.0.add(expr.into_condition()))
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::all()
    }
}

impl IntoCondition for Filter {
    fn into_condition(self) -> Condition {
        self.0
    }
}

/// Ordered list of sort keys. The first key is the primary ordering.
#[derive(Debug, Clone)]
pub struct Sort<E: EntityTrait> {
    keys: Vec<(E::Column, Order)>,
}

impl<E: EntityTrait> Sort<E> {
    pub fn asc(column: E::Column) -> Self {
        Self {
            keys: vec![(column, Order::Asc)],
        }
    }

    pub fn desc(column: E::Column) -> Self {
        Self {
            keys: vec![(column, Order::Desc)],
        }
    }

    pub fn then_asc(mut self, column: E::Column) -> Self {
        self.keys.push((column, Order::Asc));
        self
    }

    pub fn then_desc(mut self, column: E::Column) -> Self {
        self.keys.push((column, Order::Desc));
        self
    }

    pub(crate) fn apply(self, mut select: Select<E>) -> Select<E> {
        for (column, order) in self.keys {
            select = select.order_by(column, order);
        }
        select
    }
}

pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Everything a list read needs: filter, ordering, eager loads, paging and soft-delete
/// visibility.
#[derive(Debug, Clone)]
pub struct ListQuery<E: EagerLoad> {
    pub filter: Option<Filter>,
    pub sort: Option<Sort<E>>,
    pub include: Vec<E::Include>,
    pub page_index: u64,
    pub page_size: u64,
    pub include_deleted: bool,
}

impl<E: EagerLoad> Default for ListQuery<E> {
    fn default() -> Self {
        Self {
            filter: None,
            sort: None,
            include: Vec::new(),
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            include_deleted: false,
        }
    }
}

impl<E: EagerLoad> ListQuery<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sort(mut self, sort: Sort<E>) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn include(mut self, include: E::Include) -> Self {
        if !self.include.contains(&include) {
            self.include.push(include);
        }
        self
    }

    pub fn page(mut self, page_index: u64, page_size: u64) -> Self {
        self.page_index = page_index;
        self.page_size = page_size;
        self
    }

    pub fn with_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }

    /// Soft-delete visibility, then the filter, then the ordering.
    pub(crate) fn to_select(&self) -> Select<E> {
        let mut select = scoped::<E>(self.filter.clone(), self.include_deleted);
        if let Some(sort) = self.sort.clone() {
            select = sort.apply(select);
        }
        select
    }
}

/// The one place soft-deleted rows are hidden from reads.
pub(crate) fn scoped<E: EagerLoad>(filter: Option<Filter>, include_deleted: bool) -> Select<E> {
    use sea_orm::ColumnTrait;

    let mut select = E::find();
    if !include_deleted {
        select = select.filter(E::is_deleted_column().eq(false));
    }
    if let Some(filter) = filter {
        select = select.filter(filter);
    }
    select
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Products, products};
    use crate::repository::products::ProductInclude;
    use sea_orm::{ColumnTrait, DbBackend, QueryTrait};

    #[test]
    fn filters_compose_with_and() {
        let sql = scoped::<Products>(
            Some(
                Filter::new(products::Column::Stock.gt(0))
                    .and(products::Column::Name.contains("phone")),
            ),
            false,
        )
        .build(DbBackend::Postgres)
        .to_string();

        assert!(sql.contains(r#""products"."is_deleted" = "#), "{sql}");
        assert!(sql.contains(r#""products"."stock" > 0 AND "products"."name" LIKE '%phone%'"#), "{sql}");
    }

    #[test]
    fn include_deleted_drops_the_soft_delete_predicate() {
        let sql = scoped::<Products>(None, true)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(!sql.contains("WHERE"), "{sql}");
        assert!(!sql.contains(r#""is_deleted" = "#), "{sql}");
    }

    #[test]
    fn sort_keys_keep_their_order() {
        let sql = ListQuery::<Products>::new()
            .sort(Sort::desc(products::Column::Price).then_asc(products::Column::Name))
            .to_select()
            .build(DbBackend::Postgres)
            .to_string();

        assert!(
            sql.ends_with(r#"ORDER BY "products"."price" DESC, "products"."name" ASC"#),
            "{sql}"
        );
    }

    #[test]
    fn includes_are_deduplicated() {
        let query = ListQuery::<Products>::new()
            .include(ProductInclude::Category)
            .include(ProductInclude::Category);

        assert_eq!(query.include.len(), 1);
        assert_eq!(query.page_size, DEFAULT_PAGE_SIZE);
    }
}
