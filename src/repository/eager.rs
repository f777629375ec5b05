//! Eager loading of related rows.
//!
//! Each entity names its relations in an `Include` enum and collects what was loaded in a
//! `Related` struct. Every relation is fetched with one batched `IN (...)` query for the whole
//! result set, and soft-deleted related rows are left out.

use std::{collections::HashMap, fmt::Debug, future::Future, ops::Deref};

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, QueryFilter};
use uuid::Uuid;

use crate::audit::AuditedEntity;

pub trait EagerLoad: AuditedEntity {
    type Include: Copy + Eq + Debug + Send + Sync + 'static;
    type Related: Default + Clone + Debug + Send;

    /// Loads the requested relations for `models`, returning one `Related` per model in the
    /// same order.
    fn load<C: ConnectionTrait>(
        models: &[Self::Model],
        include: &[Self::Include],
        db: &C,
    ) -> impl Future<Output = Result<Vec<Self::Related>, DbErr>> + Send;
}

/// A model together with the relations loaded for it.
#[derive(Debug, Clone)]
pub struct Loaded<E: EagerLoad> {
    pub model: E::Model,
    pub related: E::Related,
}

impl<E: EagerLoad> Loaded<E> {
    pub fn into_model(self) -> E::Model {
        self.model
    }

    pub(crate) fn zip(models: Vec<E::Model>, related: Vec<E::Related>) -> Vec<Self> {
        models
            .into_iter()
            .zip(related)
            .map(|(model, related)| Self { model, related })
            .collect()
    }
}

impl<E: EagerLoad> Deref for Loaded<E> {
    type Target = E::Model;

    fn deref(&self) -> &Self::Target {
        &self.model
    }
}

/// Batch-loads the targets of a belongs-to relation, keyed by id.
pub async fn load_by_ids<R, C>(
    ids: impl IntoIterator<Item = Uuid>,
    db: &C,
) -> Result<HashMap<Uuid, R::Model>, DbErr>
where
    R: AuditedEntity,
    C: ConnectionTrait,
{
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = R::find()
        .filter(R::id_column().is_in(ids))
        .filter(R::is_deleted_column().eq(false))
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|m| (R::id_of(&m), m)).collect())
}

/// Batch-loads the rows of a has-many relation, grouped by the parent id `parent_of` reads
/// from each child.
pub async fn load_children<R, C>(
    foreign_key: R::Column,
    parent_ids: impl IntoIterator<Item = Uuid>,
    parent_of: fn(&R::Model) -> Uuid,
    db: &C,
) -> Result<HashMap<Uuid, Vec<R::Model>>, DbErr>
where
    R: AuditedEntity,
    C: ConnectionTrait,
{
    let parent_ids: Vec<Uuid> = parent_ids.into_iter().collect();
    if parent_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = R::find()
        .filter(foreign_key.is_in(parent_ids))
        .filter(R::is_deleted_column().eq(false))
        .all(db)
        .await?;

    let mut grouped: HashMap<Uuid, Vec<R::Model>> = HashMap::new();
    for row in rows {
        grouped.entry(parent_of(&row)).or_default().push(row);
    }
    Ok(grouped)
}
