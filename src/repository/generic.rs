use std::marker::PhantomData;

use sea_orm::{ColumnTrait, QuerySelect};
use uuid::Uuid;

use super::{
    eager::{EagerLoad, Loaded},
    paginate::Page,
    query::{Filter, ListQuery, scoped},
    session::Session,
    tracker::{Entry, EntryState},
};
use crate::error::{AppError, AppResult};

/// Entity-agnostic reads and staged writes over one session.
///
/// Writes are only staged here; nothing reaches the database until the owning unit of work
/// saves its changes.
pub struct Repository<E: EagerLoad> {
    session: Session,
    _entity: PhantomData<E>,
}

impl<E: EagerLoad> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> Repository<E>
where
    E: EagerLoad,
    E::Model: Sync,
{
    pub fn new(session: Session) -> Self {
        Self {
            session,
            _entity: PhantomData,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Assigns a fresh id and stages the entity for insertion.
    pub async fn add(&self, mut entity: E::Model) -> E::Model {
        *E::audit_fields(&mut entity).id = Uuid::new_v4();
        self.stage(entity.clone(), EntryState::Added).await;
        entity
    }

    /// Stages the full state of the entity as an overwrite of its row.
    pub async fn update(&self, entity: E::Model) -> E::Model {
        self.stage(entity.clone(), EntryState::Modified).await;
        entity
    }

    /// Stages a soft delete, or a physical one when `permanent` is set.
    pub async fn delete(&self, entity: E::Model, permanent: bool) -> E::Model {
        self.stage(entity.clone(), EntryState::Deleted { permanent })
            .await;
        entity
    }

    async fn stage(&self, entity: E::Model, state: EntryState) {
        tracing::trace!(id = %E::id_of(&entity), ?state, "staging entry");
        self.session
            .stage(Box::new(Entry::<E>::new(entity, state)))
            .await;
    }

    pub async fn exists(&self, filter: Option<Filter>, include_deleted: bool) -> AppResult<bool> {
        self.session
            .exists(scoped::<E>(filter, include_deleted))
            .await
    }

    pub async fn get_list(&self, query: ListQuery<E>) -> AppResult<Page<Loaded<E>>> {
        if query.page_size == 0 {
            return Err(AppError::BadRequest(
                "page size must be at least 1".to_string(),
            ));
        }

        let offset = query
            .page_index
            .checked_mul(query.page_size)
            .filter(|offset| i64::try_from(*offset).is_ok())
            .ok_or_else(|| AppError::BadRequest("page index is out of range".to_string()))?;

        let select = query.to_select();
        let total_count = self.session.count(select.clone()).await?;

        let models = self
            .session
            .all(
                select
                    .offset(offset)
                    .limit(query.page_size),
            )
            .await?;
        let items = self.with_related(models, &query.include).await?;

        Ok(Page::new(
            items,
            query.page_index,
            query.page_size,
            total_count,
        ))
    }

    /// Same pipeline as [`get_list`](Self::get_list) without paging.
    pub async fn list(&self, query: ListQuery<E>) -> AppResult<Vec<Loaded<E>>> {
        let models = self.session.all(query.to_select()).await?;
        self.with_related(models, &query.include).await
    }

    /// At most one matching row. More than one match is a caller error.
    pub async fn get(
        &self,
        filter: Filter,
        include: &[E::Include],
        include_deleted: bool,
    ) -> AppResult<Option<Loaded<E>>> {
        let mut models = self
            .session
            .all(scoped::<E>(Some(filter), include_deleted).limit(2u64))
            .await?;

        if models.len() > 1 {
            return Err(AppError::NonUniqueMatch(E::default().table_name().to_owned()));
        }

        let Some(model) = models.pop() else {
            return Ok(None);
        };
        Ok(self.with_related(vec![model], include).await?.pop())
    }

    pub async fn find_by_id(
        &self,
        id: Uuid,
        include: &[E::Include],
        include_deleted: bool,
    ) -> AppResult<Option<Loaded<E>>> {
        self.get(Filter::new(E::id_column().eq(id)), include, include_deleted)
            .await
    }

    async fn with_related(
        &self,
        models: Vec<E::Model>,
        include: &[E::Include],
    ) -> AppResult<Vec<Loaded<E>>> {
        let related = self.session.load::<E>(&models, include).await?;
        Ok(Loaded::zip(models, related))
    }
}
