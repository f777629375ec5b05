//! Audit-field stamping.
//!
//! Every persisted entity carries the same base columns (`id`, `is_active`, `is_deleted`,
//! `created_at`, `updated_at`, `deleted_at`). Repositories never touch the timestamps
//! themselves: the unit of work runs [`AuditInterceptor::stamp`] over each pending entry
//! right before it is written, so there is exactly one place that decides their values.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, prelude::DateTimeWithTimeZone};
use uuid::Uuid;

use crate::repository::tracker::EntryState;

/// Current UTC time in the offset-aware representation the entities store.
pub fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

/// Mutable view over the base columns of one entity model.
pub struct AuditFields<'a> {
    pub id: &'a mut Uuid,
    pub is_active: &'a mut bool,
    pub is_deleted: &'a mut bool,
    pub created_at: &'a mut DateTimeWithTimeZone,
    pub updated_at: &'a mut Option<DateTimeWithTimeZone>,
    pub deleted_at: &'a mut Option<DateTimeWithTimeZone>,
}

/// Capability shared by every entity the generic repository can manage.
pub trait AuditedEntity: EntityTrait + 'static {
    type Active: ActiveModelTrait<Entity = Self> + From<Self::Model> + Send + Sync;

    fn id_column() -> Self::Column;

    fn is_deleted_column() -> Self::Column;

    fn created_at_column() -> Self::Column;

    fn id_of(model: &Self::Model) -> Uuid;

    fn audit_fields(model: &mut Self::Model) -> AuditFields<'_>;
}

/// Implements [`AuditedEntity`] for an entity module generated by `DeriveEntityModel`.
macro_rules! audited_entity {
    ($module:ident) => {
        impl $crate::audit::AuditedEntity for $module::Entity {
            type Active = $module::ActiveModel;

            fn id_column() -> $module::Column {
                $module::Column::Id
            }

            fn is_deleted_column() -> $module::Column {
                $module::Column::IsDeleted
            }

            fn created_at_column() -> $module::Column {
                $module::Column::CreatedAt
            }

            fn id_of(model: &$module::Model) -> uuid::Uuid {
                model.id
            }

            fn audit_fields(model: &mut $module::Model) -> $crate::audit::AuditFields<'_> {
                $crate::audit::AuditFields {
                    id: &mut model.id,
                    is_active: &mut model.is_active,
                    is_deleted: &mut model.is_deleted,
                    created_at: &mut model.created_at,
                    updated_at: &mut model.updated_at,
                    deleted_at: &mut model.deleted_at,
                }
            }
        }
    };
}

pub(crate) use audited_entity;

pub struct AuditInterceptor;

impl AuditInterceptor {
    /// Stamps the base columns for an entry about to be flushed and returns the state the
    /// entry is written with. Soft deletes leave as updates.
    pub fn stamp(
        state: EntryState,
        fields: AuditFields<'_>,
        now: DateTimeWithTimeZone,
    ) -> EntryState {
        match state {
            EntryState::Added => {
                *fields.created_at = now;
                *fields.is_active = true;
                *fields.is_deleted = false;
                *fields.updated_at = None;
                *fields.deleted_at = None;
                EntryState::Added
            }
            EntryState::Modified => {
                *fields.updated_at = Some(now);
                // deleted_at is set exactly when the row is soft-deleted
                if !*fields.is_deleted {
                    *fields.deleted_at = None;
                } else if fields.deleted_at.is_none() {
                    *fields.deleted_at = Some(now);
                }
                EntryState::Modified
            }
            EntryState::Deleted { permanent: false } => {
                *fields.is_deleted = true;
                *fields.deleted_at = Some(now);
                EntryState::Modified
            }
            EntryState::Deleted { permanent: true } => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    struct Base {
        id: Uuid,
        is_active: bool,
        is_deleted: bool,
        created_at: DateTimeWithTimeZone,
        updated_at: Option<DateTimeWithTimeZone>,
        deleted_at: Option<DateTimeWithTimeZone>,
    }

    impl Base {
        fn fields(&mut self) -> AuditFields<'_> {
            AuditFields {
                id: &mut self.id,
                is_active: &mut self.is_active,
                is_deleted: &mut self.is_deleted,
                created_at: &mut self.created_at,
                updated_at: &mut self.updated_at,
                deleted_at: &mut self.deleted_at,
            }
        }
    }

    fn stale() -> Base {
        let long_ago = now() - Duration::days(30);
        Base {
            id: Uuid::new_v4(),
            is_active: false,
            is_deleted: true,
            created_at: long_ago,
            updated_at: Some(long_ago),
            deleted_at: Some(long_ago),
        }
    }

    #[test]
    fn added_entries_get_creation_defaults() {
        let mut base = stale();
        let at = now();

        let state = AuditInterceptor::stamp(EntryState::Added, base.fields(), at);

        assert_eq!(state, EntryState::Added);
        assert_eq!(base.created_at, at);
        assert!(base.is_active);
        assert!(!base.is_deleted);
        assert!(base.updated_at.is_none());
        assert!(base.deleted_at.is_none());
    }

    #[test]
    fn modified_entries_refresh_updated_at_and_keep_created_at() {
        let mut base = stale();
        let created = base.created_at;
        let at = now();

        let state = AuditInterceptor::stamp(EntryState::Modified, base.fields(), at);

        assert_eq!(state, EntryState::Modified);
        assert_eq!(base.updated_at, Some(at));
        assert_eq!(base.created_at, created);
    }

    #[test]
    fn restoring_a_row_clears_deleted_at() {
        let mut base = stale();
        base.is_deleted = false;

        AuditInterceptor::stamp(EntryState::Modified, base.fields(), now());

        assert!(!base.is_deleted);
        assert!(base.deleted_at.is_none());
    }

    #[test]
    fn flagging_a_row_deleted_through_an_update_stamps_deleted_at() {
        let mut base = stale();
        base.deleted_at = None;
        let at = now();

        AuditInterceptor::stamp(EntryState::Modified, base.fields(), at);

        assert_eq!(base.deleted_at, Some(at));
    }

    #[test]
    fn an_existing_deletion_time_is_kept() {
        let mut base = stale();
        let deleted = base.deleted_at;

        AuditInterceptor::stamp(EntryState::Modified, base.fields(), now());

        assert_eq!(base.deleted_at, deleted);
    }

    #[test]
    fn soft_delete_becomes_an_update() {
        let mut base = stale();
        base.is_deleted = false;
        base.deleted_at = None;
        let at = now();

        let state =
            AuditInterceptor::stamp(EntryState::Deleted { permanent: false }, base.fields(), at);

        assert_eq!(state, EntryState::Modified);
        assert!(base.is_deleted);
        assert_eq!(base.deleted_at, Some(at));
    }

    #[test]
    fn permanent_delete_is_left_alone() {
        let mut base = stale();
        base.is_deleted = false;
        base.deleted_at = None;

        let state =
            AuditInterceptor::stamp(EntryState::Deleted { permanent: true }, base.fields(), now());

        assert_eq!(state, EntryState::Deleted { permanent: true });
        assert!(!base.is_deleted);
        assert!(base.deleted_at.is_none());
    }
}
