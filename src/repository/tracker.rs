//! Pending-change bookkeeping for a session.
//!
//! Repositories never write directly. They stage entries here and the unit of work flushes
//! them in staging order on `save_changes`.

use std::{any::TypeId, fmt, marker::PhantomData};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbBackend, Insert, QueryFilter,
    QueryTrait, Statement, Update, prelude::DateTimeWithTimeZone,
};
use uuid::Uuid;

use crate::audit::{AuditInterceptor, AuditedEntity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Added,
    Modified,
    Deleted { permanent: bool },
}

/// Identifies one row across entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub entity: TypeId,
    pub id: Uuid,
}

/// A staged write, with the entity type erased so one tracker can hold every table.
pub trait PendingChange: Send + Sync {
    fn key(&self) -> EntryKey;

    fn state(&self) -> EntryState;

    fn set_state(&mut self, state: EntryState);

    fn table(&self) -> String;

    /// Runs the audit interceptor over a copy of the staged model and builds the statement
    /// that writes it. The staged entry itself stays untouched so a failed flush can be
    /// retried.
    fn prepare(&self, now: DateTimeWithTimeZone, backend: DbBackend) -> (EntryState, Statement);
}

pub struct Entry<E: AuditedEntity> {
    model: E::Model,
    state: EntryState,
    _entity: PhantomData<E>,
}

impl<E: AuditedEntity> Entry<E> {
    pub fn new(model: E::Model, state: EntryState) -> Self {
        Self {
            model,
            state,
            _entity: PhantomData,
        }
    }
}

impl<E> PendingChange for Entry<E>
where
    E: AuditedEntity + 'static,
    E::Model: Sync,
{
    fn key(&self) -> EntryKey {
        EntryKey {
            entity: TypeId::of::<E>(),
            id: E::id_of(&self.model),
        }
    }

    fn state(&self) -> EntryState {
        self.state
    }

    fn set_state(&mut self, state: EntryState) {
        self.state = state;
    }

    fn table(&self) -> String {
        E::default().table_name().to_owned()
    }

    fn prepare(&self, now: DateTimeWithTimeZone, backend: DbBackend) -> (EntryState, Statement) {
        let mut model = self.model.clone();
        let state = AuditInterceptor::stamp(self.state, E::audit_fields(&mut model), now);

        let statement = match state {
            EntryState::Added => {
                let active = E::Active::from(model).reset_all();
                Insert::<E::Active>::one(active).build(backend)
            }
            EntryState::Modified => {
                // created_at is written once, by the insert
                let mut active = E::Active::from(model).reset_all();
                active.not_set(E::created_at_column());
                Update::one(active).build(backend)
            }
            EntryState::Deleted { .. } => E::delete_many()
                .filter(E::id_column().eq(E::id_of(&model)))
                .build(backend),
        };

        (state, statement)
    }
}

#[derive(Default)]
pub struct ChangeTracker {
    entries: Vec<Box<dyn PendingChange>>,
}

impl ChangeTracker {
    /// Stages an entry, merging it with an earlier entry for the same row.
    ///
    /// The merged entry keeps the earlier position so inserts stay ahead of the rows that
    /// reference them.
    pub fn stage(&mut self, mut entry: Box<dyn PendingChange>) {
        let key = entry.key();
        let Some(index) = self.entries.iter().position(|e| e.key() == key) else {
            self.entries.push(entry);
            return;
        };

        match (self.entries[index].state(), entry.state()) {
            (EntryState::Added, EntryState::Deleted { .. }) => {
                self.entries.remove(index);
            }
            (EntryState::Added, EntryState::Modified) => {
                entry.set_state(EntryState::Added);
                self.entries[index] = entry;
            }
            _ => self.entries[index] = entry,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn take(&mut self) -> Vec<Box<dyn PendingChange>> {
        std::mem::take(&mut self.entries)
    }

    /// Puts back entries taken for a flush that failed. Anything staged meanwhile is merged
    /// on top of them.
    pub fn restore(&mut self, entries: Vec<Box<dyn PendingChange>>) {
        let staged_meanwhile = std::mem::replace(&mut self.entries, entries);
        for entry in staged_meanwhile {
            self.stage(entry);
        }
    }

    pub fn clear(&mut self) -> usize {
        let discarded = self.entries.len();
        self.entries.clear();
        discarded
    }
}

impl fmt::Debug for ChangeTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.entries
                    .iter()
                    .map(|e| (e.table(), e.key().id, e.state())),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fake {
        id: Uuid,
        state: EntryState,
        tag: &'static str,
    }

    impl PendingChange for Fake {
        fn key(&self) -> EntryKey {
            EntryKey {
                entity: TypeId::of::<Fake>(),
                id: self.id,
            }
        }

        fn state(&self) -> EntryState {
            self.state
        }

        fn set_state(&mut self, state: EntryState) {
            self.state = state;
        }

        fn table(&self) -> String {
            self.tag.to_owned()
        }

        fn prepare(&self, _: DateTimeWithTimeZone, backend: DbBackend) -> (EntryState, Statement) {
            (self.state, Statement::from_string(backend, "SELECT 1".to_owned()))
        }
    }

    fn fake(id: Uuid, state: EntryState, tag: &'static str) -> Box<dyn PendingChange> {
        Box::new(Fake { id, state, tag })
    }

    fn snapshot(tracker: &ChangeTracker) -> Vec<(String, EntryState)> {
        tracker
            .entries
            .iter()
            .map(|e| (e.table(), e.state()))
            .collect()
    }

    #[test]
    fn modifying_an_added_entry_keeps_it_added() {
        let id = Uuid::new_v4();
        let mut tracker = ChangeTracker::default();
        tracker.stage(fake(id, EntryState::Added, "first"));
        tracker.stage(fake(id, EntryState::Modified, "second"));

        assert_eq!(snapshot(&tracker), vec![("second".to_owned(), EntryState::Added)]);
    }

    #[test]
    fn deleting_an_added_entry_drops_it() {
        let id = Uuid::new_v4();
        let mut tracker = ChangeTracker::default();
        tracker.stage(fake(id, EntryState::Added, "a"));
        tracker.stage(fake(id, EntryState::Deleted { permanent: false }, "a"));

        assert!(tracker.is_empty());
    }

    #[test]
    fn deleting_a_modified_entry_becomes_a_delete() {
        let id = Uuid::new_v4();
        let mut tracker = ChangeTracker::default();
        tracker.stage(fake(id, EntryState::Modified, "a"));
        tracker.stage(fake(id, EntryState::Deleted { permanent: true }, "a"));

        assert_eq!(
            snapshot(&tracker),
            vec![("a".to_owned(), EntryState::Deleted { permanent: true })]
        );
    }

    #[test]
    fn merged_entries_keep_their_position() {
        let parent = Uuid::new_v4();
        let child = Uuid::new_v4();
        let mut tracker = ChangeTracker::default();
        tracker.stage(fake(parent, EntryState::Added, "parent"));
        tracker.stage(fake(child, EntryState::Added, "child"));
        tracker.stage(fake(parent, EntryState::Modified, "parent v2"));

        assert_eq!(
            snapshot(&tracker),
            vec![
                ("parent v2".to_owned(), EntryState::Added),
                ("child".to_owned(), EntryState::Added),
            ]
        );
    }

    #[test]
    fn restore_merges_entries_staged_during_a_flush() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut tracker = ChangeTracker::default();
        tracker.stage(fake(a, EntryState::Added, "a"));
        let taken = tracker.take();
        assert!(tracker.is_empty());

        tracker.stage(fake(b, EntryState::Modified, "b"));
        tracker.stage(fake(a, EntryState::Modified, "a v2"));
        tracker.restore(taken);

        assert_eq!(
            snapshot(&tracker),
            vec![
                ("a v2".to_owned(), EntryState::Added),
                ("b".to_owned(), EntryState::Modified),
            ]
        );
    }

    #[test]
    fn clear_reports_discarded_entries() {
        let mut tracker = ChangeTracker::default();
        tracker.stage(fake(Uuid::new_v4(), EntryState::Added, "a"));
        tracker.stage(fake(Uuid::new_v4(), EntryState::Modified, "b"));

        assert_eq!(tracker.clear(), 2);
        assert_eq!(tracker.len(), 0);
    }

    fn product() -> crate::entity::products::Model {
        let mut product = crate::entity::products::Model::new(
            Uuid::new_v4(),
            "Lamp",
            "LMP-1",
            rust_decimal::Decimal::new(1999, 2),
            crate::entity::enums::Currency::Eur,
            2,
        );
        product.id = Uuid::new_v4();
        product
    }

    fn sql(state: EntryState) -> (EntryState, String) {
        let entry = Entry::<crate::entity::Products>::new(product(), state);
        let (state, statement) = entry.prepare(crate::audit::now(), DbBackend::Postgres);
        (state, statement.sql)
    }

    #[test]
    fn soft_delete_is_written_as_an_update_that_keeps_created_at() {
        let (state, sql) = sql(EntryState::Deleted { permanent: false });

        assert_eq!(state, EntryState::Modified);
        assert!(sql.starts_with(r#"UPDATE "products" SET"#), "{sql}");
        assert!(sql.contains(r#""deleted_at""#), "{sql}");
        assert!(!sql.contains(r#""created_at""#), "{sql}");
    }

    #[test]
    fn added_and_permanently_deleted_entries_build_insert_and_delete() {
        let (_, insert) = sql(EntryState::Added);
        assert!(insert.starts_with(r#"INSERT INTO "products""#), "{insert}");
        assert!(insert.contains(r#""created_at""#), "{insert}");

        let (state, delete) = sql(EntryState::Deleted { permanent: true });
        assert_eq!(state, EntryState::Deleted { permanent: true });
        assert!(delete.starts_with(r#"DELETE FROM "products""#), "{delete}");
    }
}
