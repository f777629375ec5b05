//! The persistence session shared by every repository of one unit of work.

use std::{future::Future, sync::Arc};

use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, PaginatorTrait, QuerySelect,
    Select, TransactionTrait, prelude::DateTimeWithTimeZone,
};
use tokio::sync::Mutex;

use super::{
    eager::EagerLoad,
    tracker::{ChangeTracker, EntryState, PendingChange},
};
use crate::{
    audit::{self, AuditedEntity},
    cancel::CancellationToken,
    error::{AppError, AppResult},
};

/// Connection, optional explicit transaction and pending changes. Cloning is cheap and every
/// clone sees the same state.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    conn: DatabaseConnection,
    transaction: Mutex<Option<DatabaseTransaction>>,
    tracker: Mutex<ChangeTracker>,
    cancel: CancellationToken,
}

/// Runs `$body` against the open transaction if there is one, else against the connection.
macro_rules! on_current {
    ($session:expr, |$db:ident| $body:expr) => {{
        let slot = $session.inner.transaction.lock().await;
        let fut = async {
            match slot.as_ref() {
                Some($db) => $body.await,
                None => {
                    let $db = &$session.inner.conn;
                    $body.await
                }
            }
        };
        $session.guard(fut).await
    }};
}

impl Session {
    pub fn new(conn: DatabaseConnection, cancel: CancellationToken) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                conn,
                transaction: Mutex::new(None),
                tracker: Mutex::new(ChangeTracker::default()),
                cancel,
            }),
        }
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.inner.cancel
    }

    /// Races a storage call against the session's cancellation token.
    async fn guard<T, F>(&self, fut: F) -> AppResult<T>
    where
        F: Future<Output = Result<T, DbErr>>,
    {
        tokio::select! {
            biased;
            _ = self.inner.cancel.cancelled() => Err(AppError::Cancelled),
            result = fut => result.map_err(AppError::from),
        }
    }

    pub async fn stage(&self, entry: Box<dyn PendingChange>) {
        self.inner.tracker.lock().await.stage(entry);
    }

    pub async fn pending_changes(&self) -> usize {
        self.inner.tracker.lock().await.len()
    }

    pub async fn all<E: AuditedEntity>(&self, select: Select<E>) -> AppResult<Vec<E::Model>>
    where
        E::Model: Sync,
    {
        on_current!(self, |db| select.clone().all(db))
    }

    pub async fn count<E: AuditedEntity>(&self, select: Select<E>) -> AppResult<u64>
    where
        E::Model: Sync,
    {
        on_current!(self, |db| select.clone().count(db))
    }

    pub async fn exists<E: AuditedEntity>(&self, select: Select<E>) -> AppResult<bool>
    where
        E::Model: Sync,
    {
        let first = self.all(select.limit(1u64)).await?;
        Ok(!first.is_empty())
    }

    pub async fn load<E: EagerLoad>(
        &self,
        models: &[E::Model],
        include: &[E::Include],
    ) -> AppResult<Vec<E::Related>>
    where
        E::Model: Sync,
    {
        if include.is_empty() {
            return Ok(vec![E::Related::default(); models.len()]);
        }
        on_current!(self, |db| E::load(models, include, db))
    }

    /// Flushes every pending entry in staging order inside one transaction, or inside a
    /// savepoint when an explicit transaction is open. On failure nothing is written and the
    /// entries stay pending.
    pub async fn save_changes(&self) -> AppResult<usize> {
        let mut tracker = self.inner.tracker.lock().await;
        if tracker.is_empty() {
            return Ok(0);
        }

        let slot = self.inner.transaction.lock().await;
        let entries = tracker.take();
        let now = audit::now();

        let outcome = match slot.as_ref() {
            Some(txn) => self.guard(flush(txn, &entries, now)).await,
            None => self.guard(flush(&self.inner.conn, &entries, now)).await,
        };

        match outcome {
            Ok(written) => {
                tracing::debug!(written, "changes saved");
                Ok(written)
            }
            Err(err) => {
                tracing::warn!(error = %err, pending = entries.len(), "save failed, changes kept");
                tracker.restore(entries);
                Err(err)
            }
        }
    }

    pub async fn discard_changes(&self) -> usize {
        self.inner.tracker.lock().await.clear()
    }

    pub async fn begin_transaction(&self) -> AppResult<()> {
        let mut slot = self.inner.transaction.lock().await;
        if slot.is_some() {
            return Err(AppError::TransactionInProgress);
        }
        let txn = self.guard(self.inner.conn.begin()).await?;
        *slot = Some(txn);
        tracing::debug!("transaction started");
        Ok(())
    }

    pub async fn commit_transaction(&self) -> AppResult<()> {
        let Some(txn) = self.inner.transaction.lock().await.take() else {
            return Ok(());
        };
        self.guard(txn.commit()).await?;
        tracing::debug!("transaction committed");
        Ok(())
    }

    pub async fn rollback_transaction(&self) -> AppResult<()> {
        let Some(txn) = self.inner.transaction.lock().await.take() else {
            return Ok(());
        };
        self.guard(txn.rollback()).await?;
        tracing::debug!("transaction rolled back");
        Ok(())
    }

    pub async fn in_transaction(&self) -> bool {
        self.inner.transaction.lock().await.is_some()
    }
}

async fn flush<C>(
    db: &C,
    entries: &[Box<dyn PendingChange>],
    now: DateTimeWithTimeZone,
) -> Result<usize, DbErr>
where
    C: TransactionTrait + Sync,
{
    let txn = db.begin().await?;
    let written = write_all(&txn, entries, now).await;
    match written {
        Ok(()) => {
            txn.commit().await?;
            Ok(entries.len())
        }
        Err(err) => {
            txn.rollback().await?;
            Err(err)
        }
    }
}

async fn write_all(
    txn: &DatabaseTransaction,
    entries: &[Box<dyn PendingChange>],
    now: DateTimeWithTimeZone,
) -> Result<(), DbErr> {
    let backend = txn.get_database_backend();
    for entry in entries {
        let (state, statement) = entry.prepare(now, backend);
        let result = txn.execute(statement).await?;
        if result.rows_affected() == 0 {
            match state {
                EntryState::Added => {}
                EntryState::Modified => return Err(DbErr::RecordNotUpdated),
                EntryState::Deleted { .. } => {
                    return Err(DbErr::RecordNotFound(format!(
                        "{} {}",
                        entry.table(),
                        entry.key().id
                    )));
                }
            }
        }
        tracing::trace!(table = %entry.table(), id = %entry.key().id, ?state, "entry written");
    }
    Ok(())
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        let pending = self.tracker.get_mut();
        if !pending.is_empty() {
            tracing::debug!(entries = ?pending, "discarding unsaved changes");
        }
        if self.transaction.get_mut().is_some() {
            tracing::debug!("rolling back open transaction");
        }
    }
}
