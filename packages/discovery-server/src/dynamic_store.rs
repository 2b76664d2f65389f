//! The TTL-keyed, node-addressed dynamic announcement registry.
//!
//! This is the center of gravity of the crate: `put`/`delete` materialize and
//! retire per-node columns in the backing store, `get*` fold each row down to
//! its chosen (newest unexpired) column, and [`DynamicStore::initialize`]
//! starts the background reaper that physically removes columns once they
//! have been dead long enough for the reaper to get around to them.
//!
//! Expiration itself is never a scheduled event: a column's liveness is a
//! pure function of `(now, column.name)`, so every invariant in this module
//! is testable without the reaper running at all.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use discovery_core::{codec, Clock, DynamicAnnouncement, NodeId, Service};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::backing::{BackingStore, RowCursor, StoredColumn};
use crate::config::RegistryConfig;
use crate::error::StoreError;
use crate::reaper;
use crate::schema::DYNAMIC_ANNOUNCEMENTS_TABLE;

/// Picks the chosen column of a row: the live column (expiration strictly
/// greater than `now`, per the data model's "expiration <= now is expired"
/// invariant) with the largest write-timestamp. Ties are broken
/// deterministically -- larger expiration, then lexicographically by encoded
/// value -- so repeated reads of the same state are reproducible in tests;
/// the spec leaves the tiebreak undefined.
fn choose_column(columns: &[StoredColumn], now: i64) -> Option<&StoredColumn> {
    columns
        .iter()
        .filter(|c| c.name > now)
        .max_by(|a, b| {
            a.write_timestamp
                .cmp(&b.write_timestamp)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.value.cmp(&b.value))
        })
}

/// The dynamic announcement store.
///
/// Owns the backing-store handle (shared, not exclusive) and exclusively
/// owns its reaper task once [`initialize`](Self::initialize) has been
/// called.
pub struct DynamicStore {
    backing: Arc<dyn BackingStore>,
    clock: Arc<dyn Clock>,
    config: RegistryConfig,
    initialized: AtomicBool,
    reaper_handle: Mutex<Option<JoinHandle<()>>>,
}

impl DynamicStore {
    /// Creates a store against the given backing store and configuration.
    /// Does not start the reaper; call [`initialize`](Self::initialize) for
    /// that once the schema has been provisioned.
    #[must_use]
    pub fn new(backing: Arc<dyn BackingStore>, clock: Arc<dyn Clock>, config: RegistryConfig) -> Self {
        Self {
            backing,
            clock,
            config,
            initialized: AtomicBool::new(false),
            reaper_handle: Mutex::new(None),
        }
    }

    /// One-shot startup step: starts the background reaper task on a fixed
    /// delay per [`RegistryConfig::reaper_interval`]. A second call is a
    /// programming error.
    ///
    /// # Errors
    /// Returns [`StoreError::AlreadyInitialized`] if called more than once.
    pub async fn initialize(&self) -> Result<(), StoreError> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return Err(StoreError::AlreadyInitialized);
        }

        let handle = reaper::spawn(
            Arc::clone(&self.backing),
            self.config.keyspace.clone(),
            DYNAMIC_ANNOUNCEMENTS_TABLE,
            Arc::clone(&self.clock),
            self.config.page_size,
            self.config.reaper_interval,
        );
        *self.reaper_handle.lock().await = Some(handle);
        Ok(())
    }

    /// Aborts the reaper task, if one was started. Safe to call more than
    /// once and safe to call even if [`initialize`](Self::initialize) was
    /// never called.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.reaper_handle.lock().await.take() {
            handle.abort();
        }
    }

    /// Materializes `announcement`'s services under `node_id`, writes one
    /// new column for the row, and reports whether a prior, still-live
    /// announcement was already present at write time.
    ///
    /// The returned boolean is best-effort, not a serialized compare-and-set:
    /// concurrent `put`s for the same node may both return `true`, and a
    /// write that has not yet propagated to the replica serving the
    /// read-back may also cause a spurious `true`. Callers must not rely on
    /// it for mutual exclusion.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidInput`] for an empty `node_id`, or
    /// [`StoreError::Backing`] if the backing store fails.
    pub async fn put(
        &self,
        node_id: &NodeId,
        announcement: &DynamicAnnouncement,
    ) -> Result<bool, StoreError> {
        if node_id.as_str().is_empty() {
            return Err(StoreError::InvalidInput("nodeId must not be empty".to_string()));
        }

        let services = announcement.materialize(node_id);
        let now = self.clock.now_ms();
        let expiration = now + self.config.max_age.as_millis() as i64;

        self.backing
            .put_column(
                &self.config.keyspace,
                DYNAMIC_ANNOUNCEMENTS_TABLE,
                node_id.as_str(),
                StoredColumn {
                    name: expiration,
                    value: codec::encode(&services),
                    write_timestamp: now,
                },
            )
            .await
            .map_err(StoreError::Backing)?;

        let columns = self
            .backing
            .get_row_columns(&self.config.keyspace, DYNAMIC_ANNOUNCEMENTS_TABLE, node_id.as_str())
            .await
            .map_err(StoreError::Backing)?;

        let had_prior_live_entry = columns
            .iter()
            .filter(|c| c.name > now)
            .any(|c| c.write_timestamp < now);

        Ok(!had_prior_live_entry)
    }

    /// Deletes every column of `node_id`'s row.
    ///
    /// The returned `existed` flag reflects whether the row had any
    /// not-yet-fully-expired entry (expiration strictly after
    /// `now - maxAge`) immediately before the delete was issued. The check
    /// and the delete are not atomic: a concurrent `put` can race between
    /// them, so the returned value is advisory, not authoritative --
    /// documented in the spec as an accepted race, resolved eventually by
    /// the next reaper pass or `put`.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidInput`] for an empty `node_id`, or
    /// [`StoreError::Backing`] if the backing store fails.
    pub async fn delete(&self, node_id: &NodeId) -> Result<bool, StoreError> {
        if node_id.as_str().is_empty() {
            return Err(StoreError::InvalidInput("nodeId must not be empty".to_string()));
        }

        let now = self.clock.now_ms();
        let not_fully_expired_floor = now - self.config.max_age.as_millis() as i64;

        let columns = self
            .backing
            .get_row_columns(&self.config.keyspace, DYNAMIC_ANNOUNCEMENTS_TABLE, node_id.as_str())
            .await
            .map_err(StoreError::Backing)?;
        let existed = columns.iter().any(|c| c.name > not_fully_expired_floor);

        self.backing
            .delete_row(
                &self.config.keyspace,
                DYNAMIC_ANNOUNCEMENTS_TABLE,
                node_id.as_str(),
                now,
            )
            .await
            .map_err(StoreError::Backing)?;

        Ok(existed)
    }

    /// Scans the full column family and returns the union of services from
    /// each row's chosen (newest unexpired) column.
    ///
    /// A column whose stored value fails to decode is logged at error level
    /// and skipped -- per the spec, a single malformed column must never
    /// fail the whole query.
    ///
    /// # Errors
    /// Returns [`StoreError::Backing`] if paginating the backing store fails.
    pub async fn get_all(&self) -> Result<HashSet<Service>, StoreError> {
        let now = self.clock.now_ms();
        let mut result = HashSet::new();
        let mut cursor: Option<RowCursor> = None;

        loop {
            let page = self
                .backing
                .page_rows(
                    &self.config.keyspace,
                    DYNAMIC_ANNOUNCEMENTS_TABLE,
                    cursor,
                    self.config.page_size,
                )
                .await
                .map_err(StoreError::Backing)?;
            let was_full_page = page.rows.len() == self.config.page_size;

            for (row_key, columns) in &page.rows {
                let Some(chosen) = choose_column(columns, now) else {
                    continue;
                };
                match codec::decode(&chosen.value) {
                    Ok(services) => result.extend(services),
                    Err(err) => {
                        tracing::error!(row_key = %row_key, error = %err, "skipping malformed announcement column");
                    }
                }
            }

            cursor = page.next_cursor;
            if !was_full_page || cursor.is_none() {
                break;
            }
        }

        Ok(result)
    }

    /// Returns live services of the given type.
    ///
    /// # Errors
    /// Returns [`StoreError::Backing`] if paginating the backing store fails.
    pub async fn get(&self, service_type: &str) -> Result<HashSet<Service>, StoreError> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .filter(|s| s.service_type == service_type)
            .collect())
    }

    /// Returns live services of the given type and pool.
    ///
    /// # Errors
    /// Returns [`StoreError::Backing`] if paginating the backing store fails.
    pub async fn get_by_type_and_pool(
        &self,
        service_type: &str,
        pool: &str,
    ) -> Result<HashSet<Service>, StoreError> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .filter(|s| s.service_type == service_type && s.pool == pool)
            .collect())
    }
}

impl Drop for DynamicStore {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.reaper_handle.try_lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }
}
