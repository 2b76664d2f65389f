//! The wide-column backing store seam.
//!
//! The specification treats the backing store as an assumed external
//! dependency and only describes the persisted-state layout (row key,
//! column name/value/write-timestamp, tombstone grace). [`BackingStore`] is
//! the trait this crate actually programs against; a production deployment
//! implements it against a real wide-column client (Cassandra, ScyllaDB, ...).
//! [`memory::InMemoryBackingStore`] is the reference implementation used by
//! every test in this crate and suitable for single-process deployments.

pub mod memory;

use async_trait::async_trait;

/// A single stored column, matching the persisted-state layout in the spec:
/// name = expiration (ms since epoch), value = encoded service list,
/// write_timestamp = the last-writer-wins clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredColumn {
    /// Absolute expiration time in epoch milliseconds.
    pub name: i64,
    /// UTF-8 encoded service list.
    pub value: String,
    /// Wall-clock write time in epoch milliseconds; also the LWW timestamp.
    pub write_timestamp: i64,
}

/// Opaque cursor for resumable row-pagination. Callers must treat `state`
/// as opaque and only ever pass back a cursor they were previously handed.
#[derive(Debug, Clone, Default)]
pub struct RowCursor {
    pub(crate) state: Vec<u8>,
}

impl RowCursor {
    /// A cursor positioned at the beginning of the column family.
    #[must_use]
    pub fn start() -> Self {
        Self::default()
    }
}

/// One page of rows returned by [`BackingStore::page_rows`].
#[derive(Debug, Clone, Default)]
pub struct RowPage {
    /// Row key plus its full (unfiltered) column set, for this page.
    pub rows: Vec<(String, Vec<StoredColumn>)>,
    /// Cursor to pass to the next call. `None` once iteration is exhausted.
    pub next_cursor: Option<RowCursor>,
}

/// Pluggable wide-column store client contract.
///
/// Every method may block on network I/O; implementations are expected to be
/// cheap to clone/share (`Arc<dyn BackingStore>`) and safe for concurrent use
/// from many callers at once.
#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Ensures the named keyspace exists, creating it with default
    /// replication if missing.
    async fn ensure_keyspace(&self, keyspace: &str) -> anyhow::Result<()>;

    /// Ensures `table` exists within `keyspace` with the given tombstone
    /// grace period (in seconds). If the table exists with a different
    /// grace period, updates it in place.
    async fn ensure_column_family(
        &self,
        keyspace: &str,
        table: &str,
        tombstone_grace_seconds: u64,
    ) -> anyhow::Result<()>;

    /// Writes a single column to `row_key`, superseding any prior column with
    /// the same name (expiration) but leaving columns with other names
    /// (transient overlapping announcements) in place.
    async fn put_column(
        &self,
        keyspace: &str,
        table: &str,
        row_key: &str,
        column: StoredColumn,
    ) -> anyhow::Result<()>;

    /// Returns every column currently stored for `row_key`, regardless of
    /// expiration. Callers apply liveness filtering themselves.
    async fn get_row_columns(
        &self,
        keyspace: &str,
        table: &str,
        row_key: &str,
    ) -> anyhow::Result<Vec<StoredColumn>>;

    /// Deletes every column of `row_key` with a tombstone at `at_ms`.
    async fn delete_row(
        &self,
        keyspace: &str,
        table: &str,
        row_key: &str,
        at_ms: i64,
    ) -> anyhow::Result<()>;

    /// Deletes the named columns of `row_key` with a tombstone at `at_ms`.
    /// Used by the reaper to remove only expired columns.
    async fn delete_columns(
        &self,
        keyspace: &str,
        table: &str,
        row_key: &str,
        column_names: &[i64],
        at_ms: i64,
    ) -> anyhow::Result<()>;

    /// Fetches at least one page of rows starting from `cursor` (or the
    /// beginning, if `None`), each with its full column set.
    async fn page_rows(
        &self,
        keyspace: &str,
        table: &str,
        cursor: Option<RowCursor>,
        page_size: usize,
    ) -> anyhow::Result<RowPage>;
}
