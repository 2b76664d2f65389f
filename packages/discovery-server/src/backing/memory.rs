//! In-memory [`BackingStore`] implementation backed by [`DashMap`].
//!
//! Suitable for single-process deployments and for every test in this
//! crate. Rows are keyed by `(keyspace, table, row_key)`; each row is a
//! `DashMap<i64, StoredColumn>` keyed by column name (expiration).

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;

use super::{BackingStore, RowCursor, RowPage, StoredColumn};

type RowKey = (String, String, String);

/// In-memory backing store, concurrent via [`DashMap`] sharding.
///
/// `ensure_keyspace`/`ensure_column_family` are no-ops beyond bookkeeping --
/// there is no schema to provision in memory, so they only record the
/// tombstone grace period for introspection in tests.
pub struct InMemoryBackingStore {
    rows: DashMap<RowKey, Vec<StoredColumn>>,
    column_families: RwLock<std::collections::HashSet<(String, String)>>,
}

impl InMemoryBackingStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            column_families: RwLock::new(std::collections::HashSet::new()),
        }
    }
}

impl Default for InMemoryBackingStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes a cursor's opaque state into a `u64` offset. Empty state (from
/// [`RowCursor::start`]) is treated as offset 0.
fn decode_cursor_offset(cursor: &RowCursor) -> u64 {
    if cursor.state.is_empty() {
        0
    } else {
        let mut buf = [0u8; 8];
        let len = cursor.state.len().min(8);
        buf[..len].copy_from_slice(&cursor.state[..len]);
        u64::from_le_bytes(buf)
    }
}

/// Encodes an offset into cursor state bytes (little-endian `u64`).
fn encode_cursor_offset(offset: u64) -> Vec<u8> {
    offset.to_le_bytes().to_vec()
}

#[async_trait]
impl BackingStore for InMemoryBackingStore {
    async fn ensure_keyspace(&self, _keyspace: &str) -> anyhow::Result<()> {
        Ok(())
    }

    async fn ensure_column_family(
        &self,
        keyspace: &str,
        table: &str,
        _tombstone_grace_seconds: u64,
    ) -> anyhow::Result<()> {
        self.column_families
            .write()
            .insert((keyspace.to_string(), table.to_string()));
        Ok(())
    }

    async fn put_column(
        &self,
        keyspace: &str,
        table: &str,
        row_key: &str,
        column: StoredColumn,
    ) -> anyhow::Result<()> {
        let key = (keyspace.to_string(), table.to_string(), row_key.to_string());
        let mut row = self.rows.entry(key).or_default();
        if let Some(existing) = row.iter_mut().find(|c| c.name == column.name) {
            *existing = column;
        } else {
            row.push(column);
        }
        Ok(())
    }

    async fn get_row_columns(
        &self,
        keyspace: &str,
        table: &str,
        row_key: &str,
    ) -> anyhow::Result<Vec<StoredColumn>> {
        let key = (keyspace.to_string(), table.to_string(), row_key.to_string());
        Ok(self.rows.get(&key).map(|r| r.clone()).unwrap_or_default())
    }

    async fn delete_row(
        &self,
        keyspace: &str,
        table: &str,
        row_key: &str,
        _at_ms: i64,
    ) -> anyhow::Result<()> {
        let key = (keyspace.to_string(), table.to_string(), row_key.to_string());
        self.rows.remove(&key);
        Ok(())
    }

    async fn delete_columns(
        &self,
        keyspace: &str,
        table: &str,
        row_key: &str,
        column_names: &[i64],
        _at_ms: i64,
    ) -> anyhow::Result<()> {
        let key = (keyspace.to_string(), table.to_string(), row_key.to_string());
        if let Some(mut row) = self.rows.get_mut(&key) {
            row.retain(|c| !column_names.contains(&c.name));
        }
        Ok(())
    }

    async fn page_rows(
        &self,
        keyspace: &str,
        table: &str,
        cursor: Option<RowCursor>,
        page_size: usize,
    ) -> anyhow::Result<RowPage> {
        let cursor = cursor.unwrap_or_default();
        let offset = decode_cursor_offset(&cursor) as usize;

        let mut snapshot: Vec<(String, Vec<StoredColumn>)> = self
            .rows
            .iter()
            .filter(|entry| entry.key().0 == keyspace && entry.key().1 == table)
            .map(|entry| (entry.key().2.clone(), entry.value().clone()))
            .collect();
        // Stable ordering so pagination is well-defined across calls.
        snapshot.sort_by(|a, b| a.0.cmp(&b.0));

        let total = snapshot.len();
        let page: Vec<(String, Vec<StoredColumn>)> =
            snapshot.into_iter().skip(offset).take(page_size).collect();

        let new_offset = offset + page.len();
        let next_cursor = if new_offset >= total {
            None
        } else {
            Some(RowCursor {
                state: encode_cursor_offset(new_offset as u64),
            })
        };

        Ok(RowPage {
            rows: page,
            next_cursor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: i64, value: &str, write_timestamp: i64) -> StoredColumn {
        StoredColumn {
            name,
            value: value.to_string(),
            write_timestamp,
        }
    }

    #[tokio::test]
    async fn put_and_get_round_trip() {
        let store = InMemoryBackingStore::new();
        store
            .put_column("ks", "tbl", "row1", column(100, "a", 1))
            .await
            .unwrap();

        let columns = store.get_row_columns("ks", "tbl", "row1").await.unwrap();
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].value, "a");
    }

    #[tokio::test]
    async fn put_column_with_same_name_overwrites() {
        let store = InMemoryBackingStore::new();
        store
            .put_column("ks", "tbl", "row1", column(100, "a", 1))
            .await
            .unwrap();
        store
            .put_column("ks", "tbl", "row1", column(100, "b", 2))
            .await
            .unwrap();

        let columns = store.get_row_columns("ks", "tbl", "row1").await.unwrap();
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].value, "b");
        assert_eq!(columns[0].write_timestamp, 2);
    }

    #[tokio::test]
    async fn put_column_with_different_name_coexists() {
        let store = InMemoryBackingStore::new();
        store
            .put_column("ks", "tbl", "row1", column(100, "a", 1))
            .await
            .unwrap();
        store
            .put_column("ks", "tbl", "row1", column(200, "b", 2))
            .await
            .unwrap();

        let columns = store.get_row_columns("ks", "tbl", "row1").await.unwrap();
        assert_eq!(columns.len(), 2);
    }

    #[tokio::test]
    async fn delete_columns_removes_only_named_columns() {
        let store = InMemoryBackingStore::new();
        store
            .put_column("ks", "tbl", "row1", column(100, "a", 1))
            .await
            .unwrap();
        store
            .put_column("ks", "tbl", "row1", column(200, "b", 2))
            .await
            .unwrap();

        store
            .delete_columns("ks", "tbl", "row1", &[100], 3)
            .await
            .unwrap();

        let columns = store.get_row_columns("ks", "tbl", "row1").await.unwrap();
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].name, 200);
    }

    #[tokio::test]
    async fn delete_row_removes_all_columns() {
        let store = InMemoryBackingStore::new();
        store
            .put_column("ks", "tbl", "row1", column(100, "a", 1))
            .await
            .unwrap();
        store.delete_row("ks", "tbl", "row1", 2).await.unwrap();

        let columns = store.get_row_columns("ks", "tbl", "row1").await.unwrap();
        assert!(columns.is_empty());
    }

    #[tokio::test]
    async fn page_rows_paginates_with_cursor() {
        let store = InMemoryBackingStore::new();
        for i in 0..5 {
            store
                .put_column("ks", "tbl", &format!("row{i}"), column(100, "a", 1))
                .await
                .unwrap();
        }

        let page1 = store.page_rows("ks", "tbl", None, 3).await.unwrap();
        assert_eq!(page1.rows.len(), 3);
        assert!(page1.next_cursor.is_some());

        let page2 = store
            .page_rows("ks", "tbl", page1.next_cursor, 3)
            .await
            .unwrap();
        assert_eq!(page2.rows.len(), 2);
        assert!(page2.next_cursor.is_none());
    }

    #[tokio::test]
    async fn page_rows_scopes_to_keyspace_and_table() {
        let store = InMemoryBackingStore::new();
        store
            .put_column("ks1", "tbl", "row1", column(100, "a", 1))
            .await
            .unwrap();
        store
            .put_column("ks2", "tbl", "row2", column(100, "a", 1))
            .await
            .unwrap();

        let page = store.page_rows("ks1", "tbl", None, 10).await.unwrap();
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].0, "row1");
    }
}
