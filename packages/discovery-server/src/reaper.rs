//! Background task that physically deletes expired dynamic-announcement
//! columns.
//!
//! Expiration is already enforced as a read-time predicate (see
//! [`crate::dynamic_store`]); this task is an optimization that keeps the
//! backing store from growing unboundedly, not a correctness requirement.

use std::sync::Arc;
use std::time::Duration;

use discovery_core::Clock;
use tokio::task::JoinHandle;

use crate::backing::{BackingStore, RowCursor};

/// Counts produced by a single reaper pass, for logging/metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaperStats {
    pub rows_scanned: usize,
    pub columns_reaped: usize,
}

/// Runs one full pass over the column family, deleting every column whose
/// expiration is at or before the clock's current reading.
///
/// Paginates at `page_size` rows per call to [`BackingStore::page_rows`],
/// continuing while a full page is returned.
pub async fn run_once(
    backing: &dyn BackingStore,
    keyspace: &str,
    table: &str,
    clock: &dyn Clock,
    page_size: usize,
) -> anyhow::Result<ReaperStats> {
    let now = clock.now_ms();
    let mut cursor: Option<RowCursor> = None;
    let mut stats = ReaperStats::default();

    loop {
        let page = backing.page_rows(keyspace, table, cursor, page_size).await?;
        let was_full_page = page.rows.len() == page_size;

        for (row_key, columns) in &page.rows {
            stats.rows_scanned += 1;
            let expired: Vec<i64> = columns
                .iter()
                .filter(|column| column.name <= now)
                .map(|column| column.name)
                .collect();
            if expired.is_empty() {
                continue;
            }
            backing
                .delete_columns(keyspace, table, row_key, &expired, now)
                .await?;
            stats.columns_reaped += expired.len();
        }

        cursor = page.next_cursor;
        if !was_full_page || cursor.is_none() {
            break;
        }
    }

    Ok(stats)
}

/// Spawns the fixed-delay background reaper task: sleeps `interval`, runs a
/// pass, and repeats -- so the next run starts `interval` after the previous
/// one finished, never overlapping with it.
///
/// A failed pass is logged and does not stop the task; only the returned
/// [`JoinHandle`]'s owner aborting it does.
pub fn spawn(
    backing: Arc<dyn BackingStore>,
    keyspace: String,
    table: &'static str,
    clock: Arc<dyn Clock>,
    page_size: usize,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            match run_once(backing.as_ref(), &keyspace, table, clock.as_ref(), page_size).await {
                Ok(stats) => tracing::debug!(
                    rows_scanned = stats.rows_scanned,
                    columns_reaped = stats.columns_reaped,
                    "reaper pass complete"
                ),
                Err(err) => tracing::error!(error = %err, "reaper pass failed, will retry next tick"),
            }
        }
    })
}
