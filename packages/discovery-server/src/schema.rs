//! Startup schema provisioning for the dynamic announcement column family.

use std::sync::Arc;

use crate::backing::BackingStore;
use crate::error::StoreError;

/// Column family holding per-node dynamic announcement columns.
pub const DYNAMIC_ANNOUNCEMENTS_TABLE: &str = "dynamic_announcements";

/// Tombstone grace applied to [`DYNAMIC_ANNOUNCEMENTS_TABLE`]. Zero, because
/// the registry is a liveness cache, not a system of record: a shorter path
/// from delete to physical removal reduces reaper amplification, and there
/// is nothing to protect against resurrecting a deleted column for.
pub const TOMBSTONE_GRACE_SECONDS: u64 = 0;

/// Ensures the backing keyspace and column family exist before any read or
/// write against the dynamic store.
///
/// Runs once at process startup. Any failure here is fatal -- callers should
/// propagate the error and abort startup rather than attempt degraded
/// operation.
pub struct SchemaManager {
    backing: Arc<dyn BackingStore>,
    keyspace: String,
}

impl SchemaManager {
    /// Creates a schema manager for the given keyspace.
    #[must_use]
    pub fn new(backing: Arc<dyn BackingStore>, keyspace: impl Into<String>) -> Self {
        Self {
            backing,
            keyspace: keyspace.into(),
        }
    }

    /// Ensures the keyspace and `dynamic_announcements` column family exist
    /// with the required tombstone grace period, creating or updating them
    /// as needed.
    pub async fn ensure_ready(&self) -> Result<(), StoreError> {
        tracing::info!(keyspace = %self.keyspace, "ensuring keyspace exists");
        self.backing
            .ensure_keyspace(&self.keyspace)
            .await
            .map_err(StoreError::Backing)?;

        tracing::info!(
            keyspace = %self.keyspace,
            table = DYNAMIC_ANNOUNCEMENTS_TABLE,
            grace_seconds = TOMBSTONE_GRACE_SECONDS,
            "ensuring column family exists"
        );
        self.backing
            .ensure_column_family(
                &self.keyspace,
                DYNAMIC_ANNOUNCEMENTS_TABLE,
                TOMBSTONE_GRACE_SECONDS,
            )
            .await
            .map_err(StoreError::Backing)?;

        Ok(())
    }
}
