//! Registry-level configuration.
//!
//! A plain, `Clone`-able struct rather than a builder -- configuration
//! loading (files, env vars, CLI flags) is an external collaborator's job,
//! not this crate's.

use std::time::Duration;

/// Default fixed-delay period between reaper passes (one minute, per spec).
pub const DEFAULT_REAPER_INTERVAL: Duration = Duration::from_secs(60);

/// Default row-pagination page size for `getAll()` scans and the reaper.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Configuration consumed by [`crate::dynamic_store::DynamicStore`] and
/// [`crate::schema::SchemaManager`].
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Tag attached to every query response; not used to filter writes.
    pub environment: String,
    /// TTL applied to every dynamic column.
    pub max_age: Duration,
    /// Backing-store keyspace name.
    pub keyspace: String,
    /// Fixed-delay period between reaper passes.
    pub reaper_interval: Duration,
    /// Row-pagination page size for scans.
    pub page_size: usize,
}

impl RegistryConfig {
    /// Creates a configuration with the required fields and the spec's
    /// documented defaults for the rest.
    #[must_use]
    pub fn new(environment: impl Into<String>, max_age: Duration, keyspace: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            max_age,
            keyspace: keyspace.into(),
            reaper_interval: DEFAULT_REAPER_INTERVAL,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
