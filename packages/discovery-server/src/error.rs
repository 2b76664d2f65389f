//! Error taxonomy for the dynamic store and its collaborators.
//!
//! A single `thiserror` enum for the layer, with infrastructure failures
//! wrapped via `#[from] anyhow::Error` and domain-specific variants spelled
//! out individually.

use discovery_core::CodecError;
use thiserror::Error;

/// Errors surfaced by [`crate::dynamic_store::DynamicStore`],
/// [`crate::schema::SchemaManager`], and [`crate::query::QueryResource`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// A caller passed a structurally invalid argument (e.g. an empty
    /// `NodeId`). A programming error -- callers should treat this as fatal
    /// rather than retry.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// `initialize()` was called a second time on the same store.
    #[error("dynamic store already initialized")]
    AlreadyInitialized,

    /// The backing wide-column store failed (connect, timeout, write, read).
    #[error("backing store failure: {0}")]
    Backing(#[from] anyhow::Error),

    /// A stored column's value could not be decoded back into services.
    ///
    /// Only raised by operations where the caller chose not to skip-and-log
    /// (the default `get_all` path logs and skips instead of returning this).
    #[error("codec failure: {0}")]
    Codec(#[from] CodecError),
}
