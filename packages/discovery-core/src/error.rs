//! Error types owned by the core crate.

use thiserror::Error;

/// Failure decoding a stored announcement column back into `Service`s.
///
/// Per the specification's error-handling design, a `CodecError` is never
/// allowed to fail an entire query: callers catch it, log it, and skip the
/// offending column.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed service list: {0}")]
    Malformed(#[from] serde_json::Error),
}
