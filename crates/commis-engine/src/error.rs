//! Engine-level errors.

use thiserror::Error;

use commis_store::StoreError;

/// Error aborting a whole engine call.
///
/// Per-constraint and per-rule problems never surface here; they become
/// skipped or failed rows in the result instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The caller cancelled mid-run; partial progress was discarded.
    #[error("validation cancelled")]
    Cancelled,
    /// The shared rulebook could not be loaded.
    #[error("rulebook unavailable: {0}")]
    Store(#[from] StoreError),
}
