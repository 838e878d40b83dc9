use ldb_types::{ObjectiveId, Score};

/// Errors raised by the host objective store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The objective does not exist.
    #[error("objective not found: {0}")]
    ObjectiveNotFound(ObjectiveId),

    /// An objective with this id already exists.
    #[error("objective already exists: {0}")]
    ObjectiveExists(ObjectiveId),

    /// Entry names must be non-empty.
    #[error("invalid entry name: {0:?}")]
    InvalidEntryName(String),

    /// Adding to a score would leave the 32-bit range.
    #[error("score overflow for {entry:?} in {objective}: {current} + {delta}")]
    ScoreOverflow {
        objective: ObjectiveId,
        entry: String,
        current: Score,
        delta: Score,
    },

    /// A lock guarding host state was poisoned.
    #[error("store lock poisoned: {0}")]
    Poisoned(String),

    /// The host is unavailable or rejected the call for another reason.
    #[error("host store unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
