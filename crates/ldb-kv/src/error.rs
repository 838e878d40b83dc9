//! Error types for key-value operations.

use ldb_store::StoreError;
use ldb_types::{CorrelationId, ObjectiveId};
use thiserror::Error;

/// Errors raised by the scalar and array layers.
#[derive(Debug, Error)]
pub enum KvError {
    /// The host store rejected an operation.
    #[error("host store error: {0}")]
    Store(#[from] StoreError),

    /// An array could not be serialized. Nothing was written.
    #[error("cannot encode array for key {key:?}: {source}")]
    Encoding {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A payload entry did not decode into the requested element type.
    #[error("cannot decode payload {payload:?} of key {key:?}: {source}")]
    Decoding {
        key: String,
        payload: String,
        #[source]
        source: serde_json::Error,
    },

    /// No unused correlation identifier could be found.
    #[error("no free correlation id in {db} after {attempts} attempts")]
    IdSpaceExhausted { db: ObjectiveId, attempts: u32 },

    /// Identifier settings are unusable.
    #[error("invalid id config: {0}")]
    InvalidIdConfig(String),

    /// A delete stopped part way; the listed entries were left behind.
    #[error("partial removal of {key:?} ({id}) in {db}: {remaining:?} left behind: {source}")]
    PartialRemoval {
        db: ObjectiveId,
        key: String,
        id: CorrelationId,
        remaining: Vec<String>,
        #[source]
        source: Box<KvError>,
    },

    /// The key entry was written but its payload entry was not.
    #[error("partial write of {key:?} ({id}) in {db}: payload entry missing: {source}")]
    PartialWrite {
        db: ObjectiveId,
        key: String,
        id: CorrelationId,
        #[source]
        source: Box<KvError>,
    },

    /// The array index lock was poisoned.
    #[error("index lock poisoned: {0}")]
    Poisoned(String),
}

/// Result alias for key-value operations.
pub type KvResult<T> = Result<T, KvError>;
