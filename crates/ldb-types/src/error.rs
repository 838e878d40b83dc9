use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid objective id {id:?}: {reason}")]
    InvalidObjectiveId { id: String, reason: String },

    #[error("unknown display slot: {0}")]
    UnknownDisplaySlot(String),
}
