use ldb_kv::KvError;
use ldb_types::ObjectiveId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LdbError {
    /// The host store rejected part of the operation.
    #[error("{op} on {db}: host store failure: {source}")]
    Host {
        op: &'static str,
        db: ObjectiveId,
        #[source]
        source: KvError,
    },

    /// An array value could not be serialized or deserialized.
    #[error("{op} on {db}: {source}")]
    Encoding {
        op: &'static str,
        db: ObjectiveId,
        #[source]
        source: KvError,
    },

    /// A multi-step write or delete stopped part way, leaving orphaned entries.
    #[error("{op} on {db}: inconsistent state: {source}")]
    Inconsistent {
        op: &'static str,
        db: ObjectiveId,
        #[source]
        source: KvError,
    },

    #[error("{op} on {db}: {source}")]
    Kv {
        op: &'static str,
        db: ObjectiveId,
        #[source]
        source: KvError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl LdbError {
    /// Classify a layer error for operation `op` on `db`.
    pub(crate) fn from_kv(op: &'static str, db: &ObjectiveId, source: KvError) -> Self {
        let db = db.clone();
        match source {
            KvError::Store(_) => Self::Host { op, db, source },
            KvError::Encoding { .. } | KvError::Decoding { .. } => Self::Encoding { op, db, source },
            KvError::PartialRemoval { .. } | KvError::PartialWrite { .. } => {
                Self::Inconsistent { op, db, source }
            }
            _ => Self::Kv { op, db, source },
        }
    }
}

pub type LdbResult<T> = Result<T, LdbError>;
