//! High-level SDK for LDB.
//!
//! [`Ldb`] is the database facade: it owns the scalar and array layers over
//! one injected [`ObjectiveStore`] and exposes named databases with
//! create/remove/show/hide lifecycle operations. This is the main entry
//! point for applications embedding LDB.
//!
//! ```
//! use std::sync::Arc;
//! use ldb_sdk::{InMemoryObjectiveStore, Ldb, LdbConfig, ObjectiveId};
//!
//! let ldb = Ldb::new(Arc::new(InMemoryObjectiveStore::new()), LdbConfig::default()).unwrap();
//! let db = ObjectiveId::new("testDataBase").unwrap();
//! ldb.set_array(&db, "colors", &["Red", "Blue"]).unwrap();
//! let colors: Option<Vec<String>> = ldb.get_array(&db, "colors").unwrap();
//! assert_eq!(colors.unwrap(), ["Red", "Blue"]);
//! ```

pub mod config;
pub mod database;
pub mod error;

pub use config::LdbConfig;
pub use database::Ldb;
pub use error::{LdbError, LdbResult};

// Re-export key types
pub use ldb_kv::{IdConfig, IdStrategy, IntegrityReport, SharedId};
pub use ldb_store::{InMemoryObjectiveStore, ObjectiveStore, StoreError};
pub use ldb_types::{CorrelationId, DisplaySlot, ObjectiveId, Score};
