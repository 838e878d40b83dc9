//! Key-value layers for LDB.
//!
//! The host store only holds integer scores, so this crate builds two
//! layers on top of it:
//!
//! - [`ScalarStore`] -- one key, one integer: exactly one entry per key.
//! - [`ArrayStore`] -- one key, one serialized array: two entries sharing a
//!   [`CorrelationId`](ldb_types::CorrelationId). The key entry holds the id
//!   as its score; the payload entry is named by the array's JSON text and
//!   holds the same id.
//!
//! # Array Records
//!
//! Identifiers come from an [`IdAllocator`] that never hands out a score
//! already held in the target objective. A per-database [`ArrayIndex`] maps
//! keys to their payload entry so reads and deletes skip the full-store
//! scan; the host stays the source of truth and every index hit is checked
//! against it before use.
//!
//! Nothing here is transactional. A multi-step write or delete interrupted
//! by a host failure can leave an orphaned entry; such failures surface as
//! [`KvError::PartialRemoval`] and show up in [`check_integrity`](ArrayStore::check_integrity).

pub mod array;
pub mod error;
pub mod ids;
pub mod index;
pub mod integrity;
pub mod scalar;

pub use array::ArrayStore;
pub use error::{KvError, KvResult};
pub use ids::{IdAllocator, IdConfig, IdStrategy};
pub use index::{ArrayIndex, ArrayRecord};
pub use integrity::{IntegrityReport, SharedId};
pub use scalar::ScalarStore;
