//! Foundation types for LDB, a key-value layer over an integer scoreboard.
//!
//! The host store only knows named objectives holding named entries with
//! signed 32-bit scores. Every other LDB crate depends on `ldb-types` for the
//! vocabulary used to talk about that store.
//!
//! # Key Types
//!
//! - [`ObjectiveId`] -- Validated name of an objective (one "database")
//! - [`Score`] -- The host's integer slot type
//! - [`CorrelationId`] -- Score value linking an array key to its payload entry
//! - [`DisplaySlot`] -- Heads-up display slot an objective can be bound to

pub mod display;
pub mod error;
pub mod objective;
pub mod score;

pub use display::DisplaySlot;
pub use error::TypeError;
pub use objective::ObjectiveId;
pub use score::{CorrelationId, Score, SCORE_MAX, SCORE_MIN};
