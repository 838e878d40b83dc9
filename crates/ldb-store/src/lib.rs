//! Objective store contract for LDB.
//!
//! The host environment owns a scoreboard: named objectives, each holding
//! named entries mapped to signed 32-bit scores, with at most one score per
//! entry name per objective. LDB never persists anything itself; every byte
//! it keeps lives in that scoreboard.
//!
//! # Backends
//!
//! All hosts implement the [`ObjectiveStore`] trait:
//!
//! - [`InMemoryObjectiveStore`] -- `HashMap`-based scoreboard for tests and embedding
//!
//! # Contract Rules
//!
//! 1. Objective-scoped calls on a missing objective fail with
//!    [`StoreError::ObjectiveNotFound`].
//! 2. An entry exists in an objective exactly when it holds a score there.
//! 3. `list_entries` spans every objective; callers filter by objective.
//! 4. Removing an objective unbinds it from every display slot.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryObjectiveStore;
pub use traits::ObjectiveStore;
