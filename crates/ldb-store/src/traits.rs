use ldb_types::{DisplaySlot, ObjectiveId, Score};

use crate::error::StoreResult;

/// Integer-scoring host store.
///
/// This is the only boundary LDB talks to. Implementations wrap whatever
/// scoreboard the host provides; LDB assumes calls are synchronous and
/// return promptly.
pub trait ObjectiveStore: Send + Sync {
    /// Create an objective. Fails with `ObjectiveExists` if the id is taken.
    fn create_objective(&self, id: &ObjectiveId, display_name: &str) -> StoreResult<()>;

    /// Remove an objective and all of its scores. Returns `true` if it existed.
    fn remove_objective(&self, id: &ObjectiveId) -> StoreResult<bool>;

    /// Check whether an objective exists.
    fn has_objective(&self, id: &ObjectiveId) -> StoreResult<bool>;

    /// Bind an objective to a display slot.
    ///
    /// Returns the objective previously bound to the slot, if any.
    fn set_display(&self, slot: DisplaySlot, id: &ObjectiveId) -> StoreResult<Option<ObjectiveId>>;

    /// Clear a display slot, returning the objective that was bound.
    fn clear_display(&self, slot: DisplaySlot) -> StoreResult<Option<ObjectiveId>>;

    /// The objective currently bound to a display slot.
    fn display(&self, slot: DisplaySlot) -> StoreResult<Option<ObjectiveId>>;

    /// Read an entry's score. `Ok(None)` if the entry holds no score here.
    fn get_score(&self, id: &ObjectiveId, entry: &str) -> StoreResult<Option<Score>>;

    /// Assign an entry's score, overwriting any existing one.
    fn set_score(&self, id: &ObjectiveId, entry: &str, score: Score) -> StoreResult<()>;

    /// Add `delta` to an entry's score, creating it at `delta` if absent.
    ///
    /// Returns the new score.
    fn add_score(&self, id: &ObjectiveId, entry: &str, delta: Score) -> StoreResult<Score>;

    /// Remove an entry's score. Returns `true` if the entry had one.
    fn remove_entry(&self, id: &ObjectiveId, entry: &str) -> StoreResult<bool>;

    /// Every entry name holding a score in any objective.
    ///
    /// Order is host-defined; callers must not rely on it.
    fn list_entries(&self) -> StoreResult<Vec<String>>;

    /// Entries of one objective with their scores.
    ///
    /// Default implementation filters `list_entries()` through `get_score()`.
    /// Backends may override with a direct listing.
    fn scores(&self, id: &ObjectiveId) -> StoreResult<Vec<(String, Score)>> {
        let mut result = Vec::new();
        for entry in self.list_entries()? {
            if let Some(score) = self.get_score(id, &entry)? {
                result.push((entry, score));
            }
        }
        Ok(result)
    }
}
