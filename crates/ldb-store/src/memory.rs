use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use ldb_types::{DisplaySlot, ObjectiveId, Score};

use crate::error::{StoreError, StoreResult};
use crate::traits::ObjectiveStore;

#[derive(Debug, Default)]
struct Objective {
    display_name: String,
    scores: HashMap<String, Score>,
}

#[derive(Debug, Default)]
struct Scoreboard {
    objectives: HashMap<ObjectiveId, Objective>,
    /// Entry names in first-seen order; pruned once a name holds no score.
    participants: Vec<String>,
    /// Membership of `participants`.
    known: HashSet<String>,
    displays: HashMap<DisplaySlot, ObjectiveId>,
}

impl Scoreboard {
    fn objective(&self, id: &ObjectiveId) -> StoreResult<&Objective> {
        self.objectives
            .get(id)
            .ok_or_else(|| StoreError::ObjectiveNotFound(id.clone()))
    }

    fn objective_mut(&mut self, id: &ObjectiveId) -> StoreResult<&mut Objective> {
        self.objectives
            .get_mut(id)
            .ok_or_else(|| StoreError::ObjectiveNotFound(id.clone()))
    }

    fn track(&mut self, entry: &str) {
        if !self.known.contains(entry) {
            self.known.insert(entry.to_string());
            self.participants.push(entry.to_string());
        }
    }

    fn prune(&mut self) {
        let objectives = &self.objectives;
        let known = &mut self.known;
        self.participants.retain(|p| {
            let held = objectives.values().any(|o| o.scores.contains_key(p));
            if !held {
                known.remove(p);
            }
            held
        });
    }
}

fn check_entry(entry: &str) -> StoreResult<()> {
    if entry.is_empty() {
        return Err(StoreError::InvalidEntryName(entry.to_string()));
    }
    Ok(())
}

/// In-memory scoreboard host.
///
/// Intended for tests, tools, and embedding. State is held behind a single
/// `RwLock` so every call sees a consistent scoreboard. Data is lost when
/// the store is dropped.
pub struct InMemoryObjectiveStore {
    board: RwLock<Scoreboard>,
}

impl InMemoryObjectiveStore {
    /// Create a new empty scoreboard.
    pub fn new() -> Self {
        Self {
            board: RwLock::new(Scoreboard::default()),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Scoreboard>> {
        self.board
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Scoreboard>> {
        self.board
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    /// Number of objectives currently defined.
    pub fn objective_count(&self) -> StoreResult<usize> {
        Ok(self.read()?.objectives.len())
    }

    /// Sorted ids of all objectives.
    pub fn objective_ids(&self) -> StoreResult<Vec<ObjectiveId>> {
        let board = self.read()?;
        let mut ids: Vec<ObjectiveId> = board.objectives.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    /// Display name given when the objective was created.
    pub fn display_name(&self, id: &ObjectiveId) -> StoreResult<String> {
        Ok(self.read()?.objective(id)?.display_name.clone())
    }
}

impl Default for InMemoryObjectiveStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectiveStore for InMemoryObjectiveStore {
    fn create_objective(&self, id: &ObjectiveId, display_name: &str) -> StoreResult<()> {
        let mut board = self.write()?;
        if board.objectives.contains_key(id) {
            return Err(StoreError::ObjectiveExists(id.clone()));
        }
        board.objectives.insert(
            id.clone(),
            Objective {
                display_name: display_name.to_string(),
                scores: HashMap::new(),
            },
        );
        tracing::debug!(objective = %id, "objective created");
        Ok(())
    }

    fn remove_objective(&self, id: &ObjectiveId) -> StoreResult<bool> {
        let mut board = self.write()?;
        if board.objectives.remove(id).is_none() {
            return Ok(false);
        }
        board.displays.retain(|_, bound| bound != id);
        board.prune();
        tracing::debug!(objective = %id, "objective removed");
        Ok(true)
    }

    fn has_objective(&self, id: &ObjectiveId) -> StoreResult<bool> {
        Ok(self.read()?.objectives.contains_key(id))
    }

    fn set_display(&self, slot: DisplaySlot, id: &ObjectiveId) -> StoreResult<Option<ObjectiveId>> {
        let mut board = self.write()?;
        board.objective(id)?;
        Ok(board.displays.insert(slot, id.clone()))
    }

    fn clear_display(&self, slot: DisplaySlot) -> StoreResult<Option<ObjectiveId>> {
        Ok(self.write()?.displays.remove(&slot))
    }

    fn display(&self, slot: DisplaySlot) -> StoreResult<Option<ObjectiveId>> {
        Ok(self.read()?.displays.get(&slot).cloned())
    }

    fn get_score(&self, id: &ObjectiveId, entry: &str) -> StoreResult<Option<Score>> {
        let board = self.read()?;
        Ok(board.objective(id)?.scores.get(entry).copied())
    }

    fn set_score(&self, id: &ObjectiveId, entry: &str, score: Score) -> StoreResult<()> {
        check_entry(entry)?;
        let mut board = self.write()?;
        board
            .objective_mut(id)?
            .scores
            .insert(entry.to_string(), score);
        board.track(entry);
        Ok(())
    }

    fn add_score(&self, id: &ObjectiveId, entry: &str, delta: Score) -> StoreResult<Score> {
        check_entry(entry)?;
        let mut board = self.write()?;
        let objective = board.objective_mut(id)?;
        let current = objective.scores.get(entry).copied().unwrap_or(0);
        let next = current
            .checked_add(delta)
            .ok_or_else(|| StoreError::ScoreOverflow {
                objective: id.clone(),
                entry: entry.to_string(),
                current,
                delta,
            })?;
        objective.scores.insert(entry.to_string(), next);
        board.track(entry);
        Ok(next)
    }

    fn remove_entry(&self, id: &ObjectiveId, entry: &str) -> StoreResult<bool> {
        let mut board = self.write()?;
        let removed = board.objective_mut(id)?.scores.remove(entry).is_some();
        if removed {
            board.prune();
        }
        Ok(removed)
    }

    fn list_entries(&self) -> StoreResult<Vec<String>> {
        Ok(self.read()?.participants.clone())
    }

    fn scores(&self, id: &ObjectiveId) -> StoreResult<Vec<(String, Score)>> {
        let board = self.read()?;
        let objective = board.objective(id)?;
        Ok(board
            .participants
            .iter()
            .filter_map(|p| objective.scores.get(p).map(|s| (p.clone(), *s)))
            .collect())
    }
}

impl std::fmt::Debug for InMemoryObjectiveStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.objective_count().unwrap_or_default();
        f.debug_struct("InMemoryObjectiveStore")
            .field("objective_count", &count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(name: &str) -> ObjectiveId {
        ObjectiveId::new(name).unwrap()
    }

    fn store_with(names: &[&str]) -> InMemoryObjectiveStore {
        let store = InMemoryObjectiveStore::new();
        for name in names {
            store.create_objective(&oid(name), name).unwrap();
        }
        store
    }

    // -----------------------------------------------------------------------
    // Objectives
    // -----------------------------------------------------------------------

    #[test]
    fn create_and_probe_objective() {
        let store = store_with(&["db"]);
        assert!(store.has_objective(&oid("db")).unwrap());
        assert!(!store.has_objective(&oid("other")).unwrap());
        assert_eq!(store.display_name(&oid("db")).unwrap(), "db");
    }

    #[test]
    fn create_twice_fails() {
        let store = store_with(&["db"]);
        let err = store.create_objective(&oid("db"), "db").unwrap_err();
        assert!(matches!(err, StoreError::ObjectiveExists(_)));
    }

    #[test]
    fn remove_objective_reports_presence() {
        let store = store_with(&["db"]);
        assert!(store.remove_objective(&oid("db")).unwrap());
        assert!(!store.remove_objective(&oid("db")).unwrap());
        assert_eq!(store.objective_count().unwrap(), 0);
    }

    #[test]
    fn objective_ids_sorted() {
        let store = store_with(&["b", "a", "c"]);
        assert_eq!(store.objective_ids().unwrap(), vec![oid("a"), oid("b"), oid("c")]);
    }

    // -----------------------------------------------------------------------
    // Scores
    // -----------------------------------------------------------------------

    #[test]
    fn set_get_remove_score() {
        let store = store_with(&["db"]);
        let db = oid("db");
        assert_eq!(store.get_score(&db, "k").unwrap(), None);
        store.set_score(&db, "k", 0).unwrap();
        assert_eq!(store.get_score(&db, "k").unwrap(), Some(0));
        store.set_score(&db, "k", -7).unwrap();
        assert_eq!(store.get_score(&db, "k").unwrap(), Some(-7));
        assert!(store.remove_entry(&db, "k").unwrap());
        assert!(!store.remove_entry(&db, "k").unwrap());
        assert_eq!(store.get_score(&db, "k").unwrap(), None);
    }

    #[test]
    fn add_score_creates_and_accumulates() {
        let store = store_with(&["db"]);
        let db = oid("db");
        assert_eq!(store.add_score(&db, "k", 5).unwrap(), 5);
        assert_eq!(store.add_score(&db, "k", -2).unwrap(), 3);
    }

    #[test]
    fn add_score_overflow_is_rejected() {
        let store = store_with(&["db"]);
        let db = oid("db");
        store.set_score(&db, "k", i32::MAX).unwrap();
        let err = store.add_score(&db, "k", 1).unwrap_err();
        assert!(matches!(err, StoreError::ScoreOverflow { .. }));
        assert_eq!(store.get_score(&db, "k").unwrap(), Some(i32::MAX));
    }

    #[test]
    fn scoped_calls_on_missing_objective_fail() {
        let store = InMemoryObjectiveStore::new();
        let db = oid("missing");
        assert!(matches!(
            store.get_score(&db, "k"),
            Err(StoreError::ObjectiveNotFound(_))
        ));
        assert!(store.set_score(&db, "k", 1).is_err());
        assert!(store.remove_entry(&db, "k").is_err());
    }

    #[test]
    fn empty_entry_name_rejected() {
        let store = store_with(&["db"]);
        assert!(matches!(
            store.set_score(&oid("db"), "", 1),
            Err(StoreError::InvalidEntryName(_))
        ));
    }

    // -----------------------------------------------------------------------
    // Participants
    // -----------------------------------------------------------------------

    #[test]
    fn list_entries_spans_objectives() {
        let store = store_with(&["a", "b"]);
        store.set_score(&oid("a"), "x", 1).unwrap();
        store.set_score(&oid("b"), "y", 2).unwrap();
        store.set_score(&oid("b"), "x", 3).unwrap();
        assert_eq!(store.list_entries().unwrap(), vec!["x", "y"]);
        assert_eq!(
            store.scores(&oid("b")).unwrap(),
            vec![("x".to_string(), 3), ("y".to_string(), 2)]
        );
    }

    #[test]
    fn participants_pruned_when_scoreless() {
        let store = store_with(&["a", "b"]);
        store.set_score(&oid("a"), "x", 1).unwrap();
        store.set_score(&oid("b"), "x", 1).unwrap();
        store.remove_entry(&oid("a"), "x").unwrap();
        assert_eq!(store.list_entries().unwrap(), vec!["x"]);
        store.remove_objective(&oid("b")).unwrap();
        assert!(store.list_entries().unwrap().is_empty());
    }

    #[test]
    fn pruned_participant_rejoins_at_the_end() {
        let store = store_with(&["db"]);
        let db = oid("db");
        for name in ["x", "y", "z"] {
            store.set_score(&db, name, 1).unwrap();
        }
        store.set_score(&db, "x", 2).unwrap();
        assert_eq!(store.list_entries().unwrap(), vec!["x", "y", "z"]);

        store.remove_entry(&db, "x").unwrap();
        store.add_score(&db, "x", 1).unwrap();
        assert_eq!(store.list_entries().unwrap(), vec!["y", "z", "x"]);
    }

    #[test]
    fn many_participants_keep_first_seen_order() {
        let store = store_with(&["db"]);
        let db = oid("db");
        let names: Vec<String> = (0..5_000).map(|i| format!("e{i}")).collect();
        for name in &names {
            store.set_score(&db, name, 0).unwrap();
            store.set_score(&db, name, 1).unwrap();
        }
        assert_eq!(store.list_entries().unwrap(), names);
    }

    // -----------------------------------------------------------------------
    // Display slots
    // -----------------------------------------------------------------------

    #[test]
    fn display_binding_returns_previous() {
        let store = store_with(&["a", "b"]);
        assert_eq!(store.set_display(DisplaySlot::Sidebar, &oid("a")).unwrap(), None);
        assert_eq!(
            store.set_display(DisplaySlot::Sidebar, &oid("b")).unwrap(),
            Some(oid("a"))
        );
        assert_eq!(store.display(DisplaySlot::Sidebar).unwrap(), Some(oid("b")));
        assert_eq!(store.clear_display(DisplaySlot::Sidebar).unwrap(), Some(oid("b")));
        assert_eq!(store.clear_display(DisplaySlot::Sidebar).unwrap(), None);
    }

    #[test]
    fn display_missing_objective_fails() {
        let store = InMemoryObjectiveStore::new();
        assert!(matches!(
            store.set_display(DisplaySlot::List, &oid("nope")),
            Err(StoreError::ObjectiveNotFound(_))
        ));
    }

    #[test]
    fn removing_objective_unbinds_display() {
        let store = store_with(&["a"]);
        store.set_display(DisplaySlot::BelowName, &oid("a")).unwrap();
        store.remove_objective(&oid("a")).unwrap();
        assert_eq!(store.display(DisplaySlot::BelowName).unwrap(), None);
    }

    #[test]
    fn debug_format() {
        let store = store_with(&["a"]);
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryObjectiveStore"));
        assert!(debug.contains("objective_count"));
    }
}
