use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use ldb_kv::{ArrayStore, IdAllocator, IntegrityReport, KvError, ScalarStore};
use ldb_store::{InMemoryObjectiveStore, ObjectiveStore};
use ldb_types::{CorrelationId, ObjectiveId, Score};

use crate::config::LdbConfig;
use crate::error::{LdbError, LdbResult};

/// Database facade over one objective store.
///
/// A database is one objective. Reads of missing databases or keys return
/// `Ok(None)`; writes create the database on demand. Host failures are
/// logged with the operation name and database id before being returned
/// as [`LdbError`], so no panic or untyped error crosses this boundary.
pub struct Ldb<S> {
    config: LdbConfig,
    arrays: ArrayStore<S>,
}

impl Ldb<InMemoryObjectiveStore> {
    /// A facade over a fresh in-memory scoreboard.
    pub fn in_memory(config: LdbConfig) -> LdbResult<Self> {
        Self::new(Arc::new(InMemoryObjectiveStore::new()), config)
    }
}

impl<S: ObjectiveStore> Ldb<S> {
    pub fn new(store: Arc<S>, config: LdbConfig) -> LdbResult<Self> {
        config.validate()?;
        let ids = IdAllocator::new(config.ids.clone()).map_err(|e| LdbError::Config(e.to_string()))?;
        let arrays = ArrayStore::new(ScalarStore::new(store), ids);
        Ok(Self { config, arrays })
    }

    pub fn config(&self) -> &LdbConfig {
        &self.config
    }

    /// The injected host store.
    pub fn store(&self) -> &Arc<S> {
        self.arrays.scalar().store()
    }

    fn scalar(&self) -> &ScalarStore<S> {
        self.arrays.scalar()
    }

    fn check<T>(op: &'static str, db: &ObjectiveId, result: Result<T, KvError>) -> LdbResult<T> {
        result.map_err(|source| {
            tracing::error!(op, db = %db, error = %source, "database operation failed");
            LdbError::from_kv(op, db, source)
        })
    }

    // ---- Lifecycle ----

    /// Create `db` if it does not exist. Returns `true` if it was created.
    pub fn create_database(&self, db: &ObjectiveId) -> LdbResult<bool> {
        Self::check("create_database", db, self.scalar().ensure_database(db))
    }

    /// Remove `db` and everything in it. Returns `true` if it existed.
    pub fn remove_database(&self, db: &ObjectiveId) -> LdbResult<bool> {
        Self::check("remove_database", db, self.arrays.drop_database(db))
    }

    pub fn database_exists(&self, db: &ObjectiveId) -> LdbResult<bool> {
        Self::check("database_exists", db, self.scalar().database_exists(db))
    }

    /// Bind `db` to the configured display slot.
    ///
    /// Returns the database previously shown there. A missing database or a
    /// rejected binding is logged and yields `None`.
    pub fn show_database(&self, db: &ObjectiveId) -> Option<ObjectiveId> {
        let slot = self.config.display_slot;
        match self.store().has_objective(db) {
            Ok(true) => {}
            Ok(false) => {
                tracing::error!(op = "show_database", db = %db, %slot, "database not found");
                return None;
            }
            Err(e) => {
                tracing::error!(op = "show_database", db = %db, %slot, error = %e, "database operation failed");
                return None;
            }
        }
        match self.store().set_display(slot, db) {
            Ok(previous) => previous,
            Err(e) => {
                tracing::error!(op = "show_database", db = %db, %slot, error = %e, "database operation failed");
                None
            }
        }
    }

    /// Clear the configured display slot, returning the database that was shown.
    pub fn hide_database(&self) -> Option<ObjectiveId> {
        let slot = self.config.display_slot;
        match self.store().clear_display(slot) {
            Ok(cleared) => cleared,
            Err(e) => {
                tracing::error!(op = "hide_database", %slot, error = %e, "database operation failed");
                None
            }
        }
    }

    /// The database currently bound to the configured display slot.
    pub fn shown_database(&self) -> Option<ObjectiveId> {
        let slot = self.config.display_slot;
        match self.store().display(slot) {
            Ok(shown) => shown,
            Err(e) => {
                tracing::error!(op = "shown_database", %slot, error = %e, "database operation failed");
                None
            }
        }
    }

    // ---- Scalar values ----

    pub fn get(&self, db: &ObjectiveId, key: &str) -> LdbResult<Option<Score>> {
        Self::check("get", db, self.scalar().get(db, key))
    }

    /// The `(key, value)` pair stored under `key`.
    pub fn get_entry(&self, db: &ObjectiveId, key: &str) -> LdbResult<Option<(String, Score)>> {
        Self::check("get_entry", db, self.scalar().get_entry(db, key))
    }

    pub fn set(&self, db: &ObjectiveId, key: &str, value: Score) -> LdbResult<()> {
        Self::check("set", db, self.scalar().set(db, key, value))
    }

    /// Add `delta` to `key`, returning the new value.
    pub fn add_to(&self, db: &ObjectiveId, key: &str, delta: Score) -> LdbResult<Score> {
        Self::check("add_to", db, self.scalar().add_to(db, key, delta))
    }

    pub fn remove(&self, db: &ObjectiveId, key: &str) -> LdbResult<bool> {
        Self::check("remove", db, self.scalar().remove(db, key))
    }

    /// Every entry of `db`, array entries included. Order is unspecified.
    pub fn list_all(&self, db: &ObjectiveId) -> LdbResult<Vec<(String, Score)>> {
        Self::check("list_all", db, self.scalar().list_all(db))
    }

    // ---- Array values ----

    pub fn set_array<T: Serialize>(
        &self,
        db: &ObjectiveId,
        key: &str,
        values: &[T],
    ) -> LdbResult<CorrelationId> {
        Self::check("set_array", db, self.arrays.set_array(db, key, values))
    }

    pub fn get_array<T: DeserializeOwned>(
        &self,
        db: &ObjectiveId,
        key: &str,
    ) -> LdbResult<Option<Vec<T>>> {
        Self::check("get_array", db, self.arrays.get_array(db, key))
    }

    pub fn remove_array(&self, db: &ObjectiveId, key: &str) -> LdbResult<bool> {
        Self::check("remove_array", db, self.arrays.remove_array(db, key))
    }

    /// Report orphaned array entries and shared identifiers in `db`.
    pub fn check_integrity(&self, db: &ObjectiveId) -> LdbResult<IntegrityReport> {
        Self::check("check_integrity", db, self.arrays.check_integrity(db))
    }
}

impl<S> std::fmt::Debug for Ldb<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ldb")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ldb_store::{StoreError, StoreResult};
    use ldb_types::DisplaySlot;

    fn ldb() -> Ldb<InMemoryObjectiveStore> {
        Ldb::in_memory(LdbConfig::default()).unwrap()
    }

    fn db(name: &str) -> ObjectiveId {
        ObjectiveId::new(name).unwrap()
    }

    #[test]
    fn create_is_idempotent() {
        let l = ldb();
        assert!(l.create_database(&db("a")).unwrap());
        assert!(!l.create_database(&db("a")).unwrap());
        assert!(l.database_exists(&db("a")).unwrap());
    }

    #[test]
    fn remove_database_is_idempotent() {
        let l = ldb();
        l.set(&db("a"), "k", 1).unwrap();
        assert!(l.remove_database(&db("a")).unwrap());
        assert!(!l.remove_database(&db("a")).unwrap());
        assert_eq!(l.get(&db("a"), "k").unwrap(), None);
    }

    #[test]
    fn remove_database_drops_array_index() {
        let l = ldb();
        l.set_array(&db("a"), "colors", &["Red"]).unwrap();
        l.remove_database(&db("a")).unwrap();
        assert_eq!(l.get_array::<String>(&db("a"), "colors").unwrap(), None);
        l.set_array(&db("a"), "colors", &["Blue"]).unwrap();
        assert_eq!(
            l.get_array::<String>(&db("a"), "colors").unwrap(),
            Some(vec!["Blue".to_string()])
        );
    }

    #[test]
    fn show_returns_previous_and_hide_returns_cleared() {
        let l = ldb();
        l.create_database(&db("a")).unwrap();
        l.create_database(&db("b")).unwrap();
        assert_eq!(l.show_database(&db("a")), None);
        assert_eq!(l.show_database(&db("b")), Some(db("a")));
        assert_eq!(l.shown_database(), Some(db("b")));
        assert_eq!(l.hide_database(), Some(db("b")));
        assert_eq!(l.hide_database(), None);
    }

    #[test]
    fn show_missing_database_is_none_and_leaves_slot() {
        let l = ldb();
        l.create_database(&db("a")).unwrap();
        l.show_database(&db("a"));
        assert_eq!(l.show_database(&db("ghost")), None);
        assert_eq!(l.shown_database(), Some(db("a")));
    }

    #[test]
    fn configured_display_slot_is_used() {
        let config = LdbConfig {
            display_slot: DisplaySlot::List,
            ..LdbConfig::default()
        };
        let l = Ldb::in_memory(config).unwrap();
        l.create_database(&db("a")).unwrap();
        l.show_database(&db("a"));
        assert_eq!(l.store().display(DisplaySlot::List).unwrap(), Some(db("a")));
        assert_eq!(l.store().display(DisplaySlot::Sidebar).unwrap(), None);
    }

    #[test]
    fn add_to_overflow_is_host_error() {
        let l = ldb();
        l.set(&db("a"), "k", i32::MAX).unwrap();
        let err = l.add_to(&db("a"), "k", 1).unwrap_err();
        assert!(matches!(err, LdbError::Host { op: "add_to", .. }));
    }

    #[test]
    fn decoding_error_is_encoding_variant() {
        let l = ldb();
        l.set_array(&db("a"), "colors", &["Red"]).unwrap();
        let err = l.get_array::<i32>(&db("a"), "colors").unwrap_err();
        assert!(matches!(err, LdbError::Encoding { op: "get_array", .. }));
    }

    #[test]
    fn invalid_config_rejected() {
        let mut config = LdbConfig::default();
        config.ids.min = 5;
        config.ids.max = 1;
        assert!(matches!(Ldb::in_memory(config), Err(LdbError::Config(_))));
    }

    #[test]
    fn get_entry_and_list_all() {
        let l = ldb();
        l.add_to(&db("a"), "testKey00", 1).unwrap();
        assert_eq!(
            l.get_entry(&db("a"), "testKey00").unwrap(),
            Some(("testKey00".to_string(), 1))
        );
        assert_eq!(l.list_all(&db("a")).unwrap(), vec![("testKey00".to_string(), 1)]);
    }

    #[test]
    fn debug_format() {
        let debug = format!("{:?}", ldb());
        assert!(debug.contains("Ldb"));
        assert!(debug.contains("config"));
    }

    /// In-memory host whose `set_score` fails once `sets` writes are spent.
    struct FailingWrites {
        inner: InMemoryObjectiveStore,
        sets: AtomicUsize,
    }

    impl ObjectiveStore for FailingWrites {
        fn create_objective(&self, id: &ObjectiveId, display_name: &str) -> StoreResult<()> {
            self.inner.create_objective(id, display_name)
        }
        fn remove_objective(&self, id: &ObjectiveId) -> StoreResult<bool> {
            self.inner.remove_objective(id)
        }
        fn has_objective(&self, id: &ObjectiveId) -> StoreResult<bool> {
            self.inner.has_objective(id)
        }
        fn set_display(&self, slot: DisplaySlot, id: &ObjectiveId) -> StoreResult<Option<ObjectiveId>> {
            self.inner.set_display(slot, id)
        }
        fn clear_display(&self, slot: DisplaySlot) -> StoreResult<Option<ObjectiveId>> {
            self.inner.clear_display(slot)
        }
        fn display(&self, slot: DisplaySlot) -> StoreResult<Option<ObjectiveId>> {
            self.inner.display(slot)
        }
        fn get_score(&self, id: &ObjectiveId, entry: &str) -> StoreResult<Option<Score>> {
            self.inner.get_score(id, entry)
        }
        fn set_score(&self, id: &ObjectiveId, entry: &str, score: Score) -> StoreResult<()> {
            self.sets
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
                .map_err(|_| StoreError::Unavailable("host went away".into()))?;
            self.inner.set_score(id, entry, score)
        }
        fn add_score(&self, id: &ObjectiveId, entry: &str, delta: Score) -> StoreResult<Score> {
            self.inner.add_score(id, entry, delta)
        }
        fn remove_entry(&self, id: &ObjectiveId, entry: &str) -> StoreResult<bool> {
            self.inner.remove_entry(id, entry)
        }
        fn list_entries(&self) -> StoreResult<Vec<String>> {
            self.inner.list_entries()
        }
    }

    #[test]
    fn interrupted_set_array_is_inconsistent() {
        let store = Arc::new(FailingWrites {
            inner: InMemoryObjectiveStore::new(),
            sets: AtomicUsize::new(1),
        });
        let l = Ldb::new(store, LdbConfig::default()).unwrap();

        let err = l.set_array(&db("a"), "colors", &["Red"]).unwrap_err();
        assert!(matches!(
            err,
            LdbError::Inconsistent {
                op: "set_array",
                source: KvError::PartialWrite { .. },
                ..
            }
        ));
        assert_eq!(l.check_integrity(&db("a")).unwrap().orphaned_keys, vec!["colors".to_string()]);
        assert_eq!(l.get_array::<String>(&db("a"), "colors").unwrap(), None);
    }
}
