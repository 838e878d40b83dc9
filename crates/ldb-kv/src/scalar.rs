//! Scalar key-value layer: one key maps to one entry.

use std::sync::Arc;

use ldb_store::{ObjectiveStore, StoreError};
use ldb_types::{ObjectiveId, Score};

use crate::error::KvResult;

/// CRUD over single `key -> score` pairs within a database.
///
/// Each key is exactly one entry in the database's objective. Reads of a
/// missing database or key are `Ok(None)`; a stored `0` is `Some(0)`.
pub struct ScalarStore<S> {
    store: Arc<S>,
}

impl<S> Clone for ScalarStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ObjectiveStore> ScalarStore<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The host store this layer writes through.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn database_exists(&self, db: &ObjectiveId) -> KvResult<bool> {
        Ok(self.store.has_objective(db)?)
    }

    /// Create the database's objective if missing. Returns `true` if created.
    pub fn ensure_database(&self, db: &ObjectiveId) -> KvResult<bool> {
        if self.store.has_objective(db)? {
            return Ok(false);
        }
        match self.store.create_objective(db, db.as_str()) {
            Ok(()) => {
                tracing::debug!(db = %db, "database created");
                Ok(true)
            }
            Err(StoreError::ObjectiveExists(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the database's objective if present. Returns `true` if removed.
    pub fn drop_database(&self, db: &ObjectiveId) -> KvResult<bool> {
        if !self.store.has_objective(db)? {
            return Ok(false);
        }
        Ok(self.store.remove_objective(db)?)
    }

    pub fn get(&self, db: &ObjectiveId, key: &str) -> KvResult<Option<Score>> {
        if !self.store.has_objective(db)? {
            return Ok(None);
        }
        Ok(self.store.get_score(db, key)?)
    }

    /// The `(key, value)` pair for `key`, if present.
    pub fn get_entry(&self, db: &ObjectiveId, key: &str) -> KvResult<Option<(String, Score)>> {
        Ok(self.get(db, key)?.map(|value| (key.to_string(), value)))
    }

    /// Assign `value` to `key`, creating the database if missing.
    pub fn set(&self, db: &ObjectiveId, key: &str, value: Score) -> KvResult<()> {
        self.ensure_database(db)?;
        self.store.set_score(db, key, value)?;
        Ok(())
    }

    /// Add `delta` to `key` (starting from zero if absent), creating the
    /// database if missing. Returns the new value.
    pub fn add_to(&self, db: &ObjectiveId, key: &str, delta: Score) -> KvResult<Score> {
        self.ensure_database(db)?;
        Ok(self.store.add_score(db, key, delta)?)
    }

    /// Remove `key`. Returns `true` if it existed.
    pub fn remove(&self, db: &ObjectiveId, key: &str) -> KvResult<bool> {
        if !self.store.has_objective(db)? {
            return Ok(false);
        }
        Ok(self.store.remove_entry(db, key)?)
    }

    /// Every `(key, value)` pair in the database, in host listing order.
    pub fn list_all(&self, db: &ObjectiveId) -> KvResult<Vec<(String, Score)>> {
        if !self.store.has_objective(db)? {
            return Ok(Vec::new());
        }
        Ok(self.store.scores(db)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldb_store::InMemoryObjectiveStore;
    use proptest::prelude::*;

    fn setup() -> (ScalarStore<InMemoryObjectiveStore>, ObjectiveId) {
        let store = Arc::new(InMemoryObjectiveStore::new());
        (ScalarStore::new(store), ObjectiveId::new("testDataBase").unwrap())
    }

    #[test]
    fn get_on_missing_database_is_absent() {
        let (kv, db) = setup();
        assert_eq!(kv.get(&db, "k").unwrap(), None);
        assert!(!kv.database_exists(&db).unwrap());
    }

    #[test]
    fn set_creates_database() {
        let (kv, db) = setup();
        kv.set(&db, "k", 3).unwrap();
        assert!(kv.database_exists(&db).unwrap());
        assert_eq!(kv.get(&db, "k").unwrap(), Some(3));
    }

    #[test]
    fn zero_is_a_value_not_absence() {
        let (kv, db) = setup();
        kv.set(&db, "zero", 0).unwrap();
        assert_eq!(kv.get(&db, "zero").unwrap(), Some(0));
        assert_eq!(kv.get(&db, "missing").unwrap(), None);
    }

    #[test]
    fn set_overwrites() {
        let (kv, db) = setup();
        kv.set(&db, "k", 1).unwrap();
        kv.set(&db, "k", 2).unwrap();
        assert_eq!(kv.get(&db, "k").unwrap(), Some(2));
        assert_eq!(kv.list_all(&db).unwrap().len(), 1);
    }

    #[test]
    fn add_to_starts_at_delta() {
        let (kv, db) = setup();
        assert_eq!(kv.add_to(&db, "testKey00", 1).unwrap(), 1);
        assert_eq!(kv.add_to(&db, "testKey00", 4).unwrap(), 5);
        assert_eq!(kv.get(&db, "testKey00").unwrap(), Some(5));
    }

    #[test]
    fn remove_is_idempotent() {
        let (kv, db) = setup();
        kv.set(&db, "k", 9).unwrap();
        assert!(kv.remove(&db, "k").unwrap());
        assert!(!kv.remove(&db, "k").unwrap());
        assert_eq!(kv.get(&db, "k").unwrap(), None);
    }

    #[test]
    fn remove_on_missing_database_is_noop() {
        let (kv, db) = setup();
        assert!(!kv.remove(&db, "k").unwrap());
        assert!(!kv.database_exists(&db).unwrap());
    }

    #[test]
    fn list_all_scoped_to_database() {
        let (kv, db) = setup();
        let other = ObjectiveId::new("other").unwrap();
        kv.set(&db, "a", 1).unwrap();
        kv.set(&other, "b", 2).unwrap();
        kv.set(&other, "a", 3).unwrap();

        let mut in_db = kv.list_all(&db).unwrap();
        in_db.sort();
        assert_eq!(in_db, vec![("a".to_string(), 1)]);

        let mut in_other = kv.list_all(&other).unwrap();
        in_other.sort();
        assert_eq!(in_other, vec![("a".to_string(), 3), ("b".to_string(), 2)]);
    }

    #[test]
    fn list_all_missing_database_is_empty() {
        let (kv, db) = setup();
        assert!(kv.list_all(&db).unwrap().is_empty());
    }

    #[test]
    fn get_entry_pairs_key_and_value() {
        let (kv, db) = setup();
        kv.set(&db, "testKey00", 1).unwrap();
        assert_eq!(
            kv.get_entry(&db, "testKey00").unwrap(),
            Some(("testKey00".to_string(), 1))
        );
        assert_eq!(kv.get_entry(&db, "nope").unwrap(), None);
    }

    #[test]
    fn ensure_and_drop_database() {
        let (kv, db) = setup();
        assert!(kv.ensure_database(&db).unwrap());
        assert!(!kv.ensure_database(&db).unwrap());
        assert!(kv.drop_database(&db).unwrap());
        assert!(!kv.drop_database(&db).unwrap());
    }

    #[test]
    fn boundary_values() {
        let (kv, db) = setup();
        for (key, v) in [("max", 2_147_483_647), ("min", -2_147_483_647), ("zero", 0)] {
            kv.set(&db, key, v).unwrap();
            assert_eq!(kv.get(&db, key).unwrap(), Some(v));
        }
    }

    proptest! {
        #[test]
        fn set_then_get(key in "[a-zA-Z0-9_]{1,16}", v in any::<i32>()) {
            let (kv, db) = setup();
            kv.set(&db, &key, v).unwrap();
            prop_assert_eq!(kv.get(&db, &key).unwrap(), Some(v));
        }
    }
}
