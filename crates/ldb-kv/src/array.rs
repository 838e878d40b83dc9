//! Array encoding layer: one key maps to two correlated entries.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;

use ldb_store::ObjectiveStore;
use ldb_types::{CorrelationId, ObjectiveId, Score};

use crate::error::{KvError, KvResult};
use crate::ids::IdAllocator;
use crate::index::{ArrayIndex, ArrayRecord};
use crate::integrity::{looks_like_payload, IntegrityReport};
use crate::scalar::ScalarStore;

type Indexes = HashMap<ObjectiveId, ArrayIndex>;

/// Stores arrays as a key entry plus a payload entry sharing one
/// [`CorrelationId`].
///
/// Every operation holds the index lock from its first read to its last
/// write, so array operations on one `ArrayStore` never interleave.
pub struct ArrayStore<S> {
    scalar: ScalarStore<S>,
    ids: IdAllocator,
    indexes: Mutex<Indexes>,
}

impl<S: ObjectiveStore> ArrayStore<S> {
    pub fn new(scalar: ScalarStore<S>, ids: IdAllocator) -> Self {
        Self {
            scalar,
            ids,
            indexes: Mutex::new(HashMap::new()),
        }
    }

    pub fn scalar(&self) -> &ScalarStore<S> {
        &self.scalar
    }

    fn lock(&self) -> KvResult<MutexGuard<'_, Indexes>> {
        self.indexes
            .lock()
            .map_err(|e| KvError::Poisoned(e.to_string()))
    }

    /// Store `values` under `key`, replacing any previous array there.
    ///
    /// The array is serialized before anything is written, so an encoding
    /// failure leaves the database untouched. A fresh identifier is drawn
    /// for every write.
    pub fn set_array<T: Serialize>(
        &self,
        db: &ObjectiveId,
        key: &str,
        values: &[T],
    ) -> KvResult<CorrelationId> {
        let json = serde_json::to_string(values).map_err(|source| KvError::Encoding {
            key: key.to_string(),
            source,
        })?;

        let mut indexes = self.lock()?;
        self.scalar.ensure_database(db)?;
        let index = indexes.entry(db.clone()).or_default();

        if let Some(previous) = self.scalar.get(db, key)? {
            let previous = CorrelationId::from_score(previous);
            let targets = self.entries_of(db, key, previous, index)?;
            self.remove_entries(db, key, previous, &targets)?;
        }
        index.remove(key);

        let entries = self.scalar.list_all(db)?;
        let in_use: HashSet<Score> = entries.iter().map(|(_, score)| *score).collect();
        let mut taken: HashSet<&str> = entries.iter().map(|(name, _)| name.as_str()).collect();
        taken.insert(key);
        let payload = payload_name(json, &taken);
        let id = self.ids.allocate(db, &in_use)?;

        self.scalar.set(db, key, id.score())?;
        index.insert(
            key,
            ArrayRecord {
                id,
                payload: payload.clone(),
            },
        );
        if let Err(e) = self.scalar.set(db, &payload, id.score()) {
            // The key stays indexed so the orphan shows up in integrity reports.
            tracing::error!(db = %db, key, %id, error = %e, "array payload write failed");
            return Err(KvError::PartialWrite {
                db: db.clone(),
                key: key.to_string(),
                id,
                source: Box::new(e),
            });
        }

        tracing::debug!(db = %db, key, %id, payload = %payload, "array written");
        Ok(id)
    }

    /// Read the array stored under `key`.
    ///
    /// Returns `Ok(None)` if the key is absent or its payload entry is
    /// missing. A payload that does not decode into `T` is an error.
    pub fn get_array<T: DeserializeOwned>(
        &self,
        db: &ObjectiveId,
        key: &str,
    ) -> KvResult<Option<Vec<T>>> {
        let mut indexes = self.lock()?;
        let Some(score) = self.scalar.get(db, key)? else {
            if let Some(index) = indexes.get_mut(db) {
                index.remove(key);
            }
            return Ok(None);
        };

        let id = CorrelationId::from_score(score);
        let index = indexes.entry(db.clone()).or_default();
        let Some(payload) = self.resolve_payload(db, key, id, index)? else {
            tracing::warn!(db = %db, key, %id, "array key has no payload entry");
            return Ok(None);
        };

        match serde_json::from_str(&payload) {
            Ok(values) => Ok(Some(values)),
            Err(source) => Err(KvError::Decoding {
                key: key.to_string(),
                payload,
                source,
            }),
        }
    }

    /// Delete the array under `key` and its payload entry.
    ///
    /// Returns `true` if the key existed.
    pub fn remove_array(&self, db: &ObjectiveId, key: &str) -> KvResult<bool> {
        let mut indexes = self.lock()?;
        let Some(score) = self.scalar.get(db, key)? else {
            if let Some(index) = indexes.get_mut(db) {
                index.remove(key);
            }
            return Ok(false);
        };

        let id = CorrelationId::from_score(score);
        let index = indexes.entry(db.clone()).or_default();
        let targets = self.entries_of(db, key, id, index)?;
        index.remove(key);
        self.remove_entries(db, key, id, &targets)?;
        tracing::debug!(db = %db, key, %id, removed = targets.len(), "array removed");
        Ok(true)
    }

    /// Report orphaned and colliding entries in `db`.
    pub fn check_integrity(&self, db: &ObjectiveId) -> KvResult<IntegrityReport> {
        let indexes = self.lock()?;
        let entries = self.scalar.list_all(db)?;
        Ok(IntegrityReport::build(&entries, indexes.get(db)))
    }

    /// Remove `db` from the host and drop its cached index.
    ///
    /// Both happen under the index lock, so no array write can re-index
    /// `db` in between. Returns `true` if the database existed.
    pub fn drop_database(&self, db: &ObjectiveId) -> KvResult<bool> {
        let mut indexes = self.lock()?;
        let removed = self.scalar.drop_database(db)?;
        indexes.remove(db);
        Ok(removed)
    }

    /// Number of array records currently indexed for `db`.
    pub fn indexed_len(&self, db: &ObjectiveId) -> KvResult<usize> {
        Ok(self.lock()?.get(db).map_or(0, ArrayIndex::len))
    }

    /// Entries carrying `id` that belong to `key`'s record, key first.
    ///
    /// A validated index hit yields exactly the key and its payload.
    /// Otherwise the key and every payload-shaped entry holding `id` are
    /// returned; scalars that happen to hold `id` are left alone.
    fn entries_of(
        &self,
        db: &ObjectiveId,
        key: &str,
        id: CorrelationId,
        index: &ArrayIndex,
    ) -> KvResult<Vec<String>> {
        if let Some(record) = index.get(key).filter(|r| r.id == id) {
            if self.scalar.get(db, &record.payload)? == Some(id.score()) {
                return Ok(vec![key.to_string(), record.payload.clone()]);
            }
        }

        let mut targets: Vec<String> = self
            .scalar
            .list_all(db)?
            .into_iter()
            .filter(|(name, score)| {
                *score == id.score() && (name == key || looks_like_payload(name))
            })
            .map(|(name, _)| name)
            .collect();
        if let Some(pos) = targets.iter().position(|name| name == key) {
            let own = targets.remove(pos);
            targets.insert(0, own);
        }
        Ok(targets)
    }

    /// Name of the payload entry for `key`, refreshing the index.
    ///
    /// On a scan, the first payload-shaped entry holding `id` in host
    /// listing order wins.
    fn resolve_payload(
        &self,
        db: &ObjectiveId,
        key: &str,
        id: CorrelationId,
        index: &mut ArrayIndex,
    ) -> KvResult<Option<String>> {
        if let Some(record) = index.get(key).filter(|r| r.id == id) {
            if self.scalar.get(db, &record.payload)? == Some(id.score()) {
                return Ok(Some(record.payload.clone()));
            }
        }

        let found = self
            .scalar
            .list_all(db)?
            .into_iter()
            .find(|(name, score)| *score == id.score() && name != key && looks_like_payload(name))
            .map(|(name, _)| name);
        match &found {
            Some(payload) => {
                index.insert(
                    key,
                    ArrayRecord {
                        id,
                        payload: payload.clone(),
                    },
                );
            }
            None => {
                index.remove(key);
            }
        }
        Ok(found)
    }

    fn remove_entries(
        &self,
        db: &ObjectiveId,
        key: &str,
        id: CorrelationId,
        targets: &[String],
    ) -> KvResult<()> {
        for (i, name) in targets.iter().enumerate() {
            if let Err(e) = self.scalar.remove(db, name) {
                tracing::error!(db = %db, key, %id, entry = %name, error = %e, "array removal interrupted");
                return Err(KvError::PartialRemoval {
                    db: db.clone(),
                    key: key.to_string(),
                    id,
                    remaining: targets[i..].to_vec(),
                    source: Box::new(e),
                });
            }
        }
        Ok(())
    }
}

/// Pad `json` with trailing spaces until it names no existing entry.
///
/// JSON ignores trailing whitespace, so the padded name still decodes to
/// the same array.
fn payload_name(json: String, taken: &HashSet<&str>) -> String {
    let mut name = json;
    while taken.contains(name.as_str()) {
        name.push(' ');
    }
    name
}
