//! Per-database secondary index of array records.

use std::collections::HashMap;

use ldb_types::CorrelationId;

/// Where one array record lives in the host store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayRecord {
    pub id: CorrelationId,
    /// Name of the payload entry (the array's JSON text, possibly padded).
    pub payload: String,
}

/// Maps array keys to their records and identifiers back to keys.
///
/// The index is a cache over the host store. Entries may go stale if the
/// store is modified behind LDB's back, so callers validate a hit before
/// trusting it.
#[derive(Debug, Default)]
pub struct ArrayIndex {
    records: HashMap<String, ArrayRecord>,
    owners: HashMap<CorrelationId, String>,
}

impl ArrayIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ArrayRecord> {
        self.records.get(key)
    }

    /// Insert or replace the record for `key`, returning the previous one.
    pub fn insert(&mut self, key: &str, record: ArrayRecord) -> Option<ArrayRecord> {
        let previous = self.remove(key);
        if let Some(stale_owner) = self.owners.insert(record.id, key.to_string()) {
            self.records.remove(&stale_owner);
        }
        self.records.insert(key.to_string(), record);
        previous
    }

    pub fn remove(&mut self, key: &str) -> Option<ArrayRecord> {
        let record = self.records.remove(key)?;
        if self.owners.get(&record.id).is_some_and(|owner| owner == key) {
            self.owners.remove(&record.id);
        }
        Some(record)
    }

    pub fn records(&self) -> impl Iterator<Item = (&str, &ArrayRecord)> {
        self.records.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
