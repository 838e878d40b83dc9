//! Consistency report for one database.

use std::collections::HashMap;

use ldb_types::{CorrelationId, Score};

use crate::index::ArrayIndex;

/// A score held by more than the two entries of one array record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharedId {
    pub id: CorrelationId,
    pub entries: Vec<String>,
}

/// Findings of [`ArrayStore::check_integrity`](crate::ArrayStore::check_integrity).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    /// Indexed array keys with no payload entry sharing their identifier.
    pub orphaned_keys: Vec<String>,
    /// Payload-shaped entries (JSON arrays) that share their score with
    /// no other entry.
    pub orphaned_payloads: Vec<String>,
    /// Scores held by three or more entries.
    pub shared_ids: Vec<SharedId>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.orphaned_keys.is_empty()
            && self.orphaned_payloads.is_empty()
            && self.shared_ids.is_empty()
    }

    pub(crate) fn build(entries: &[(String, Score)], index: Option<&ArrayIndex>) -> Self {
        let mut groups: HashMap<Score, Vec<&str>> = HashMap::new();
        for (name, score) in entries {
            groups.entry(*score).or_default().push(name);
        }

        let mut report = Self::default();
        if let Some(index) = index {
            for (key, _) in index.records() {
                let unpaired = entries
                    .iter()
                    .find(|(name, _)| name == key)
                    .is_some_and(|(_, score)| {
                        !groups.get(score).is_some_and(|names| {
                            names.iter().any(|n| *n != key && looks_like_payload(n))
                        })
                    });
                if unpaired {
                    report.orphaned_keys.push(key.to_string());
                }
            }
        }

        for (score, names) in &groups {
            match names.len() {
                1 if looks_like_payload(names[0]) => {
                    let indexed_key = index.is_some_and(|ix| ix.get(names[0]).is_some());
                    if !indexed_key {
                        report.orphaned_payloads.push(names[0].to_string());
                    }
                }
                n if n > 2 => {
                    let mut members: Vec<String> = names.iter().map(|name| name.to_string()).collect();
                    members.sort();
                    report.shared_ids.push(SharedId {
                        id: CorrelationId::from_score(*score),
                        entries: members,
                    });
                }
                _ => {}
            }
        }

        report.orphaned_keys.sort();
        report.orphaned_payloads.sort();
        report.shared_ids.sort_by_key(|s| s.id);
        report
    }
}

/// Whether an entry name is a JSON array, the shape of every payload.
pub(crate) fn looks_like_payload(name: &str) -> bool {
    name.starts_with('[') && serde_json::from_str::<Vec<serde_json::Value>>(name).is_ok()
}
