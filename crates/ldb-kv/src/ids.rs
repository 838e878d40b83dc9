//! Correlation identifier allocation.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use ldb_types::{CorrelationId, ObjectiveId, Score, SCORE_MAX, SCORE_MIN};

use crate::error::{KvError, KvResult};

/// How new correlation identifiers are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// Uniform random draw over the configured range.
    #[default]
    Random,
    /// Lowest unused value counting up from `min`.
    Sequential,
}

/// Settings for correlation identifier allocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdConfig {
    pub strategy: IdStrategy,
    pub min: Score,
    pub max: Score,
    /// Random draws tried before giving up.
    pub max_attempts: u32,
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            strategy: IdStrategy::Random,
            min: SCORE_MIN,
            max: SCORE_MAX,
            max_attempts: 64,
        }
    }
}

impl IdConfig {
    pub fn validate(&self) -> KvResult<()> {
        if self.min > self.max {
            return Err(KvError::InvalidIdConfig(format!(
                "min {} is greater than max {}",
                self.min, self.max
            )));
        }
        if self.max_attempts == 0 {
            return Err(KvError::InvalidIdConfig(
                "max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Hands out correlation identifiers that no entry in the target database
/// currently holds as its score.
///
/// The caller supplies the set of scores in use; an identifier equal to any
/// of them would make an unrelated entry look like an array payload.
#[derive(Clone, Debug, Default)]
pub struct IdAllocator {
    config: IdConfig,
}

impl IdAllocator {
    pub fn new(config: IdConfig) -> KvResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &IdConfig {
        &self.config
    }

    pub fn allocate(&self, db: &ObjectiveId, in_use: &HashSet<Score>) -> KvResult<CorrelationId> {
        match self.config.strategy {
            IdStrategy::Random => self.random(db, in_use),
            IdStrategy::Sequential => self.sequential(db, in_use),
        }
    }

    fn random(&self, db: &ObjectiveId, in_use: &HashSet<Score>) -> KvResult<CorrelationId> {
        let mut rng = rand::thread_rng();
        for _ in 0..self.config.max_attempts {
            let candidate = rng.gen_range(self.config.min..=self.config.max);
            if !in_use.contains(&candidate) {
                return Ok(CorrelationId::from_score(candidate));
            }
            tracing::warn!(db = %db, candidate, "correlation id already in use, redrawing");
        }
        Err(KvError::IdSpaceExhausted {
            db: db.clone(),
            attempts: self.config.max_attempts,
        })
    }

    fn sequential(&self, db: &ObjectiveId, in_use: &HashSet<Score>) -> KvResult<CorrelationId> {
        // At most `in_use.len() + 1` candidates are inspected.
        (self.config.min..=self.config.max)
            .find(|candidate| !in_use.contains(candidate))
            .map(CorrelationId::from_score)
            .ok_or_else(|| KvError::IdSpaceExhausted {
                db: db.clone(),
                attempts: u32::try_from(in_use.len()).unwrap_or(u32::MAX),
            })
    }
}
