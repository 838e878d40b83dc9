use std::fmt;

use serde::{Deserialize, Serialize};

/// The host store's integer slot type.
pub type Score = i32;

/// Smallest score LDB hands out as a correlation identifier.
///
/// `i32::MIN` is left unused so the range is symmetric around zero.
pub const SCORE_MIN: Score = -2_147_483_647;

/// Largest score LDB hands out as a correlation identifier.
pub const SCORE_MAX: Score = i32::MAX;

/// Integer shared by the two entries of one array record.
///
/// The key entry and the payload entry both hold this value as their score;
/// equality of scores is the only link the host store can express.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CorrelationId(Score);

impl CorrelationId {
    pub const fn from_score(score: Score) -> Self {
        Self(score)
    }

    pub const fn score(self) -> Score {
        self.0
    }
}

impl fmt::Debug for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CorrelationId({})", self.0)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<CorrelationId> for Score {
    fn from(id: CorrelationId) -> Self {
        id.0
    }
}
