use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default (level, minimum points) pairs
pub const DEFAULT_THRESHOLDS: [(u32, u64); 12] = [
    (1, 0),
    (2, 100),
    (3, 250),
    (4, 500),
    (5, 1000),
    (6, 2000),
    (7, 3500),
    (8, 5500),
    (9, 8000),
    (10, 11000),
    (11, 15000),
    (12, 20000),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelTableError {
    #[error("level table must start at level 1 with 0 points")]
    BadStart,
    #[error("level table must be strictly ascending (at level {level})")]
    NotAscending { level: u32 },
}

/// Ascending table of level thresholds, always starting at (1, 0)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(u32, u64)>", into = "Vec<(u32, u64)>")]
pub struct LevelTable {
    thresholds: Vec<(u32, u64)>,
}

impl LevelTable {
    pub fn new(thresholds: Vec<(u32, u64)>) -> Result<Self, LevelTableError> {
        if thresholds.first() != Some(&(1, 0)) {
            return Err(LevelTableError::BadStart);
        }
        for pair in thresholds.windows(2) {
            let ((prev_level, prev_min), (level, min)) = (pair[0], pair[1]);
            if level <= prev_level || min <= prev_min {
                return Err(LevelTableError::NotAscending { level });
            }
        }
        Ok(Self { thresholds })
    }

    /// Highest level whose threshold is at or below `points`
    pub fn level_for(&self, points: u64) -> u32 {
        self.thresholds
            .iter()
            .take_while(|(_, min)| *min <= points)
            .last()
            .map_or(1, |(level, _)| *level)
    }

    /// The next level above the one reached with `points`, with its threshold
    pub fn next_after(&self, points: u64) -> Option<(u32, u64)> {
        self.thresholds.iter().copied().find(|(_, min)| *min > points)
    }

    pub fn thresholds(&self) -> &[(u32, u64)] {
        &self.thresholds
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
        }
    }
}

impl TryFrom<Vec<(u32, u64)>> for LevelTable {
    type Error = LevelTableError;

    fn try_from(thresholds: Vec<(u32, u64)>) -> Result<Self, Self::Error> {
        Self::new(thresholds)
    }
}

impl From<LevelTable> for Vec<(u32, u64)> {
    fn from(table: LevelTable) -> Self {
        table.thresholds
    }
}
