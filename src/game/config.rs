//! Game configuration

use super::accusation::DEFAULT_THRESHOLD;
use super::ledger::DEFAULT_BUCKETS;
use crate::{GameError, Result};
use serde::{Deserialize, Serialize};

/// Knobs for a session. The defaults reproduce the reference game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Buckets in the suspect ledger
    pub bucket_count: usize,
    /// Clues against one suspect needed to offer an accusation
    pub evidence_threshold: usize,
    /// Optional node limit for the clue index
    pub clue_capacity: Option<usize>,
    /// Optional association limit for the suspect ledger
    pub ledger_capacity: Option<usize>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            bucket_count: DEFAULT_BUCKETS,
            evidence_threshold: DEFAULT_THRESHOLD,
            clue_capacity: None,
            ledger_capacity: None,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        if self.bucket_count == 0 {
            return Err(GameError::InvalidConfig(
                "bucket_count must be at least 1".to_string(),
            ));
        }
        if self.evidence_threshold == 0 {
            return Err(GameError::InvalidConfig(
                "evidence_threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
