//! Player progress snapshots
//!
//! The simulation never touches the filesystem. A save collaborator asks the
//! game for a `Progress`, stores the JSON wherever it likes, and hands it
//! back on load.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::actor::PlayerCharacter;
use crate::sim::grid::ArenaKind;
use crate::sim::roster::Difficulty;

/// Current save format version
pub const PROGRESS_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("corrupt progress data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported progress version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
}

/// Everything needed to resume a run at the start of a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub version: u32,
    pub name: String,
    pub character: PlayerCharacter,
    pub xp: u32,
    pub level: u32,
    pub lives: f32,
    pub discs_owned: u32,
    #[serde(default = "default_disc_slots")]
    pub disc_slots: u32,
    #[serde(deserialize_with = "ArenaKind::deserialize_lenient")]
    pub arena: ArenaKind,
    pub difficulty: Difficulty,
    pub round: u32,
    pub score: u64,
}

fn default_disc_slots() -> u32 {
    3
}

impl Progress {
    pub fn to_json(&self) -> Result<String, ProgressError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ProgressError> {
        let progress: Self = serde_json::from_str(json)?;
        if progress.version != PROGRESS_VERSION {
            return Err(ProgressError::Version {
                found: progress.version,
                expected: PROGRESS_VERSION,
            });
        }
        Ok(progress)
    }
}
