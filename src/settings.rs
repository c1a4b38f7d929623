//! Gameplay tuning
//!
//! Every knob has a default; a JSON document may override any subset.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::grid::ArenaKind;
use crate::sim::roster::Difficulty;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be positive")]
    NonPositive { field: &'static str },
}

/// Simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Arena for the first round
    #[serde(deserialize_with = "ArenaKind::deserialize_lenient")]
    pub starting_arena: ArenaKind,
    /// Floor for the round-derived difficulty
    pub base_difficulty: Difficulty,
    /// Enemies drawn per round
    pub enemies_per_round: u32,

    /// Life lost on hitting a wall or jetwall
    pub collision_damage: f32,
    /// Life lost when an enemy disc connects
    pub disc_damage: f32,
    /// Life lost on touching an enemy
    pub contact_damage: f32,
    /// Ticks between collision damage events
    pub damage_cooldown_ticks: u32,

    /// Ticks between player throws
    pub throw_cooldown_ticks: u32,
    /// Cells a disc travels before resting
    pub disc_range: u32,
    /// Ticks for a disc to cross one tile
    pub disc_ticks_per_tile: u32,

    /// XP bonus per round number on clearing a round
    pub round_bonus_per_round: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_arena: ArenaKind::ClassicGrid,
            base_difficulty: Difficulty::Easy,
            enemies_per_round: 7,

            collision_damage: 0.5,
            disc_damage: 1.0,
            contact_damage: 0.5,
            damage_cooldown_ticks: 30,

            throw_cooldown_ticks: 300,
            disc_range: 3,
            disc_ticks_per_tile: 8,

            round_bonus_per_round: 100,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON override document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Like `from_json`, but falls back to defaults with a warning
    pub fn from_json_or_default(json: &str) -> Self {
        Self::from_json(json).unwrap_or_else(|e| {
            log::warn!("Using default config: {}", e);
            Self::default()
        })
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.disc_ticks_per_tile == 0 {
            return Err(ConfigError::NonPositive {
                field: "disc_ticks_per_tile",
            });
        }
        if self.disc_range == 0 {
            return Err(ConfigError::NonPositive { field: "disc_range" });
        }
        Ok(())
    }
}
