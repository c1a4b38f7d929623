//! Enemy archetype and player character records
//!
//! Both use a simple comma-separated line format. Blank lines and lines
//! starting with `#` are ignored; a bad row is logged and skipped so one
//! typo never costs the whole table.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::actor::{Archetype, Player, PlayerCharacter};

/// Built-in archetype table: name,color,xp,speed,handling,aggression
pub const DEFAULT_ENEMY_TEMPLATES: &str = "\
# name, color, xp, speed (tiles/s), handling, aggression
Koura,Green,10,3.0,0.8,0.6
Sark,Yellow,25,3.5,1.0,1.0
Rinzler,Red,50,4.0,1.3,1.3
Clu,Gold,100,4.5,1.5,1.6
";

const ENEMY_FIELDS: usize = 6;
const CHARACTER_FIELDS: usize = 10;

/// Why a template row was rejected
#[derive(Debug, Error, PartialEq)]
pub enum TemplateError {
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount { line: usize, expected: usize, found: usize },
    #[error("line {line}: unknown name '{name}'")]
    UnknownName { line: usize, name: String },
    #[error("line {line}: bad value '{value}' for {field}")]
    BadValue { line: usize, field: &'static str, value: String },
    #[error("line {line}: {field} must be a finite, non-negative number (got {value})")]
    OutOfRange { line: usize, field: &'static str, value: f32 },
}

/// Stats for one enemy archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub archetype: Archetype,
    pub color: String,
    pub xp_reward: u32,
    pub speed: f32,
    pub handling: f32,
    pub aggression: f32,
}

/// Starting stats for a playable character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterTemplate {
    pub character: PlayerCharacter,
    pub name: String,
    pub color: String,
    pub xp: u32,
    pub level: u32,
    pub speed: f32,
    pub stability: f32,
    pub handling: f32,
    pub disc_slots: u32,
    pub discs_owned: u32,
    pub lives: f32,
}

impl CharacterTemplate {
    /// Fresh player with these stats
    pub fn to_player(&self) -> Player {
        let mut player = Player::new(self.character);
        player.name = self.name.clone();
        player.color = self.color.clone();
        player.xp = self.xp;
        player.level = self.level.max(1);
        player.speed = self.speed;
        player.stability = self.stability;
        player.handling = self.handling;
        player.disc_slots = self.disc_slots;
        player.discs_owned = self.discs_owned.min(self.disc_slots);
        player.lives = self.lives;
        player
    }
}

fn field<T: std::str::FromStr>(parts: &[&str], idx: usize, line: usize, name: &'static str) -> Result<T, TemplateError> {
    let raw = parts.get(idx).map(|s| s.trim()).unwrap_or_default();
    raw.parse().map_err(|_| TemplateError::BadValue {
        line,
        field: name,
        value: raw.to_string(),
    })
}

/// A numeric stat: finite and non-negative
fn stat(parts: &[&str], idx: usize, line: usize, name: &'static str) -> Result<f32, TemplateError> {
    let value: f32 = field(parts, idx, line, name)?;
    if !value.is_finite() || value < 0.0 {
        return Err(TemplateError::OutOfRange {
            line,
            field: name,
            value,
        });
    }
    Ok(value)
}

/// Split a data line, or `None` for blanks and comments
fn split_row(raw: &str, line: usize, expected: usize) -> Option<Result<Vec<&str>, TemplateError>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let parts: Vec<&str> = trimmed.split(',').collect();
    if parts.len() != expected {
        return Some(Err(TemplateError::FieldCount {
            line,
            expected,
            found: parts.len(),
        }));
    }
    Some(Ok(parts))
}

/// Parse one archetype row (1-based `line` for messages)
pub fn parse_enemy_line(raw: &str, line: usize) -> Option<Result<EnemyTemplate, TemplateError>> {
    let parts = match split_row(raw, line, ENEMY_FIELDS)? {
        Ok(parts) => parts,
        Err(e) => return Some(Err(e)),
    };
    let parse = || -> Result<EnemyTemplate, TemplateError> {
        let name = parts[0].trim();
        let archetype = Archetype::from_name(name).ok_or_else(|| TemplateError::UnknownName {
            line,
            name: name.to_string(),
        })?;
        Ok(EnemyTemplate {
            archetype,
            color: parts[1].trim().to_string(),
            xp_reward: field(&parts, 2, line, "xp")?,
            speed: stat(&parts, 3, line, "speed")?,
            handling: stat(&parts, 4, line, "handling")?,
            aggression: stat(&parts, 5, line, "aggression")?,
        })
    };
    Some(parse())
}

/// Parse a whole archetype table, skipping bad rows with a warning
pub fn parse_enemy_templates(text: &str) -> Vec<EnemyTemplate> {
    let mut templates = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        match parse_enemy_line(raw, idx + 1) {
            Some(Ok(template)) => templates.push(template),
            Some(Err(e)) => log::warn!("Skipping enemy template: {}", e),
            None => {}
        }
    }
    log::debug!("Loaded {} enemy templates", templates.len());
    templates
}

/// The built-in archetype table
pub fn default_enemy_templates() -> Vec<EnemyTemplate> {
    parse_enemy_templates(DEFAULT_ENEMY_TEMPLATES)
}

/// Parse one character row:
/// name,color,xp,level,speed,stability,handling,disc_slots,discs_owned,lives
pub fn parse_character_line(raw: &str, line: usize) -> Option<Result<CharacterTemplate, TemplateError>> {
    let parts = match split_row(raw, line, CHARACTER_FIELDS)? {
        Ok(parts) => parts,
        Err(e) => return Some(Err(e)),
    };
    let parse = || -> Result<CharacterTemplate, TemplateError> {
        let name = parts[0].trim();
        let character = PlayerCharacter::from_name(name).ok_or_else(|| TemplateError::UnknownName {
            line,
            name: name.to_string(),
        })?;
        Ok(CharacterTemplate {
            character,
            name: name.to_string(),
            color: parts[1].trim().to_string(),
            xp: field(&parts, 2, line, "xp")?,
            level: field(&parts, 3, line, "level")?,
            speed: stat(&parts, 4, line, "speed")?,
            stability: stat(&parts, 5, line, "stability")?,
            handling: stat(&parts, 6, line, "handling")?,
            disc_slots: field(&parts, 7, line, "disc_slots")?,
            discs_owned: field(&parts, 8, line, "discs_owned")?,
            lives: stat(&parts, 9, line, "lives")?,
        })
    };
    Some(parse())
}

/// Parse a character table, skipping bad rows with a warning
pub fn parse_character_templates(text: &str) -> Vec<CharacterTemplate> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, raw)| match parse_character_line(raw, idx + 1)? {
            Ok(template) => Some(template),
            Err(e) => {
                log::warn!("Skipping character template: {}", e);
                None
            }
        })
        .collect()
}
