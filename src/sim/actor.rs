//! Actors: the player's light-cycle and the enemy programs
//!
//! Enemies share one struct; behaviour comes from the archetype's tier.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Integer grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The neighbouring cell in `dir`
    #[inline]
    pub fn step(self, dir: Direction) -> Self {
        let (dr, dc) = dir.delta();
        Self::new(self.row + dr, self.col + dc)
    }

    pub fn manhattan(self, other: Position) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }

    pub fn euclidean(self, other: Position) -> f32 {
        let dr = (self.row - other.row) as f32;
        let dc = (self.col - other.col) as f32;
        (dr * dr + dc * dc).sqrt()
    }

    /// Centre of the cell in sub-tile space (x = col, y = row)
    pub fn center(self) -> Vec2 {
        Vec2::new(self.col as f32 + 0.5, self.row as f32 + 0.5)
    }

    /// Cell containing a sub-tile point (x = col, y = row)
    pub fn containing(point: Vec2) -> Self {
        Self::new(point.y.floor() as i32, point.x.floor() as i32)
    }
}

/// Facing / travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// (row, col) offset of one step
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Unit vector in sub-tile space (x = col, y = row)
    pub fn unit(self) -> Vec2 {
        let (dr, dc) = self.delta();
        Vec2::new(dc as f32, dr as f32)
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// 90° counter-clockwise
    pub fn turn_left(self) -> Self {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }

    /// 90° clockwise
    pub fn turn_right(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

/// AI behaviour class, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    ReactiveRandom,
    FixedPattern,
    PredictiveChase,
    Strategic,
}

/// Enemy archetypes. The tier is fixed by the archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Koura,
    Sark,
    Rinzler,
    Clu,
}

impl Archetype {
    pub const ALL: [Archetype; 4] = [
        Archetype::Koura,
        Archetype::Sark,
        Archetype::Rinzler,
        Archetype::Clu,
    ];

    pub fn tier(self) -> Tier {
        match self {
            Archetype::Koura => Tier::ReactiveRandom,
            Archetype::Sark => Tier::FixedPattern,
            Archetype::Rinzler => Tier::PredictiveChase,
            Archetype::Clu => Tier::Strategic,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Archetype::Koura => "Koura",
            Archetype::Sark => "Sark",
            Archetype::Rinzler => "Rinzler",
            Archetype::Clu => "Clu",
        }
    }

    /// Case-insensitive lookup
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "koura" => Some(Archetype::Koura),
            "sark" => Some(Archetype::Sark),
            "rinzler" => Some(Archetype::Rinzler),
            "clu" => Some(Archetype::Clu),
            _ => None,
        }
    }
}

/// An enemy program
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub archetype: Archetype,
    pub color: String,
    pub pos: Position,
    pub facing: Direction,
    /// Tiles per second
    pub speed: f32,
    pub handling: f32,
    pub aggression: f32,
    pub xp_reward: u32,
    pub lives: i32,
    /// Fractional steps owed (see `step_rate`)
    #[serde(default)]
    pub move_acc: f32,
    /// Set when the last life was lost to a wall rather than a disc
    #[serde(default)]
    pub derezzed_by_wall: bool,
}

impl Enemy {
    pub fn new(id: u32, archetype: Archetype, pos: Position) -> Self {
        Self {
            id,
            archetype,
            color: String::new(),
            pos,
            facing: Direction::Up,
            speed: 3.0,
            handling: 1.0,
            aggression: 1.0,
            xp_reward: 10,
            lives: 1,
            move_acc: 0.0,
            derezzed_by_wall: false,
        }
    }

    pub fn name(&self) -> &'static str {
        self.archetype.as_str()
    }

    pub fn tier(&self) -> Tier {
        self.archetype.tier()
    }

    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    /// Steps per second; handling nudges the cadence around the base speed
    pub fn step_rate(&self) -> f32 {
        (self.speed * (0.9 + 0.1 * self.handling)).max(0.0)
    }

    /// Lose one life. Returns true if this hit was fatal.
    pub fn take_hit(&mut self) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.lives -= 1;
        !self.is_alive()
    }
}

/// Playable characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerCharacter {
    #[default]
    Tron,
    Kevin,
}

impl PlayerCharacter {
    pub fn as_str(self) -> &'static str {
        match self {
            PlayerCharacter::Tron => "Tron",
            PlayerCharacter::Kevin => "Kevin",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "tron" => Some(PlayerCharacter::Tron),
            "kevin" | "kevinflynn" | "kevin flynn" => Some(PlayerCharacter::Kevin),
            _ => None,
        }
    }
}

/// The player's light-cycle and persistent progression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
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

    /// Sub-tile position (x = col, y = row)
    pub pos: Vec2,
    /// Current cell
    pub cell: Position,
    pub heading: Direction,
    /// Persistent throttle; cleared by braking
    pub moving: bool,
    /// Tiles per tick
    pub velocity: f32,
    /// Ticks until wall/jetwall damage can apply again
    #[serde(default)]
    pub damage_cooldown: u32,
    /// Ticks until the next disc can be thrown
    #[serde(default)]
    pub throw_cooldown: u32,
}

impl Player {
    pub fn new(character: PlayerCharacter) -> Self {
        let (color, speed, stability, handling) = match character {
            PlayerCharacter::Tron => ("Blue", 2.0, 0.5, 0.5),
            PlayerCharacter::Kevin => ("White", 1.5, 0.6, 0.8),
        };
        Self {
            character,
            name: character.as_str().to_string(),
            color: color.to_string(),
            xp: 0,
            level: 1,
            speed,
            stability,
            handling,
            disc_slots: 3,
            discs_owned: 3,
            lives: 3.0,
            pos: Position::default().center(),
            cell: Position::default(),
            heading: Direction::Right,
            moving: false,
            velocity: 0.0,
            damage_cooldown: 0,
            throw_cooldown: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.lives > 0.0
    }

    /// Teleport to the centre of `cell` and stop
    pub fn place_at(&mut self, cell: Position) {
        self.cell = cell;
        self.pos = cell.center();
        self.velocity = 0.0;
        self.moving = false;
    }

    /// Top speed in tiles/tick
    pub fn max_speed(&self) -> f32 {
        (2.0 + self.speed * 0.3) / 15.0
    }

    /// Apply damage unless the cooldown is running. Returns true if applied.
    pub fn apply_damage(&mut self, amount: f32, cooldown_ticks: u32) -> bool {
        if self.damage_cooldown > 0 {
            return false;
        }
        self.lives -= amount;
        self.damage_cooldown = cooldown_ticks;
        true
    }

    /// Ungated damage (disc strikes)
    pub fn lose_lives(&mut self, amount: f32) {
        self.lives -= amount;
    }

    /// Fell off the grid: every remaining life is gone
    pub fn fall_off(&mut self) {
        self.lives = 0.0;
        self.velocity = 0.0;
    }

    /// Take one disc from the inventory
    pub fn use_disc(&mut self) -> bool {
        if self.discs_owned == 0 {
            return false;
        }
        self.discs_owned -= 1;
        true
    }

    /// Add discs, capped at the number of slots
    pub fn add_discs(&mut self, count: u32) {
        self.discs_owned = (self.discs_owned + count).min(self.disc_slots);
    }

    /// Award XP and apply any level-ups. Returns the levels reached.
    pub fn gain_xp(&mut self, amount: u32) -> Vec<u32> {
        self.xp = self.xp.saturating_add(amount);
        let target = level_for_xp(self.xp);
        let mut reached = Vec::new();
        while self.level < target {
            self.level += 1;
            self.on_level_up();
            reached.push(self.level);
        }
        reached
    }

    fn on_level_up(&mut self) {
        if self.level % 10 == 0 {
            self.lives += 1.0;
        }
        if self.level % 15 == 0 {
            self.disc_slots += 1;
        }
        match self.character {
            PlayerCharacter::Tron => {
                self.speed += 0.05;
                if self.stability + 0.05 < 1.0 {
                    self.stability += 0.05;
                }
            }
            PlayerCharacter::Kevin => {
                self.handling += 0.3;
                self.add_discs(2);
            }
        }
    }

    /// XP still needed for the next level (0 at the cap)
    pub fn xp_to_next_level(&self) -> u32 {
        if self.level >= MAX_LEVEL {
            return 0;
        }
        let next = self.level + 1;
        let needed = if next <= 10 {
            (next - 1) * XP_PER_EARLY_LEVEL
        } else {
            1000 + (next - 10) * XP_PER_LATE_LEVEL
        };
        needed.saturating_sub(self.xp)
    }
}

/// Level implied by a lifetime XP total
pub fn level_for_xp(xp: u32) -> u32 {
    let level = if xp < 1000 {
        1 + xp / XP_PER_EARLY_LEVEL
    } else {
        10 + (xp - 1000) / XP_PER_LATE_LEVEL
    };
    level.min(MAX_LEVEL)
}
