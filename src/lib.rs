//! Light Cycles - a grid arena with jetwall trails and disc combat
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, actors, AI, discs, round flow)
//! - `templates`: Enemy archetype and player character records
//! - `persistence`: Player progress snapshots (serialization only)
//! - `highscores`: In-memory leaderboard
//! - `settings`: Data-driven gameplay tuning

pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod templates;

pub use highscores::HighScores;
pub use persistence::Progress;
pub use settings::GameConfig;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Arena is GRID_SIZE x GRID_SIZE cells
    pub const GRID_SIZE: i32 = 40;
    /// Random cell attempts before spawn search falls back to the centre
    pub const SPAWN_ATTEMPTS: u32 = 1000;
    /// Interior wall probability for procedural arenas
    pub const PROCEDURAL_WALL_CHANCE: f64 = 0.12;

    /// Player acceleration (tiles/tick²)
    pub const PLAYER_ACCEL: f32 = 0.01;
    /// Player coasting decay per tick
    pub const PLAYER_DECEL: f32 = 0.92;
    /// Below this the player stops (tiles/tick)
    pub const PLAYER_MIN_SPEED: f32 = 0.1 / 15.0;

    /// Enemy disc throw chance per completed step, before speed/aggression scaling
    pub const ENEMY_THROW_CHANCE: f64 = 0.02;
    /// Cap on enemy steps owed at once
    pub const MAX_ENEMY_STEPS_PER_TICK: f32 = 4.0;
    /// Jetwall-neighbour penalty used by strategic AI scoring
    pub const JETWALL_NEIGHBOUR_PENALTY: f32 = 2.0;

    /// XP per level below level 10
    pub const XP_PER_EARLY_LEVEL: u32 = 100;
    /// XP per level from level 10 upward
    pub const XP_PER_LATE_LEVEL: u32 = 200;
    /// Level cap
    pub const MAX_LEVEL: u32 = 99;
}
