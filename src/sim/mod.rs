//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod actor;
pub mod ai;
pub mod clock;
pub mod disc;
pub mod grid;
pub mod roster;
pub mod state;
pub mod tick;

pub use actor::{Archetype, Direction, Enemy, Player, PlayerCharacter, Position, Tier};
pub use ai::{GridView, decide_move};
pub use clock::FixedTimestep;
pub use disc::{Disc, DiscImpact, DiscOutcome};
pub use grid::{ArenaKind, Cell, Grid};
pub use roster::Difficulty;
pub use state::{GameEvent, GamePhase, GameState, Snapshot};
pub use tick::TickInput;
