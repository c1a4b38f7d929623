//! Thrown discs
//!
//! A disc flies in a straight line through sub-tile space, checking the
//! cell it occupies after every step. It comes to rest against walls or at
//! the end of its range, and is consumed when it strikes a character.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::{Direction, Enemy, Position};
use super::grid::Grid;

/// Lifecycle of a disc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscOutcome {
    Flying,
    /// Stopped on the ground; a player disc can be picked up
    Resting,
    /// Spent on a hit or picked up
    Consumed,
}

/// What ended a disc's flight this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscImpact {
    /// Wall, jetwall, or the edge of an open arena
    Obstacle(Position),
    /// An enemy disc struck the player
    Player(Position),
    /// Struck the enemy with this id
    Enemy(u32),
    /// Ran out of range
    Spent(Position),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disc {
    pub id: u32,
    /// Sub-tile position (x = col, y = row, cell centres at +0.5)
    pub pos: Vec2,
    pub cell: Position,
    pub direction: Direction,
    /// Thrower's enemy id; `None` for the player's own disc
    pub owner: Option<u32>,
    pub max_range: u32,
    /// Cells entered since the throw
    pub distance: u32,
    pub outcome: DiscOutcome,
    /// Fraction of a tile covered per tick
    step: f32,
}

impl Disc {
    pub fn new(
        id: u32,
        origin: Position,
        direction: Direction,
        owner: Option<u32>,
        max_range: u32,
        ticks_per_tile: u32,
    ) -> Self {
        Self {
            id,
            pos: origin.center(),
            cell: origin,
            direction,
            owner,
            max_range,
            distance: 0,
            outcome: DiscOutcome::Flying,
            step: 1.0 / ticks_per_tile.max(1) as f32,
        }
    }

    pub fn is_flying(&self) -> bool {
        self.outcome == DiscOutcome::Flying
    }

    pub fn is_player_disc(&self) -> bool {
        self.owner.is_none()
    }

    /// Advance one tick. Returns the impact that ended the flight, if any.
    pub fn advance(&mut self, grid: &Grid, player: Option<Position>, enemies: &[Enemy]) -> Option<DiscImpact> {
        if !self.is_flying() {
            return None;
        }

        let next = self.pos + self.direction.unit() * self.step;
        let cell = Position::containing(next);
        let entered = cell != self.cell;

        // Drops at the centre of the last open cell, in front of the obstacle
        if grid.is_blocked(cell) {
            self.pos = self.cell.center();
            self.outcome = DiscOutcome::Resting;
            return Some(DiscImpact::Obstacle(cell));
        }

        self.pos = next;
        if entered {
            self.cell = cell;
            self.distance += 1;
        }

        // Player discs never collide with the player in flight
        if self.owner.is_some() && player == Some(self.cell) {
            self.outcome = DiscOutcome::Consumed;
            return Some(DiscImpact::Player(self.cell));
        }

        let victim = enemies
            .iter()
            .find(|e| e.is_alive() && Some(e.id) != self.owner && e.pos == self.cell);
        if let Some(enemy) = victim {
            self.outcome = DiscOutcome::Consumed;
            return Some(DiscImpact::Enemy(enemy.id));
        }

        if entered && self.distance >= self.max_range {
            self.outcome = DiscOutcome::Resting;
            return Some(DiscImpact::Spent(self.cell));
        }
        None
    }

    /// Pick up a resting player disc. Returns true if it was collected.
    pub fn collect(&mut self) -> bool {
        if self.outcome == DiscOutcome::Resting && self.is_player_disc() {
            self.outcome = DiscOutcome::Consumed;
            return true;
        }
        false
    }
}
