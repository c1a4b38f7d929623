//! Fixed timestep simulation tick
//!
//! Core game loop that advances a round deterministically. Nothing in here
//! fails: bad moves, blocked cells and missing targets all resolve in-model.

use rand::Rng;

use super::actor::{Direction, Position};
use super::ai::{GridView, decide_move};
use super::disc::{Disc, DiscImpact, DiscOutcome};
use super::grid::Cell;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Turn to face this direction and throttle up
    pub steer: Option<Direction>,
    /// Release the throttle and coast to a stop
    pub brake: bool,
    /// Throw a disc along the current heading
    pub throw: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start the next round after a win
    pub advance_round: bool,
}

impl GameState {
    /// Advance by one fixed timestep
    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        tick(self, input, dt);
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    if input.advance_round && state.phase == GamePhase::RoundWin {
        state.advance_round();
        return;
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;
    let player = &mut state.player;
    player.damage_cooldown = player.damage_cooldown.saturating_sub(1);
    player.throw_cooldown = player.throw_cooldown.saturating_sub(1);

    move_player(state, input);
    if state.player.is_alive() {
        if input.throw {
            throw_player_disc(state);
        }
        resolve_contact(state);
        move_enemies(state, dt);
        advance_discs(state);
    }
    collect_dead(state);
    check_round_end(state);
    state.normalize_order();
}

/// Throttle, heading and grid validation for the player's cycle
fn move_player(state: &mut GameState, input: &TickInput) {
    let tick = state.time_ticks;
    let player = &mut state.player;

    if let Some(dir) = input.steer {
        player.heading = dir;
        player.moving = true;
    }
    if input.brake {
        player.moving = false;
    }

    if player.moving {
        player.velocity = (player.velocity + PLAYER_ACCEL).min(player.max_speed());
    } else {
        player.velocity *= PLAYER_DECEL;
        if player.velocity < PLAYER_MIN_SPEED {
            player.velocity = 0.0;
        }
    }
    if player.velocity <= 0.0 {
        return;
    }

    let tentative = player.pos + player.heading.unit() * player.velocity;
    let target = Position::containing(tentative);
    if target == player.cell {
        player.pos = tentative;
        return;
    }

    match state.grid.cell(target) {
        Cell::Void => {
            log::info!("Player fell off the grid at {:?}", target);
            player.fall_off();
            state.events.push(GameEvent::FellOff { cell: target });
        }
        Cell::Wall | Cell::Jetwall => {
            player.velocity = 0.0;
            player.moving = false;
            state.events.push(GameEvent::Collision { cell: target, tick });
            let amount = state.config.collision_damage;
            if player.apply_damage(amount, state.config.damage_cooldown_ticks) {
                log::debug!("Player hit {:?}, lives {}", target, player.lives);
                state.events.push(GameEvent::PlayerDamaged {
                    amount,
                    lives: player.lives,
                });
            }
        }
        Cell::Empty => {
            state.grid.stamp_trail(player.cell, target);
            player.cell = target;
            player.pos = tentative;
        }
    }
}

fn throw_player_disc(state: &mut GameState) {
    if state.player.throw_cooldown > 0 {
        log::debug!("Throw on cooldown ({} ticks)", state.player.throw_cooldown);
        return;
    }
    if !state.player.use_disc() {
        return;
    }
    state.player.throw_cooldown = state.config.throw_cooldown_ticks;

    let id = state.next_entity_id();
    let disc = Disc::new(
        id,
        state.player.cell,
        state.player.heading,
        None,
        state.config.disc_range,
        state.config.disc_ticks_per_tile,
    );
    state.discs.push(disc);
    state.events.push(GameEvent::DiscThrown { disc: id, owner: None });
}

/// Sharing a cell costs the player life and the enemy a hit
fn resolve_contact(state: &mut GameState) {
    let cell = state.player.cell;
    for enemy in state.enemies.iter_mut().filter(|e| e.is_alive() && e.pos == cell) {
        let amount = state.config.contact_damage;
        if state.player.apply_damage(amount, state.config.damage_cooldown_ticks) {
            state.events.push(GameEvent::PlayerDamaged {
                amount,
                lives: state.player.lives,
            });
        }
        enemy.take_hit();
    }
}

fn move_enemies(state: &mut GameState, dt: f32) {
    for i in 0..state.enemies.len() {
        if !state.enemies[i].is_alive() {
            continue;
        }
        let enemy = &mut state.enemies[i];
        let owed = enemy.move_acc + enemy.step_rate() * dt;
        enemy.move_acc = if owed.is_finite() {
            owed.min(MAX_ENEMY_STEPS_PER_TICK)
        } else {
            0.0
        };
        while state.enemies[i].move_acc >= 1.0 && state.enemies[i].is_alive() {
            state.enemies[i].move_acc -= 1.0;
            if !step_enemy(state, i) {
                break;
            }
        }
    }
}

/// One AI step for the enemy at `index`. Returns false if the step was blocked.
fn step_enemy(state: &mut GameState, index: usize) -> bool {
    let tick = state.time_ticks;
    let view = GridView::new(&state.grid, state.player.cell);
    let dir = decide_move(&state.enemies[index], &view, &mut state.rng);

    let enemy = &mut state.enemies[index];
    let from = enemy.pos;
    let to = from.step(dir);
    enemy.facing = dir;

    if state.grid.is_blocked(to) {
        state.events.push(GameEvent::Collision { cell: to, tick });
        if enemy.take_hit() {
            enemy.derezzed_by_wall = true;
        }
        return false;
    }

    enemy.pos = to;
    state.grid.place_jetwall(from);

    let chance = ENEMY_THROW_CHANCE * f64::from(enemy.speed.min(5.0)) * f64::from(enemy.aggression);
    let owner = enemy.id;
    if chance.is_finite() && state.rng.random_bool(chance.clamp(0.0, 1.0)) {
        let id = state.next_entity_id();
        let disc = Disc::new(
            id,
            to,
            dir,
            Some(owner),
            state.config.disc_range,
            state.config.disc_ticks_per_tile,
        );
        state.discs.push(disc);
        state.events.push(GameEvent::DiscThrown {
            disc: id,
            owner: Some(owner),
        });
    }
    true
}

fn advance_discs(state: &mut GameState) {
    let tick = state.time_ticks;
    let player_cell = state.player.cell;

    for disc in state.discs.iter_mut() {
        let Some(impact) = disc.advance(&state.grid, Some(player_cell), &state.enemies) else {
            continue;
        };
        match impact {
            DiscImpact::Obstacle(cell) => {
                state.events.push(GameEvent::Collision { cell, tick });
                state.events.push(GameEvent::DiscRested {
                    disc: disc.id,
                    cell: disc.cell,
                });
            }
            DiscImpact::Spent(cell) => {
                state.events.push(GameEvent::DiscRested { disc: disc.id, cell });
            }
            DiscImpact::Player(_) => {
                state.player.lose_lives(state.config.disc_damage);
                log::debug!("Disc {} hit the player, lives {}", disc.id, state.player.lives);
                state.events.push(GameEvent::DiscHitPlayer { disc: disc.id });
                state.events.push(GameEvent::PlayerDamaged {
                    amount: state.config.disc_damage,
                    lives: state.player.lives,
                });
            }
            DiscImpact::Enemy(id) => {
                if let Some(enemy) = state.enemies.iter_mut().find(|e| e.id == id) {
                    if enemy.take_hit() {
                        enemy.derezzed_by_wall = false;
                    }
                }
                state.events.push(GameEvent::DiscHitEnemy { disc: disc.id, enemy: id });
            }
        }
    }

    // Reclaim resting player discs under the cycle
    for disc in state.discs.iter_mut() {
        if disc.cell == player_cell && disc.collect() {
            state.player.add_discs(1);
            state.events.push(GameEvent::DiscReclaimed { disc: disc.id });
        }
    }

    // Enemy discs are spent once they stop
    state
        .discs
        .retain(|d| d.is_flying() || (d.outcome == DiscOutcome::Resting && d.is_player_disc()));
}

/// Remove derezzed enemies and pay out their XP
fn collect_dead(state: &mut GameState) {
    let (dead, alive): (Vec<_>, Vec<_>) = std::mem::take(&mut state.enemies)
        .into_iter()
        .partition(|e| !e.is_alive());
    state.enemies = alive;

    for enemy in dead {
        let xp = if enemy.derezzed_by_wall {
            enemy.xp_reward / 2
        } else {
            enemy.xp_reward
        };
        log::debug!("{} {} derezzed (+{} xp)", enemy.name(), enemy.id, xp);
        state.events.push(GameEvent::EnemyDerezzed {
            id: enemy.id,
            by_wall: enemy.derezzed_by_wall,
            xp,
        });
        state.score += u64::from(xp);
        state.award_xp(xp);
    }
}

/// Death beats victory when both land on the same tick
fn check_round_end(state: &mut GameState) {
    if !state.player.is_alive() {
        state.phase = GamePhase::GameOver;
        state.contested = false;
        log::info!("Game over in round {} (score {})", state.round, state.score);
        state.events.push(GameEvent::GameOver {
            round: state.round,
            score: state.score,
        });
        return;
    }

    if state.contested && state.enemies.is_empty() {
        state.contested = false;
        state.phase = GamePhase::RoundWin;
        let bonus = state.round * state.config.round_bonus_per_round;
        state.score += u64::from(bonus);
        state.award_xp(bonus);
        log::info!("Round {} won (+{} bonus)", state.round, bonus);
        state.events.push(GameEvent::RoundWon {
            round: state.round,
            bonus,
        });
    }
}
