//! Enemy decision engine
//!
//! One entry point, `decide_move`, dispatched on the enemy's tier:
//! - ReactiveRandom: random walk that refuses to step into an obstruction
//! - FixedPattern: fixed preference order with occasional pursuit
//! - PredictiveChase: intercept the player's next tile, flank, then chase
//! - Strategic: longer prediction, cutoffs, and a scored fallback
//!
//! Every tier returns the enemy's current facing when nothing is open.

use rand::Rng;
use rand::seq::SliceRandom;

use super::actor::{Direction, Enemy, Position, Tier};
use super::grid::Grid;
use crate::consts::JETWALL_NEIGHBOUR_PENALTY;

/// Baseline chance that a fixed-pattern enemy tries a pursuit move
pub const PATTERN_CHASE_CHANCE: f32 = 0.3;

/// Read-only view handed to the AI each step
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    pub grid: &'a Grid,
    pub player: Position,
}

impl<'a> GridView<'a> {
    pub fn new(grid: &'a Grid, player: Position) -> Self {
        Self { grid, player }
    }

    /// Free to enter: not a wall, jetwall or off the grid
    #[inline]
    fn is_open(&self, pos: Position) -> bool {
        self.grid.is_empty(pos)
    }

    fn open_exits(&self, pos: Position) -> usize {
        Direction::ALL
            .iter()
            .filter(|d| self.is_open(pos.step(**d)))
            .count()
    }

    fn jetwall_neighbours(&self, pos: Position) -> usize {
        Direction::ALL
            .iter()
            .filter(|d| self.grid.is_jetwall(pos.step(**d)))
            .count()
    }
}

/// Choose the next step for `enemy`
pub fn decide_move<R: Rng>(enemy: &Enemy, view: &GridView, rng: &mut R) -> Direction {
    let choice = match enemy.tier() {
        Tier::ReactiveRandom => reactive_random(enemy.pos, view, rng),
        Tier::FixedPattern => fixed_pattern(enemy, view, rng),
        Tier::PredictiveChase => predictive_chase(enemy.pos, view),
        Tier::Strategic => strategic(enemy.pos, view),
    };
    choice.unwrap_or(enemy.facing)
}

/// Dominant-axis direction from `from` toward `to`; ties go horizontal
pub fn toward(from: Position, to: Position) -> Direction {
    let dr = to.row - from.row;
    let dc = to.col - from.col;
    if dr.abs() > dc.abs() {
        if dr > 0 { Direction::Down } else { Direction::Up }
    } else if dc < 0 {
        Direction::Left
    } else {
        Direction::Right
    }
}

fn first_open(pos: Position, view: &GridView, options: &[Direction]) -> Option<Direction> {
    options.iter().copied().find(|d| view.is_open(pos.step(*d)))
}

// === Tier 1 ===

fn reactive_random<R: Rng>(pos: Position, view: &GridView, rng: &mut R) -> Option<Direction> {
    let mut order = Direction::ALL;
    order.shuffle(rng);
    first_open(pos, view, &order)
}

// === Tier 2 ===

const PATTERN_ORDER: [Direction; 4] = [
    Direction::Right,
    Direction::Down,
    Direction::Left,
    Direction::Up,
];

fn fixed_pattern<R: Rng>(enemy: &Enemy, view: &GridView, rng: &mut R) -> Option<Direction> {
    let chance = (PATTERN_CHASE_CHANCE * enemy.aggression).clamp(0.0, 1.0);
    if rng.random::<f32>() < chance {
        let chase = toward(enemy.pos, view.player);
        if view.is_open(enemy.pos.step(chase)) {
            return Some(chase);
        }
    }
    first_open(enemy.pos, view, &PATTERN_ORDER)
}

// === Tier 3 ===

/// One step ahead along the dominant axis, away from the enemy
fn predict_next(player: Position, enemy: Position) -> Position {
    let dr = player.row - enemy.row;
    let dc = player.col - enemy.col;
    if dr.abs() > dc.abs() {
        Position::new(player.row + if dr > 0 { 1 } else { -1 }, player.col)
    } else {
        Position::new(player.row, player.col + if dc > 0 { 1 } else { -1 })
    }
}

/// Perpendicular approach: the two directions orthogonal to the chase axis,
/// the one on the player's side first
fn flank(pos: Position, view: &GridView) -> Option<Direction> {
    let dr = view.player.row - pos.row;
    let dc = view.player.col - pos.col;
    let options = if dr.abs() > dc.abs() {
        if dc > 0 {
            [Direction::Right, Direction::Left]
        } else {
            [Direction::Left, Direction::Right]
        }
    } else if dr > 0 {
        [Direction::Down, Direction::Up]
    } else {
        [Direction::Up, Direction::Down]
    };
    first_open(pos, view, &options)
}

/// Direct chase, scanning primary, left turn, right turn, then reverse
fn chase_with_avoidance(pos: Position, view: &GridView) -> Option<Direction> {
    let primary = toward(pos, view.player);
    first_open(
        pos,
        view,
        &[
            primary,
            primary.turn_left(),
            primary.turn_right(),
            primary.opposite(),
        ],
    )
}

fn predictive_chase(pos: Position, view: &GridView) -> Option<Direction> {
    let predicted = predict_next(view.player, pos);
    let intercept = toward(pos, predicted);
    if view.is_open(pos.step(intercept)) {
        return Some(intercept);
    }
    flank(pos, view).or_else(|| chase_with_avoidance(pos, view))
}

// === Tier 4 ===

/// Far away the player is assumed to close in; up close, to flee
fn predict_advanced(player: Position, enemy: Position) -> Position {
    let dr = player.row - enemy.row;
    let dc = player.col - enemy.col;
    let away = if player.manhattan(enemy) > 5 { -1 } else { 1 };
    if dr.abs() > dc.abs() {
        Position::new(player.row + away * if dr > 0 { 1 } else { -1 }, player.col)
    } else {
        Position::new(player.row, player.col + away * if dc > 0 { 1 } else { -1 })
    }
}

/// Head toward the target, but only into cells with at least as many exits
fn strategic_positioning(pos: Position, view: &GridView, target: Position) -> Option<Direction> {
    let direct = toward(pos, target);
    let here = view.open_exits(pos);
    [direct, direct.turn_left(), direct.turn_right()]
        .into_iter()
        .find(|d| {
            let next = pos.step(*d);
            view.is_open(next) && view.open_exits(next) >= here
        })
}

/// Move along the axes opposite the player's quadrant
fn diagonal_approach(pos: Position, view: &GridView) -> Option<Direction> {
    let dr = view.player.row - pos.row;
    let dc = view.player.col - pos.col;
    let options = match (dr > 0, dc > 0) {
        (true, true) => [Direction::Up, Direction::Left],
        (true, false) => [Direction::Up, Direction::Right],
        (false, true) => [Direction::Down, Direction::Left],
        (false, false) => [Direction::Down, Direction::Right],
    };
    first_open(pos, view, &options)
}

/// Get between the player and its most open escape cell
fn cutoff(pos: Position, view: &GridView) -> Option<Direction> {
    let mut escapes: Vec<(Position, usize)> = Direction::ALL
        .iter()
        .map(|d| view.player.step(*d))
        .filter(|p| view.is_open(*p))
        .map(|p| (p, view.open_exits(p)))
        .collect();
    // Most open first; stable sort keeps UP/DOWN/LEFT/RIGHT order on ties
    escapes.sort_by(|a, b| b.1.cmp(&a.1));

    escapes.into_iter().find_map(|(escape, _)| {
        let dir = toward(pos, escape);
        view.is_open(pos.step(dir)).then_some(dir)
    })
}

/// Score every open neighbour by closeness to the player minus jetwall exposure
fn scored_fallback(pos: Position, view: &GridView) -> Option<Direction> {
    let mut best: Option<(Direction, f32)> = None;
    for dir in Direction::ALL {
        let next = pos.step(dir);
        if !view.is_open(next) {
            continue;
        }
        let score = -next.euclidean(view.player)
            - JETWALL_NEIGHBOUR_PENALTY * view.jetwall_neighbours(next) as f32;
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((dir, score));
        }
    }
    best.map(|(dir, _)| dir)
}

fn strategic(pos: Position, view: &GridView) -> Option<Direction> {
    let predicted = predict_advanced(view.player, pos);
    strategic_positioning(pos, view, predicted)
        .or_else(|| flank(pos, view))
        .or_else(|| diagonal_approach(pos, view))
        .or_else(|| cutoff(pos, view))
        .or_else(|| scored_fallback(pos, view))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::actor::Archetype;
    use crate::sim::grid::ArenaKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn enemy_at(archetype: Archetype, row: i32, col: i32) -> Enemy {
        Enemy::new(1, archetype, Position::new(row, col))
    }

    fn open_grid() -> Grid {
        Grid::generate(ArenaKind::ClassicGrid, None)
    }

    #[test]
    fn test_tier3_closes_column_gap() {
        let grid = open_grid();
        let view = GridView::new(&grid, Position::new(5, 10));
        let enemy = enemy_at(Archetype::Rinzler, 5, 5);
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(decide_move(&enemy, &view, &mut rng), Direction::Right);
    }

    #[test]
    fn test_tier3_flanks_when_intercept_blocked() {
        let mut grid = open_grid();
        grid.place_jetwall(Position::new(5, 6));
        let view = GridView::new(&grid, Position::new(7, 10));
        let enemy = enemy_at(Archetype::Rinzler, 5, 5);
        let mut rng = Pcg32::seed_from_u64(1);
        // Column gap dominates, so flank vertically toward the player's row
        assert_eq!(decide_move(&enemy, &view, &mut rng), Direction::Down);
    }

    #[test]
    fn test_boxed_in_keeps_facing() {
        let mut grid = open_grid();
        let pos = Position::new(5, 5);
        for dir in Direction::ALL {
            grid.place_jetwall(pos.step(dir));
        }
        let view = GridView::new(&grid, Position::new(20, 20));
        let mut rng = Pcg32::seed_from_u64(9);
        for archetype in Archetype::ALL {
            let mut enemy = enemy_at(archetype, 5, 5);
            enemy.facing = Direction::Left;
            assert_eq!(decide_move(&enemy, &view, &mut rng), Direction::Left);
        }
    }

    #[test]
    fn test_tier1_finds_only_exit() {
        let mut grid = open_grid();
        let pos = Position::new(5, 5);
        grid.place_jetwall(pos.step(Direction::Up));
        grid.place_jetwall(pos.step(Direction::Left));
        grid.place_jetwall(pos.step(Direction::Right));
        let view = GridView::new(&grid, Position::new(20, 20));
        let enemy = enemy_at(Archetype::Koura, 5, 5);
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..50 {
            assert_eq!(decide_move(&enemy, &view, &mut rng), Direction::Down);
        }
    }

    #[test]
    fn test_tier2_pattern_order() {
        let mut grid = open_grid();
        let pos = Position::new(5, 5);
        grid.place_jetwall(pos.step(Direction::Right));
        let view = GridView::new(&grid, Position::new(5, 5));
        let mut enemy = enemy_at(Archetype::Sark, 5, 5);
        // No pursuit, pure pattern
        enemy.aggression = 0.0;
        let mut rng = Pcg32::seed_from_u64(3);
        assert_eq!(decide_move(&enemy, &view, &mut rng), Direction::Down);
    }

    #[test]
    fn test_tier2_always_chases_at_full_aggression() {
        let grid = open_grid();
        let view = GridView::new(&grid, Position::new(5, 1));
        let mut enemy = enemy_at(Archetype::Sark, 5, 8);
        enemy.aggression = 10.0;
        let mut rng = Pcg32::seed_from_u64(3);
        assert_eq!(decide_move(&enemy, &view, &mut rng), Direction::Left);
    }

    #[test]
    fn test_tier4_avoids_walls_near_border() {
        let grid = open_grid();
        let view = GridView::new(&grid, Position::new(1, 20));
        let enemy = enemy_at(Archetype::Clu, 1, 1);
        let mut rng = Pcg32::seed_from_u64(3);
        let dir = decide_move(&enemy, &view, &mut rng);
        assert!(grid.is_empty(enemy.pos.step(dir)));
    }

    #[test]
    fn test_scored_fallback_penalizes_jetwall_neighbours() {
        let mut grid = open_grid();
        let pos = Position::new(10, 20);
        // Up is closest to the player but sits between two jetwalls (-4 - 4),
        // sideways cells touch one each (-5.1 - 2), down is clean (-6)
        grid.place_jetwall(Position::new(9, 19));
        grid.place_jetwall(Position::new(9, 21));
        let view = GridView::new(&grid, Position::new(5, 20));
        assert_eq!(scored_fallback(pos, &view), Some(Direction::Down));

        let clean = open_grid();
        let view = GridView::new(&clean, Position::new(5, 20));
        assert_eq!(scored_fallback(pos, &view), Some(Direction::Up));
    }

    #[test]
    fn test_toward_ties_go_horizontal() {
        let from = Position::new(0, 0);
        assert_eq!(toward(from, Position::new(3, 3)), Direction::Right);
        assert_eq!(toward(from, Position::new(-3, -3)), Direction::Left);
        assert_eq!(toward(from, Position::new(4, 3)), Direction::Down);
    }
}
