//! Property-based invariant tests for the arena simulation.
//!
//! 1. Borders are walls on every bordered arena; the open arena has none.
//! 2. `place_jetwall` is idempotent and never overwrites a wall.
//! 3. A flying disc never outruns its range and never strikes its thrower.
//! 4. Reactive-random enemies step into an empty cell whenever one exists.
//! 5. Chasing tiers never pick an obstruction while an open exit exists.
//! 6. Procedural arenas keep the centre open for every seed.
//! 7. Same seed and inputs produce the same run.

use light_cycles::consts::GRID_SIZE;
use light_cycles::sim::{
    ArenaKind, Archetype, Direction, Disc, DiscImpact, Enemy, GameState, Grid, GridView, Position,
    TickInput, decide_move,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

// ── Helpers ─────────────────────────────────────────────────────────────

fn arena_strategy() -> impl Strategy<Value = ArenaKind> {
    prop_oneof![
        Just(ArenaKind::ClassicGrid),
        Just(ArenaKind::NeonMaze),
        Just(ArenaKind::OpenFrontier),
        Just(ArenaKind::Procedural),
    ]
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

fn cell_strategy() -> impl Strategy<Value = Position> {
    (0..GRID_SIZE, 0..GRID_SIZE).prop_map(|(r, c)| Position::new(r, c))
}

/// Grid with a scattering of jetwalls on top of the generated layout
fn cluttered_grid(kind: ArenaKind, seed: u64, trails: &[Position]) -> Grid {
    let mut grid = Grid::generate(kind, Some(seed));
    for &cell in trails {
        grid.place_jetwall(cell);
    }
    grid
}

// ═════════════════════════════════════════════════════════════════════════
// 1-2. Grid structure
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn borders_follow_arena_kind(kind in arena_strategy(), seed in any::<u64>(), i in 0..GRID_SIZE) {
        let grid = Grid::generate(kind, Some(seed));
        let edge = [
            Position::new(0, i),
            Position::new(GRID_SIZE - 1, i),
            Position::new(i, 0),
            Position::new(i, GRID_SIZE - 1),
        ];
        for cell in edge {
            prop_assert_eq!(grid.is_wall(cell), !kind.is_open());
        }
        let outside = Position::new(-1, i);
        prop_assert_eq!(grid.is_void(outside), kind.is_open());
    }

    #[test]
    fn place_jetwall_idempotent(kind in arena_strategy(), seed in any::<u64>(), cell in cell_strategy()) {
        let mut grid = Grid::generate(kind, Some(seed));
        let was_wall = grid.is_wall(cell);
        grid.place_jetwall(cell);
        let once = grid.clone();
        grid.place_jetwall(cell);
        prop_assert_eq!(&grid, &once);
        prop_assert_eq!(grid.is_wall(cell), was_wall);
        prop_assert!(was_wall || grid.is_jetwall(cell));
    }

    #[test]
    fn procedural_centre_open(seed in any::<u64>()) {
        let grid = Grid::generate(ArenaKind::Procedural, Some(seed));
        prop_assert!(grid.is_empty(Grid::center()));
        prop_assert!(grid.is_empty(grid.find_spawn(Some(seed))));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Discs
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn disc_respects_range_and_owner(
        seed in any::<u64>(),
        dir in direction_strategy(),
        range in 1u32..6,
        ticks_per_tile in 1u32..10,
        others in proptest::collection::vec(cell_strategy(), 0..6),
    ) {
        let grid = Grid::generate(ArenaKind::Procedural, Some(seed));
        let mut rng = Pcg32::seed_from_u64(seed);
        let origin = grid.random_empty_cell(&mut rng, &[]);

        let mut enemies = vec![Enemy::new(1, Archetype::Sark, origin)];
        for (i, cell) in others.into_iter().enumerate() {
            enemies.push(Enemy::new(2 + i as u32, Archetype::Koura, cell));
        }

        let mut disc = Disc::new(100, origin, dir, Some(1), range, ticks_per_tile);
        for _ in 0..(range + 2) * ticks_per_tile {
            let impact = disc.advance(&grid, None, &enemies);
            prop_assert!(disc.distance <= range);
            prop_assert_ne!(impact, Some(DiscImpact::Enemy(1)));
            if !disc.is_flying() {
                break;
            }
        }
        prop_assert!(!disc.is_flying());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4-5. Enemy decisions
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reactive_random_finds_open_cell(
        kind in arena_strategy(),
        seed in any::<u64>(),
        trails in proptest::collection::vec(cell_strategy(), 0..200),
        player in cell_strategy(),
    ) {
        let grid = cluttered_grid(kind, seed, &trails);
        let mut rng = Pcg32::seed_from_u64(seed);
        let pos = grid.random_empty_cell(&mut rng, &[]);
        let enemy = Enemy::new(1, Archetype::Koura, pos);

        let dir = decide_move(&enemy, &GridView::new(&grid, player), &mut rng);
        let any_open = Direction::ALL.iter().any(|d| grid.is_empty(pos.step(*d)));
        if any_open {
            prop_assert!(grid.is_empty(pos.step(dir)));
        } else {
            prop_assert_eq!(dir, enemy.facing);
        }
    }

    #[test]
    fn chasers_avoid_obstructions(
        kind in arena_strategy(),
        seed in any::<u64>(),
        trails in proptest::collection::vec(cell_strategy(), 0..200),
        player in cell_strategy(),
        strategic in any::<bool>(),
    ) {
        let grid = cluttered_grid(kind, seed, &trails);
        let mut rng = Pcg32::seed_from_u64(seed);
        let pos = grid.random_empty_cell(&mut rng, &[]);
        let archetype = if strategic { Archetype::Clu } else { Archetype::Rinzler };
        let enemy = Enemy::new(1, archetype, pos);

        let dir = decide_move(&enemy, &GridView::new(&grid, player), &mut rng);
        if Direction::ALL.iter().any(|d| grid.is_empty(pos.step(*d))) {
            prop_assert!(!grid.is_blocked(pos.step(dir)));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn same_seed_same_run(seed in any::<u64>(), steers in proptest::collection::vec(direction_strategy(), 1..8)) {
        let mut a = GameState::with_defaults(seed);
        let mut b = GameState::with_defaults(seed);
        for n in 0..240 {
            let input = TickInput {
                steer: Some(steers[n % steers.len()]),
                throw: n % 50 == 0,
                ..Default::default()
            };
            a.tick(&input, light_cycles::consts::SIM_DT);
            b.tick(&input, light_cycles::consts::SIM_DT);
        }
        prop_assert_eq!(a.drain_events(), b.drain_events());
        prop_assert_eq!(a.score, b.score);
        prop_assert_eq!(a.player.cell, b.player.cell);
        prop_assert_eq!(a.grid.cells(), b.grid.cells());
    }
}
