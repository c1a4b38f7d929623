//! Round state and the events it reports
//!
//! `GameState` owns everything a round touches: grid, player, enemies and
//! discs. The per-tick update lives in `tick`; round setup lives here.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::{Enemy, Player, PlayerCharacter, Position};
use super::disc::Disc;
use super::grid::{ArenaKind, Cell, Grid};
use super::roster::{Difficulty, draw_roster};
use crate::persistence::{PROGRESS_VERSION, Progress};
use crate::settings::GameConfig;
use crate::templates::{EnemyTemplate, default_enemy_templates};

/// Enemies never spawn within this Manhattan distance of the player
pub const SPAWN_CLEARANCE: i32 = 3;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Every enemy is down; waiting for the next round
    RoundWin,
    /// Run ended
    GameOver,
}

/// Facts reported by the simulation for presentation and narrative layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Something struck a wall, jetwall or the arena edge
    Collision { cell: Position, tick: u64 },
    PlayerDamaged { amount: f32, lives: f32 },
    FellOff { cell: Position },
    DiscThrown { disc: u32, owner: Option<u32> },
    DiscHitEnemy { disc: u32, enemy: u32 },
    DiscHitPlayer { disc: u32 },
    DiscRested { disc: u32, cell: Position },
    DiscReclaimed { disc: u32 },
    EnemyDerezzed { id: u32, by_wall: bool, xp: u32 },
    LevelUp(u32),
    RoundStarted { round: u32, arena: ArenaKind, difficulty: Difficulty },
    RoundWon { round: u32, bonus: u32 },
    GameOver { round: u32, score: u64 },
    /// Narrative key (INTRO, ROUND_5, LEVEL_10, ...)
    Milestone(String),
}

/// Owned copy of everything presentation needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub round: u32,
    pub difficulty: Difficulty,
    pub score: u64,
    pub arena: ArenaKind,
    /// Row-major cells
    pub cells: Vec<Cell>,
    pub player_cell: Position,
    pub player_pos: (f32, f32),
    pub player_lives: f32,
    pub player_level: u32,
    pub player_xp: u32,
    pub discs_owned: u32,
    /// Living enemies only
    pub enemies: Vec<Enemy>,
    pub discs: Vec<Disc>,
}

/// Complete round state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: GameConfig,
    pub templates: Vec<EnemyTemplate>,
    pub grid: Grid,
    pub player: Player,
    /// Sorted by id for determinism
    pub enemies: Vec<Enemy>,
    /// Sorted by id for determinism
    pub discs: Vec<Disc>,
    /// 1-based round number
    pub round: u32,
    pub difficulty: Difficulty,
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
    /// Set while the current round has had enemies to beat
    pub(crate) contested: bool,
    next_id: u32,
}

impl GameState {
    /// Start a run at round 1 on the configured arena
    pub fn new(seed: u64, player: Player, config: GameConfig, templates: Vec<EnemyTemplate>) -> Self {
        let arena = config.starting_arena;
        let mut state = Self {
            seed,
            config,
            templates,
            grid: Grid::empty(arena),
            player,
            enemies: Vec::new(),
            discs: Vec::new(),
            round: 1,
            difficulty: Difficulty::Easy,
            score: 0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            contested: false,
            next_id: 1,
        };
        state.start_round(arena);
        state
    }

    /// Tron, default tuning and the built-in archetype table
    pub fn with_defaults(seed: u64) -> Self {
        Self::new(
            seed,
            Player::new(PlayerCharacter::Tron),
            GameConfig::default(),
            default_enemy_templates(),
        )
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Build the arena for the current round number, place the player and
    /// draw a fresh enemy roster.
    pub fn start_round(&mut self, arena: ArenaKind) {
        let grid_seed: u64 = self.rng.random();
        self.grid = Grid::generate(arena, Some(grid_seed));

        let spawn = self.grid.find_spawn(Some(grid_seed));
        self.player.place_at(spawn);
        self.player.damage_cooldown = 0;
        self.player.throw_cooldown = 0;

        self.enemies.clear();
        self.discs.clear();
        self.difficulty = self.config.base_difficulty.max(Difficulty::for_round(self.round));

        let reserved = cells_near(spawn, SPAWN_CLEARANCE);
        let first_id = self.next_id;
        self.enemies = draw_roster(
            &self.templates,
            self.difficulty,
            self.config.enemies_per_round,
            &self.grid,
            &reserved,
            first_id,
            &mut self.rng,
        );
        self.next_id += self.enemies.len() as u32;
        self.contested = !self.enemies.is_empty();
        self.phase = GamePhase::Playing;

        log::info!(
            "Round {} on {} ({}, {} enemies)",
            self.round,
            arena.as_str(),
            self.difficulty.as_str(),
            self.enemies.len()
        );
        self.events.push(GameEvent::RoundStarted {
            round: self.round,
            arena,
            difficulty: self.difficulty,
        });
        if self.round == 1 {
            self.events.push(GameEvent::Milestone("INTRO".into()));
        } else if self.round % 5 == 0 {
            self.events.push(GameEvent::Milestone(format!("ROUND_{}", self.round)));
        }
    }

    /// Move on from a won round to the next arena in the rotation.
    /// Returns false (and does nothing) outside `RoundWin`.
    pub fn advance_round(&mut self) -> bool {
        if self.phase != GamePhase::RoundWin {
            return false;
        }
        self.round += 1;
        self.start_round(ArenaKind::for_round(self.round));
        true
    }

    /// Award XP to the player, reporting level-ups and level milestones
    pub(crate) fn award_xp(&mut self, amount: u32) {
        for level in self.player.gain_xp(amount) {
            log::info!("Level up: {}", level);
            self.events.push(GameEvent::LevelUp(level));
            if level == 10 || level == 25 {
                self.events.push(GameEvent::Milestone(format!("LEVEL_{}", level)));
            }
        }
    }

    pub fn living_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.time_ticks,
            phase: self.phase,
            round: self.round,
            difficulty: self.difficulty,
            score: self.score,
            arena: self.grid.kind(),
            cells: self.grid.cells().to_vec(),
            player_cell: self.player.cell,
            player_pos: (self.player.pos.x, self.player.pos.y),
            player_lives: self.player.lives,
            player_level: self.player.level,
            player_xp: self.player.xp,
            discs_owned: self.player.discs_owned,
            enemies: self.enemies.iter().filter(|e| e.is_alive()).cloned().collect(),
            discs: self.discs.clone(),
        }
    }

    /// Progress as it stands; resuming replays the current round from its start
    pub fn progress(&self) -> Progress {
        Progress {
            version: PROGRESS_VERSION,
            name: self.player.name.clone(),
            character: self.player.character,
            xp: self.player.xp,
            level: self.player.level,
            lives: self.player.lives,
            discs_owned: self.player.discs_owned,
            disc_slots: self.player.disc_slots,
            arena: self.grid.kind(),
            difficulty: self.difficulty,
            round: self.round,
            score: self.score,
        }
    }

    /// Resume from saved progress. The saved difficulty becomes the floor.
    pub fn restore(&mut self, progress: &Progress) {
        if self.player.character != progress.character {
            self.player = Player::new(progress.character);
        }
        self.player.name = progress.name.clone();
        self.player.xp = progress.xp;
        self.player.level = progress.level;
        self.player.lives = progress.lives;
        self.player.disc_slots = progress.disc_slots;
        self.player.discs_owned = progress.discs_owned.min(progress.disc_slots);

        self.round = progress.round.max(1);
        self.score = progress.score;
        self.config.base_difficulty = progress.difficulty;
        self.events.clear();
        self.start_round(progress.arena);
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.discs.sort_by_key(|d| d.id);
    }
}

/// Every cell (bounds unchecked) within `radius` (Manhattan) of `center`
fn cells_near(center: Position, radius: i32) -> Vec<Position> {
    let mut cells = Vec::new();
    for dr in -radius..=radius {
        let span = radius - dr.abs();
        for dc in -span..=span {
            cells.push(Position::new(center.row + dr, center.col + dc));
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_starts_round_one() {
        let mut state = GameState::with_defaults(12345);
        assert_eq!(state.round, 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.difficulty, Difficulty::Easy);
        assert_eq!(state.grid.kind(), ArenaKind::ClassicGrid);
        assert_eq!(state.enemies.len(), 7);
        assert!(state.grid.is_empty(state.player.cell));
        for enemy in &state.enemies {
            assert!(enemy.pos.manhattan(state.player.cell) > SPAWN_CLEARANCE);
        }

        let events = state.drain_events();
        assert!(matches!(events[0], GameEvent::RoundStarted { round: 1, .. }));
        assert!(events.contains(&GameEvent::Milestone("INTRO".into())));
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_base_difficulty_is_a_floor() {
        let config = GameConfig {
            base_difficulty: Difficulty::Hard,
            ..Default::default()
        };
        let state = GameState::new(1, Player::new(PlayerCharacter::Kevin), config, default_enemy_templates());
        assert_eq!(state.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_advance_round_only_after_win() {
        let mut state = GameState::with_defaults(3);
        assert!(!state.advance_round());
        assert_eq!(state.round, 1);

        state.phase = GamePhase::RoundWin;
        assert!(state.advance_round());
        assert_eq!(state.round, 2);
        assert_eq!(state.grid.kind(), ArenaKind::NeonMaze);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_fifth_round_milestone() {
        let mut state = GameState::with_defaults(3);
        state.round = 4;
        state.phase = GamePhase::RoundWin;
        state.drain_events();
        state.advance_round();
        assert!(state.drain_events().contains(&GameEvent::Milestone("ROUND_5".into())));
        assert_eq!(state.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_ids_unique_across_rounds() {
        let mut state = GameState::with_defaults(8);
        let first: Vec<u32> = state.enemies.iter().map(|e| e.id).collect();
        state.phase = GamePhase::RoundWin;
        state.advance_round();
        assert!(state.enemies.iter().all(|e| !first.contains(&e.id)));
        assert!(state.next_entity_id() > state.enemies.iter().map(|e| e.id).max().unwrap_or(0));
    }

    #[test]
    fn test_progress_restore() {
        let mut state = GameState::with_defaults(21);
        state.award_xp(450);
        state.score = 999;
        state.round = 6;
        let saved = state.progress();

        let mut resumed = GameState::with_defaults(22);
        resumed.restore(&saved);
        assert_eq!(resumed.player.xp, 450);
        assert_eq!(resumed.player.level, 5);
        assert_eq!(resumed.round, 6);
        assert_eq!(resumed.score, 999);
        assert_eq!(resumed.grid.kind(), saved.arena);
        assert_eq!(resumed.phase, GamePhase::Playing);
    }

    #[test]
    fn test_snapshot_hides_dead_enemies() {
        let mut state = GameState::with_defaults(5);
        state.enemies[0].lives = 0;
        let snap = state.snapshot();
        assert_eq!(snap.enemies.len(), 6);
        assert_eq!(snap.cells.len(), state.grid.cells().len());
    }

    #[test]
    fn test_level_milestones() {
        let mut state = GameState::with_defaults(5);
        state.drain_events();
        state.award_xp(900);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::LevelUp(10)));
        assert!(events.contains(&GameEvent::Milestone("LEVEL_10".into())));
    }
}
