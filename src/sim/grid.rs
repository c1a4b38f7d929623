//! Arena occupancy grid and its generators
//!
//! Walls are fixed at generation time. Jetwalls are stamped by moving actors
//! and persist until the grid is replaced at the next round.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize};

use super::actor::Position;
use crate::consts::*;

/// Seed used when a generator is asked for no particular seed
pub const DEFAULT_SEED: u64 = 0x5EED_CAFE;

/// State of a single cell. `Void` is only ever returned for out-of-bounds
/// queries on an open arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Wall,
    Jetwall,
    Void,
}

/// Named arena recipes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArenaKind {
    #[default]
    ClassicGrid,
    NeonMaze,
    OpenFrontier,
    Procedural,
}

impl ArenaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ArenaKind::ClassicGrid => "ClassicGrid",
            ArenaKind::NeonMaze => "NeonMaze",
            ArenaKind::OpenFrontier => "OpenFrontier",
            ArenaKind::Procedural => "Procedural",
        }
    }

    /// Resolve an arena name, accepting menu aliases and keywords
    pub fn from_name(name: &str) -> Option<Self> {
        let n = name.trim().to_uppercase();
        match n.as_str() {
            "CLASSICGRID" | "ARENA 1" => Some(ArenaKind::ClassicGrid),
            "NEONMAZE" | "ARENA 2" => Some(ArenaKind::NeonMaze),
            "OPENFRONTIER" | "ARENA 3" => Some(ArenaKind::OpenFrontier),
            "PROCEDURAL" | "RANDOM" => Some(ArenaKind::Procedural),
            _ if n.contains("CLASSIC") => Some(ArenaKind::ClassicGrid),
            _ if n.contains("NEON") => Some(ArenaKind::NeonMaze),
            _ if n.contains("OPEN") => Some(ArenaKind::OpenFrontier),
            _ => None,
        }
    }

    /// Like `from_name`, but unknown names fall back to the classic grid
    pub fn from_name_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            log::warn!("Unknown arena '{}', using {}", name, ArenaKind::default().as_str());
            ArenaKind::default()
        })
    }

    /// Serde hook for config and save files: any name `from_name_or_default` accepts
    pub fn deserialize_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name_or_default(&name))
    }

    /// Arena rotation between rounds
    pub fn for_round(round: u32) -> Self {
        match round % 4 {
            0 => ArenaKind::Procedural,
            1 => ArenaKind::ClassicGrid,
            2 => ArenaKind::NeonMaze,
            _ => ArenaKind::OpenFrontier,
        }
    }

    /// Open arenas have no border; leaving the grid is a fall-off
    pub fn is_open(self) -> bool {
        self == ArenaKind::OpenFrontier
    }
}

/// GRID_SIZE x GRID_SIZE occupancy grid, row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    kind: ArenaKind,
    seed: u64,
    cells: Vec<Cell>,
}

impl Grid {
    /// All-empty grid of the given kind (no generator applied)
    pub fn empty(kind: ArenaKind) -> Self {
        Self {
            kind,
            seed: DEFAULT_SEED,
            cells: vec![Cell::Empty; (GRID_SIZE * GRID_SIZE) as usize],
        }
    }

    /// Build an arena. Deterministic for a given kind and seed.
    pub fn generate(kind: ArenaKind, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or(DEFAULT_SEED);
        let mut grid = Self::empty(kind);
        grid.seed = seed;
        match kind {
            ArenaKind::ClassicGrid => grid.carve_classic(),
            ArenaKind::NeonMaze => grid.carve_neon_maze(),
            ArenaKind::OpenFrontier => {}
            ArenaKind::Procedural => grid.carve_procedural(seed),
        }
        log::debug!("Generated {} arena (seed {})", kind.as_str(), seed);
        grid
    }

    pub fn kind(&self) -> ArenaKind {
        self.kind
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_open(&self) -> bool {
        self.kind.is_open()
    }

    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        (0..GRID_SIZE).contains(&pos.row) && (0..GRID_SIZE).contains(&pos.col)
    }

    #[inline]
    fn index(pos: Position) -> usize {
        (pos.row * GRID_SIZE + pos.col) as usize
    }

    /// Cell state; out of bounds is `Wall` on bordered arenas, `Void` on open ones
    pub fn cell(&self, pos: Position) -> Cell {
        if self.in_bounds(pos) {
            self.cells[Self::index(pos)]
        } else if self.is_open() {
            Cell::Void
        } else {
            Cell::Wall
        }
    }

    pub fn is_wall(&self, pos: Position) -> bool {
        self.cell(pos) == Cell::Wall
    }

    pub fn is_jetwall(&self, pos: Position) -> bool {
        self.cell(pos) == Cell::Jetwall
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.cell(pos) == Cell::Empty
    }

    pub fn is_void(&self, pos: Position) -> bool {
        self.cell(pos) == Cell::Void
    }

    /// Wall, jetwall or void: anything an actor cannot enter
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.cell(pos) != Cell::Empty
    }

    /// Mark a cell as jetwall. Walls and out-of-bounds cells are left alone.
    pub fn place_jetwall(&mut self, pos: Position) {
        if !self.in_bounds(pos) {
            return;
        }
        let cell = &mut self.cells[Self::index(pos)];
        if *cell == Cell::Empty {
            *cell = Cell::Jetwall;
        }
    }

    /// Stamp jetwalls on every cell from `from` toward `to`, excluding `to`.
    /// Returns the number of cells visited.
    pub fn stamp_trail(&mut self, from: Position, to: Position) -> u32 {
        let mut cur = from;
        let mut stamped = 0;
        while cur != to {
            if !self.in_bounds(cur) {
                break;
            }
            self.place_jetwall(cur);
            stamped += 1;
            cur = Position::new(
                cur.row + (to.row - cur.row).signum(),
                cur.col + (to.col - cur.col).signum(),
            );
        }
        stamped
    }

    /// Count of jetwall cells (diagnostics)
    pub fn jetwall_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Jetwall).count()
    }

    /// Row-major copy of the cells for presentation
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn center() -> Position {
        Position::new(GRID_SIZE / 2, GRID_SIZE / 2)
    }

    /// Player spawn: the centre region on hand-built arenas, else random probing
    pub fn find_spawn(&self, seed: Option<u64>) -> Position {
        if self.kind != ArenaKind::Procedural {
            let mid = GRID_SIZE / 2;
            for row in mid - 1..=mid + 1 {
                for col in mid - 1..=mid + 1 {
                    let pos = Position::new(row, col);
                    if self.is_empty(pos) {
                        return pos;
                    }
                }
            }
        }
        let mut rng = Pcg32::seed_from_u64(seed.unwrap_or(self.seed));
        self.random_empty_cell(&mut rng, &[])
    }

    /// Probe random cells for an empty one not in `exclude`, falling back to the centre
    pub fn random_empty_cell<R: Rng>(&self, rng: &mut R, exclude: &[Position]) -> Position {
        for _ in 0..SPAWN_ATTEMPTS {
            let pos = Position::new(rng.random_range(0..GRID_SIZE), rng.random_range(0..GRID_SIZE));
            if self.is_empty(pos) && !exclude.contains(&pos) {
                return pos;
            }
        }
        log::debug!("Spawn search exhausted, using centre");
        Self::center()
    }

    fn set(&mut self, pos: Position, cell: Cell) {
        if self.in_bounds(pos) {
            self.cells[Self::index(pos)] = cell;
        }
    }

    fn wall_border(&mut self) {
        for i in 0..GRID_SIZE {
            self.set(Position::new(i, 0), Cell::Wall);
            self.set(Position::new(i, GRID_SIZE - 1), Cell::Wall);
            self.set(Position::new(0, i), Cell::Wall);
            self.set(Position::new(GRID_SIZE - 1, i), Cell::Wall);
        }
    }

    fn carve_classic(&mut self) {
        self.wall_border();
        // Two rows of wall posts forming loose corridors
        for col in (5..GRID_SIZE - 5).step_by(10) {
            self.set(Position::new(10, col), Cell::Wall);
            self.set(Position::new(GRID_SIZE - 11, col), Cell::Wall);
        }
    }

    fn carve_neon_maze(&mut self) {
        self.cells.fill(Cell::Wall);

        for row in (3..GRID_SIZE - 3).step_by(6) {
            for col in 1..GRID_SIZE - 1 {
                self.set(Position::new(row, col), Cell::Empty);
                if row + 1 < GRID_SIZE - 1 {
                    self.set(Position::new(row + 1, col), Cell::Empty);
                }
            }
        }
        for col in (4..GRID_SIZE - 4).step_by(8) {
            for row in 1..GRID_SIZE - 1 {
                self.set(Position::new(row, col), Cell::Empty);
                if col + 1 < GRID_SIZE - 1 {
                    self.set(Position::new(row, col + 1), Cell::Empty);
                }
            }
        }

        let far = GRID_SIZE - 12;
        for (row, col) in [(6, 6), (far, 6), (6, far), (far, far)] {
            self.carve_room(row, col, 6, 6);
        }

        self.wall_border();
    }

    fn carve_room(&mut self, top: i32, left: i32, height: i32, width: i32) {
        for row in top.max(1)..(top + height).min(GRID_SIZE - 1) {
            for col in left.max(1)..(left + width).min(GRID_SIZE - 1) {
                self.set(Position::new(row, col), Cell::Empty);
            }
        }
    }

    fn carve_procedural(&mut self, seed: u64) {
        let mut rng = Pcg32::seed_from_u64(seed);
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let border = row == 0 || col == 0 || row == GRID_SIZE - 1 || col == GRID_SIZE - 1;
                // Always draw so the pattern doesn't depend on border layout
                let wall = rng.random_bool(PROCEDURAL_WALL_CHANCE);
                if border || wall {
                    self.set(Position::new(row, col), Cell::Wall);
                }
            }
        }
        // Guaranteed corridor through the middle row
        let mid = GRID_SIZE / 2;
        for col in 1..GRID_SIZE - 1 {
            self.set(Position::new(mid, col), Cell::Empty);
        }
    }
}
