//! Difficulty bands and per-round enemy draws

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};

use super::actor::{Archetype, Enemy, Position};
use super::grid::Grid;
use crate::templates::EnemyTemplate;

/// Difficulty label, easiest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    Impossible,
}

/// Stat scaling applied to drawn enemies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatMultipliers {
    pub speed: f32,
    pub handling: f32,
    pub aggression: f32,
}

impl Difficulty {
    /// Banded by round: 1-3, 4-7, 8-12, 13+
    pub fn for_round(round: u32) -> Self {
        match round {
            0..=3 => Difficulty::Easy,
            4..=7 => Difficulty::Medium,
            8..=12 => Difficulty::Hard,
            _ => Difficulty::Impossible,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Impossible => "Impossible",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "impossible" => Some(Difficulty::Impossible),
            _ => None,
        }
    }

    /// Draw weights in `Archetype::ALL` order (Koura, Sark, Rinzler, Clu)
    pub fn archetype_weights(self) -> [u32; 4] {
        match self {
            Difficulty::Easy => [80, 15, 5, 0],
            Difficulty::Medium => [40, 35, 20, 5],
            Difficulty::Hard => [15, 30, 35, 20],
            Difficulty::Impossible => [5, 15, 35, 45],
        }
    }

    pub fn multipliers(self) -> StatMultipliers {
        let (speed, handling, aggression) = match self {
            Difficulty::Easy => (1.0, 1.0, 1.0),
            Difficulty::Medium => (1.2, 1.1, 1.0),
            Difficulty::Hard => (1.5, 1.4, 1.3),
            Difficulty::Impossible => (1.8, 1.8, 1.6),
        };
        StatMultipliers {
            speed,
            handling,
            aggression,
        }
    }
}

/// Draw `count` enemies for a round.
///
/// Archetypes missing from `templates` are skipped with a warning, so the
/// roster can come back short. Spawn cells avoid `reserved` and each other.
pub fn draw_roster<R: Rng>(
    templates: &[EnemyTemplate],
    difficulty: Difficulty,
    count: u32,
    grid: &Grid,
    reserved: &[Position],
    first_id: u32,
    rng: &mut R,
) -> Vec<Enemy> {
    let weights = match WeightedIndex::new(difficulty.archetype_weights()) {
        Ok(w) => w,
        Err(e) => {
            log::warn!("No archetype weights for {}: {}", difficulty.as_str(), e);
            return Vec::new();
        }
    };
    let scale = difficulty.multipliers();
    let mut taken: Vec<Position> = reserved.to_vec();
    let mut enemies = Vec::new();

    for _ in 0..count {
        let archetype = Archetype::ALL[weights.sample(rng)];
        let Some(template) = templates.iter().find(|t| t.archetype == archetype) else {
            log::warn!("No template for {}, skipping draw", archetype.as_str());
            continue;
        };

        let pos = grid.random_empty_cell(rng, &taken);
        taken.push(pos);

        let mut enemy = Enemy::new(first_id + enemies.len() as u32, archetype, pos);
        enemy.color = template.color.clone();
        enemy.speed = template.speed * scale.speed;
        enemy.handling = template.handling * scale.handling;
        enemy.aggression = template.aggression * scale.aggression;
        enemy.xp_reward = template.xp_reward;
        enemies.push(enemy);
    }

    log::debug!(
        "Drew {} of {} enemies at {}",
        enemies.len(),
        count,
        difficulty.as_str()
    );
    enemies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::ArenaKind;
    use crate::templates::default_enemy_templates;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_difficulty_bands() {
        assert_eq!(Difficulty::for_round(1), Difficulty::Easy);
        assert_eq!(Difficulty::for_round(3), Difficulty::Easy);
        assert_eq!(Difficulty::for_round(4), Difficulty::Medium);
        assert_eq!(Difficulty::for_round(7), Difficulty::Medium);
        assert_eq!(Difficulty::for_round(8), Difficulty::Hard);
        assert_eq!(Difficulty::for_round(13), Difficulty::Impossible);
        assert_eq!(Difficulty::from_name("HARD"), Some(Difficulty::Hard));
    }

    #[test]
    fn test_roster_size_and_spawns() {
        let grid = Grid::generate(ArenaKind::ClassicGrid, None);
        let spawn = grid.find_spawn(None);
        let mut rng = Pcg32::seed_from_u64(5);
        let enemies = draw_roster(&default_enemy_templates(), Difficulty::Hard, 7, &grid, &[spawn], 10, &mut rng);
        assert_eq!(enemies.len(), 7);
        for (i, enemy) in enemies.iter().enumerate() {
            assert_eq!(enemy.id, 10 + i as u32);
            assert!(grid.is_empty(enemy.pos));
            assert_ne!(enemy.pos, spawn);
        }
        let mut cells: Vec<_> = enemies.iter().map(|e| (e.pos.row, e.pos.col)).collect();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), 7);
    }

    #[test]
    fn test_easy_never_draws_clu() {
        let grid = Grid::generate(ArenaKind::OpenFrontier, None);
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..20 {
            let enemies = draw_roster(&default_enemy_templates(), Difficulty::Easy, 7, &grid, &[], 1, &mut rng);
            assert!(enemies.iter().all(|e| e.archetype != Archetype::Clu));
        }
    }

    #[test]
    fn test_missing_templates_skip_draws() {
        let grid = Grid::generate(ArenaKind::ClassicGrid, None);
        let only_koura: Vec<_> = default_enemy_templates()
            .into_iter()
            .filter(|t| t.archetype == Archetype::Koura)
            .collect();
        let mut rng = Pcg32::seed_from_u64(2);
        let enemies = draw_roster(&only_koura, Difficulty::Impossible, 7, &grid, &[], 1, &mut rng);
        assert!(enemies.len() < 7);
        assert!(enemies.iter().all(|e| e.archetype == Archetype::Koura));

        let none = draw_roster(&[], Difficulty::Easy, 7, &grid, &[], 1, &mut rng);
        assert!(none.is_empty());
    }

    #[test]
    fn test_multipliers_applied() {
        let grid = Grid::generate(ArenaKind::ClassicGrid, None);
        let mut rng = Pcg32::seed_from_u64(4);
        let templates = default_enemy_templates();
        let enemies = draw_roster(&templates, Difficulty::Impossible, 7, &grid, &[], 1, &mut rng);
        for enemy in &enemies {
            let base = templates.iter().find(|t| t.archetype == enemy.archetype).map(|t| t.speed);
            assert_eq!(base.map(|s| s * 1.8), Some(enemy.speed));
        }
    }
}
