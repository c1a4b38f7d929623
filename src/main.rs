//! Light Cycles headless driver
//!
//! Runs the fixed-step loop against a scripted autopilot and logs how the
//! run went. Usage: `light-cycles [seed] [config.json]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use light_cycles::consts::*;
    use light_cycles::sim::{
        Direction, FixedTimestep, GameEvent, GamePhase, GameState, Player, PlayerCharacter, Position, TickInput,
    };
    use light_cycles::templates::default_enemy_templates;
    use light_cycles::{GameConfig, HighScores};

    /// Simulated wall-clock frame (a slightly uneven 60 fps)
    const FRAME_DT: f32 = 0.017;
    /// Give up after this many simulated seconds
    const MAX_SECONDS: f32 = 600.0;
    /// Stop once this many rounds are cleared
    const MAX_ROUNDS: u32 = 12;

    pub fn run() {
        env_logger::init();

        let mut args = std::env::args().skip(1);
        let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0xC0FFEE);
        let config = match args.next() {
            Some(path) => match std::fs::read_to_string(&path) {
                Ok(json) => GameConfig::from_json_or_default(&json),
                Err(e) => {
                    log::warn!("Could not read {}: {}", path, e);
                    GameConfig::default()
                }
            },
            None => GameConfig::default(),
        };

        log::info!("Light Cycles (headless) starting, seed {}", seed);
        let mut state = GameState::new(seed, Player::new(PlayerCharacter::Tron), config, default_enemy_templates());
        let mut clock = FixedTimestep::default();
        let mut elapsed = 0.0;
        log::debug!("Tick {:.4}s, frame {:.4}s", clock.dt(), FRAME_DT);

        while elapsed < MAX_SECONDS {
            elapsed += FRAME_DT;
            clock.advance(FRAME_DT, |dt| {
                let input = autopilot(&state);
                state.tick(&input, dt);
            });

            for event in state.drain_events() {
                match event {
                    GameEvent::Milestone(key) => log::info!("Milestone {}", key),
                    GameEvent::RoundStarted { round, .. } => {
                        log::debug!("Round {} with {} enemies", round, state.living_enemies())
                    }
                    GameEvent::EnemyDerezzed { id, by_wall, xp } => {
                        log::debug!("Enemy {} down (wall: {}, +{} xp)", id, by_wall, xp)
                    }
                    _ => {}
                }
            }

            match state.phase {
                GamePhase::GameOver => break,
                _ if state.round > MAX_ROUNDS => break,
                _ => {}
            }
        }

        let mut board = HighScores::new();
        let rank = board.add_entry(&state.player.name, state.player.level, state.score, 0.0);
        log::info!(
            "Finished: round {} ({:?}), level {}, score {}, rank {:?}",
            state.round,
            state.phase,
            state.player.level,
            state.score,
            rank
        );
        match state.progress().to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => log::warn!("Could not serialize progress: {}", e),
        }
    }

    /// Keep to the longest open lane; throw when an enemy lines up ahead
    fn autopilot(state: &GameState) -> TickInput {
        if state.phase == GamePhase::RoundWin {
            return TickInput {
                advance_round: true,
                ..Default::default()
            };
        }

        let here = state.player.cell;
        let heading = state.player.heading;
        let lane = |dir: Direction| {
            let mut cell = here.step(dir);
            let mut run = 0;
            while run < GRID_SIZE && state.grid.is_empty(cell) {
                run += 1;
                cell = cell.step(dir);
            }
            run
        };

        let best = [heading, heading.turn_left(), heading.turn_right()]
            .into_iter()
            .max_by_key(|dir| lane(*dir))
            .unwrap_or(heading);
        // Only turn when the current lane is about to close
        let steer = if lane(heading) > 2 { heading } else { best };

        let throw = state.enemies.iter().any(|e| in_line(here, steer, e.pos));
        TickInput {
            steer: Some(steer),
            throw,
            ..Default::default()
        }
    }

    fn in_line(from: Position, dir: Direction, target: Position) -> bool {
        let (dr, dc) = dir.delta();
        let (tr, tc) = (target.row - from.row, target.col - from.col);
        let reach = 3;
        if dir.is_vertical() {
            tc == 0 && tr.signum() == dr && tr.abs() <= reach
        } else {
            tr == 0 && tc.signum() == dc && tc.abs() <= reach
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is a library on the web; there is no headless driver
}
