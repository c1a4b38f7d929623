//! Fixed-timestep driver
//!
//! Wall-clock frame deltas go into an accumulator; the simulation runs as
//! many whole ticks as fit, capped per frame to prevent a spiral of death.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone)]
pub struct FixedTimestep {
    accumulator: f32,
    dt: f32,
    max_substeps: u32,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(SIM_DT)
    }
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            accumulator: 0.0,
            dt,
            max_substeps: MAX_SUBSTEPS,
        }
    }

    /// Seconds per tick
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Feed a frame delta and run `step` once per whole tick. Returns the
    /// number of ticks run.
    pub fn advance<F: FnMut(f32)>(&mut self, frame_dt: f32, mut step: F) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < self.max_substeps {
            step(self.dt);
            self.accumulator -= self.dt;
            substeps += 1;
        }
        substeps
    }

    /// Fraction of a tick left over (for render interpolation)
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.dt).clamp(0.0, 1.0)
    }
}
