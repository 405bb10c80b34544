//! Fixed-timestep accumulator.

use bevy::log::warn;

use super::config::TimingConfig;

/// Turns variable frame deltas into a whole number of fixed ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedStepClock {
    fixed_dt: f64,
    max_frame_dt: f64,
    accumulator: f64,
    paused: bool,
    pending_steps: u32,
}

impl FixedStepClock {
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            fixed_dt: timing.fixed_dt,
            max_frame_dt: timing.max_frame_dt,
            accumulator: 0.0,
            paused: false,
            pending_steps: 0,
        }
    }

    pub fn fixed_dt(&self) -> f64 {
        self.fixed_dt
    }

    /// Adds a frame's elapsed time and returns how many ticks are due.
    ///
    /// Stalls longer than `max_frame_dt` are clamped. While paused, only
    /// ticks requested through [`step_once`](Self::step_once) are due.
    pub fn accumulate(&mut self, frame_dt: f64) -> u32 {
        if self.paused {
            return std::mem::take(&mut self.pending_steps);
        }
        if !(self.fixed_dt > 0.0) {
            return 0;
        }

        let mut frame_dt = frame_dt.max(0.0);
        if frame_dt > self.max_frame_dt {
            warn!(
                "Frame took {:.3}s, clamping catch-up to {:.3}s",
                frame_dt, self.max_frame_dt
            );
            frame_dt = self.max_frame_dt;
        }
        self.accumulator += frame_dt;

        let mut ticks = 0;
        while self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            ticks += 1;
        }
        ticks
    }

    /// Leftover fraction of a tick, for render interpolation.
    pub fn alpha(&self) -> f64 {
        if self.fixed_dt > 0.0 {
            self.accumulator / self.fixed_dt
        } else {
            0.0
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        self.pending_steps = 0;
        if paused {
            self.accumulator = 0.0;
        }
    }

    /// Allows exactly one tick on the next accumulate while paused.
    pub fn step_once(&mut self) {
        if self.paused {
            self.pending_steps += 1;
        }
    }
}
