//! Per-simulation context threaded through the systems that need it.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Toggles for diagnostics. Observers read these; systems only log more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DebugFlags {
    /// Log every AI state transition at `debug` level.
    pub trace_ai: bool,
    /// Overlays may draw hitboxes and hurtboxes.
    pub show_hitboxes: bool,
}

/// Time scale, debug flags and the seeded RNG.
#[derive(Debug, Clone)]
pub struct SimContext {
    /// Multiplies the dt fed to systems; below 1 is slow motion.
    pub time_scale: f64,
    pub debug: DebugFlags,
    pub rng: StdRng,
    seed: u64,
}

impl SimContext {
    pub fn new(seed: u64) -> Self {
        Self {
            time_scale: 1.0,
            debug: DebugFlags::default(),
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restarts the RNG stream from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
    }
}

impl Default for SimContext {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SimContext::new(7);
        let mut b = SimContext::new(7);
        let xs: Vec<u32> = (0..4).map(|_| a.rng.gen()).collect();
        let ys: Vec<u32> = (0..4).map(|_| b.rng.gen()).collect();
        assert_eq!(xs, ys);

        b.reseed(7);
        assert_eq!(b.rng.gen::<u32>(), xs[0]);
        assert_eq!(b.seed(), 7);
    }
}
