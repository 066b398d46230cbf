//! Deterministic RNG wrappers for the courier planner's restart workers.
//!
//! # Determinism strategy
//!
//! Each restart worker gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (worker_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive worker IDs uniformly across the seed space.
//! This means:
//!
//! - Workers never share RNG state (no contention, no ordering dependency).
//! - The same global seed reproduces the same set of per-worker seeds
//!   regardless of how many worker threads actually run.
//! - All RNG calls are local to the owning thread; no synchronisation needed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── WorkerRng ─────────────────────────────────────────────────────────────────

/// Per-restart-worker deterministic RNG, used to drive the courier planner's
/// random restarts and simulated-annealing acceptance draws.
///
/// The type is `!Sync` to prevent accidental sharing across threads — each
/// parallel restart must hold its own instance.
pub struct WorkerRng(SmallRng);

impl WorkerRng {
    /// Seed deterministically from the run's global seed and a worker index.
    pub fn new(global_seed: u64, worker: u32) -> Self {
        let seed = global_seed ^ (worker as u64).wrapping_mul(MIXING_CONSTANT);
        WorkerRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]) — used for simulated
    /// annealing's `exp(-delta/temperature)` acceptance draw.
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }

    /// Choose a random element from a non-empty slice.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}

// ── PlannerRng ────────────────────────────────────────────────────────────────

/// Top-level RNG held by the courier planner before workers are spawned,
/// used only to derive [`WorkerRng`] seeds.
pub struct PlannerRng(SmallRng);

impl PlannerRng {
    pub fn new(seed: u64) -> Self {
        PlannerRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child seed for restart worker `worker`, mixed with a fresh
    /// draw from this RNG so that reseeding the planner changes every
    /// worker's behaviour even though the mixing constant is fixed.
    pub fn worker_seed(&mut self, worker: u32) -> u64 {
        self.0.r#gen::<u64>() ^ (worker as u64).wrapping_mul(MIXING_CONSTANT)
    }

    pub fn worker(&mut self, worker: u32) -> WorkerRng {
        WorkerRng(SmallRng::seed_from_u64(self.worker_seed(worker)))
    }
}
