//! Seeded linear congruential generator.
//!
//! `state = (state * 1103515245 + 12345) mod 2^31`, output `state / 2^31`.
//! Reproduced bit-for-bit so layouts match across implementations.

use crate::constants::LEVEL_SEED_MULTIPLIER;

pub const LCG_MULTIPLIER: u64 = 1_103_515_245;
pub const LCG_INCREMENT: u64 = 12_345;
pub const LCG_MODULUS: u64 = 1 << 31;

/// One application of the recurrence. Also used to evolve the game seed between levels.
pub fn advance_seed(seed: u32) -> u32 {
    ((seed as u64 * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS) as u32
}

/// Seed for the per-level stream: the global seed offset by `level * 7919`.
pub fn level_seed(seed: u32, level: u32) -> u32 {
    ((seed as u64 + level as u64 * LEVEL_SEED_MULTIPLIER as u64) % LCG_MODULUS) as u32
}

#[derive(Debug, Clone)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Lcg {
            state: (seed as u64 % LCG_MODULUS) as u32,
        }
    }

    pub fn for_level(seed: u32, level: u32) -> Self {
        Self::new(level_seed(seed, level))
    }

    /// Next value in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.state = advance_seed(self.state);
        self.state as f64 / LCG_MODULUS as f64
    }

    pub fn next_f32(&mut self) -> f32 {
        self.next_f64() as f32
    }

    /// Uniform integer in [0, upper_bound). Returns 0 when `upper_bound` is 0.
    pub fn next_int(&mut self, upper_bound: u32) -> u32 {
        let v = (self.next_f64() * upper_bound as f64) as u32;
        v.min(upper_bound.saturating_sub(1))
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}
