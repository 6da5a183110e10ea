//! Random sources for stat rolls, enemy generation and skill chances.
//!
//! Everything that must be reproducible (enemies derived from a floor and a
//! guild seed, battle skill rolls) goes through [`LehmerRng`]. Fresh
//! characters pulled by players use the thread-local CSPRNG instead, via
//! [`UnseededRng`].
//!
//! # Determinism
//!
//! Given the same seed string, [`LehmerRng`] yields the same sequence on every
//! platform. Enemy generation creates a *new* generator from the seed for each
//! concern (stats, skills, candidate pick), so retries never drift.

use sha2::{Digest, Sha256};

/// Source of uniform floats in `[0, 1)`.
pub trait RandomSource {
    fn next_float(&mut self) -> f64;

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize {
        let index = (self.next_float() * len as f64).floor() as usize;
        index.min(len.saturating_sub(1))
    }

    /// Percentage roll in `1..=100`.
    fn roll_percent(&mut self) -> u32 {
        self.pick_index(100) as u32 + 1
    }
}

/// Lehmer / Park-Miller "MINSTD" linear congruential generator.
///
/// `state' = state × 48271 mod (2^31 − 1)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LehmerRng {
    state: u64,
}

impl LehmerRng {
    const MULTIPLIER: u64 = 48_271;
    const MODULUS: u64 = 2_147_483_647;

    /// Creates a generator whose state is derived from `seed` by SHA-256.
    pub fn new(seed: &str) -> Self {
        let digest = Sha256::digest(seed.as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        Self::from_state(u64::from_le_bytes(head))
    }

    /// Creates a generator from a raw numeric state.
    ///
    /// The state is folded into `[1, 2^31 − 2]`; zero would lock the sequence.
    pub fn from_state(state: u64) -> Self {
        Self {
            state: state % (Self::MODULUS - 1) + 1,
        }
    }

    /// Advances the generator and returns the next state in `[1, 2^31 − 2]`.
    #[inline]
    pub fn next_int(&mut self) -> u32 {
        self.state = (self.state * Self::MULTIPLIER) % Self::MODULUS;
        self.state as u32
    }
}

impl RandomSource for LehmerRng {
    fn next_float(&mut self) -> f64 {
        (self.next_int() - 1) as f64 / (Self::MODULUS - 1) as f64
    }
}

/// Non-reproducible source backed by `rand::thread_rng` (ChaCha CSPRNG).
#[derive(Clone, Copy, Debug, Default)]
pub struct UnseededRng;

impl RandomSource for UnseededRng {
    fn next_float(&mut self) -> f64 {
        rand::random::<f64>()
    }
}
