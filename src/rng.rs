//! Deterministic RNG Provider
//!
//! A seed string fully determines the draw sequence. The generator is a
//! plain value handed by `&mut` from stage to stage; nothing is global.

use rand::rngs::{OsRng, StdRng};
use rand::{Rng, RngCore, SeedableRng};
use sha2::{Digest, Sha256};

use crate::error::{IconError, IconResult};

/// Bytes of OS entropy behind a generated seed.
pub const DEFAULT_SEED_LEN: usize = 16;

pub struct SeedRng {
    inner: StdRng,
    draws: u32,
}

impl SeedRng {
    /// Seed the generator with the SHA-256 digest of `seed`.
    pub fn new(seed: &str) -> Self {
        let digest: [u8; 32] = Sha256::digest(seed.as_bytes()).into();
        Self {
            inner: StdRng::from_seed(digest),
            draws: 0,
        }
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.draws += 1;
        self.inner.gen::<f64>()
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> u32 {
        self.draws
    }
}

/// Fresh hex seed from the operating system's secure source.
pub fn random_seed() -> IconResult<String> {
    let mut buf = [0u8; DEFAULT_SEED_LEN];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| IconError::RandomSource(e.to_string()))?;
    Ok(hex::encode(buf))
}

/// Render a draw as the string seed handed to the color generator.
pub fn seed_string(value: f64) -> String {
    value.to_string()
}
