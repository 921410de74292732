//! Seeded row permutation.
//!
//! Encoders shuffle the assembled edge list once; decoders regenerate the
//! same permutation from `(row count, seed)` and apply its inverse before
//! reading any symbol.
//!
//! The Fisher-Yates shuffle draws indices as `u32` whenever the row count
//! allows it, so a seed produces the same permutation on 32-bit and 64-bit
//! targets.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::DEFAULT_SEED;

/// ChaCha stream id reserved for row shuffles.
pub const STREAM_PERMUTE: u64 = 0x5045_524D;

/// Replaces a missing or zero seed with [`DEFAULT_SEED`].
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    match seed {
        None | Some(0) => DEFAULT_SEED,
        Some(seed) => seed,
    }
}

/// Builds the RNG for one operation: seeded from `seed`, on its own stream.
pub fn seeded_rng(seed: u64, stream: u64) -> ChaCha20Rng {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    rng.set_stream(stream);
    rng
}

/// A permutation of `0..n` and its inverse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededPermutation {
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl SeededPermutation {
    /// Generates the permutation for `n` rows under `seed`.
    pub fn new(n: usize, seed: u64) -> Self {
        let forward = shuffle(n, seed);
        let inverse = inverse(&forward);
        Self { forward, inverse }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Whether the permutation is empty.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Forward mapping: output position `i` takes input row `forward()[i]`.
    pub fn forward(&self) -> &[usize] {
        &self.forward
    }

    /// Inverse mapping.
    pub fn inverse(&self) -> &[usize] {
        &self.inverse
    }

    /// Shuffles `rows` into stego order.
    pub fn scramble<T>(&self, rows: Vec<T>) -> Vec<T> {
        apply(&self.forward, rows)
    }

    /// Restores assembly order from stego order.
    pub fn unscramble<T>(&self, rows: Vec<T>) -> Vec<T> {
        apply(&self.inverse, rows)
    }
}

/// Deterministic permutation of `0..n` for `seed`.
pub fn shuffle(n: usize, seed: u64) -> Vec<usize> {
    let mut rng = seeded_rng(seed, STREAM_PERMUTE);
    let mut indices: Vec<usize> = (0..n).collect();
    let portable = u32::try_from(n).is_ok();

    for i in (1..n).rev() {
        let j = if portable {
            rng.gen_range(0..=(i as u32)) as usize
        } else {
            rng.gen_range(0..=(i as u64)) as usize
        };
        indices.swap(i, j);
    }
    indices
}

/// Inverse of a permutation: `inverse[perm[i]] == i`.
pub fn inverse(perm: &[usize]) -> Vec<usize> {
    let mut inv = vec![0; perm.len()];
    for (i, &p) in perm.iter().enumerate() {
        inv[p] = i;
    }
    inv
}

/// Reorders `rows` so that output position `i` holds `rows[perm[i]]`.
///
/// # Panics
/// Panics if `perm` is not a permutation of `0..rows.len()`.
pub fn apply<T>(perm: &[usize], rows: Vec<T>) -> Vec<T> {
    assert_eq!(perm.len(), rows.len(), "permutation length mismatch");
    let mut slots: Vec<Option<T>> = rows.into_iter().map(Some).collect();
    perm.iter()
        .map(|&p| slots[p].take().expect("index used twice in permutation"))
        .collect()
}
