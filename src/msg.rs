//! Random test payloads.
//!
//! Payload RNGs run on their own ChaCha stream, so a payload generated with
//! the same seed as an encode never correlates with its row shuffle.

use bitvec::prelude::*;
use rand::RngCore;

use crate::codec::permute::{resolve_seed, seeded_rng};

/// ChaCha stream id reserved for payload generation.
pub const STREAM_PAYLOAD: u64 = 0x4D53_4721;

/// `n` uniformly random bytes.
pub fn generate_bytes(n: usize, seed: Option<u64>) -> Vec<u8> {
    let mut rng = seeded_rng(resolve_seed(seed), STREAM_PAYLOAD);
    let mut bytes = vec![0u8; n];
    rng.fill_bytes(&mut bytes);
    bytes
}

/// `8 * n_bytes` uniformly random bits, most significant bit first.
pub fn generate_bits(n_bytes: usize, seed: Option<u64>) -> BitVec<u8, Msb0> {
    BitVec::from_vec(generate_bytes(n_bytes, seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::SeededPermutation;

    #[test]
    fn test_generate_is_deterministic() {
        assert_eq!(generate_bytes(64, Some(3)), generate_bytes(64, Some(3)));
        assert_ne!(generate_bytes(64, Some(3)), generate_bytes(64, Some(4)));
        assert_eq!(generate_bytes(0, None), Vec::<u8>::new());
    }

    #[test]
    fn test_bits_match_bytes() {
        let bits = generate_bits(5, Some(9));
        assert_eq!(bits.len(), 40);
        assert_eq!(bits.as_raw_slice(), generate_bytes(5, Some(9)).as_slice());
    }

    #[test]
    fn test_stream_is_independent_of_shuffle() {
        // Same seed, different streams: the bytes are not the shuffle's
        // first draws reinterpreted.
        let perm = SeededPermutation::new(256, 7);
        let bytes = generate_bytes(256, Some(7));
        let as_perm: Vec<usize> = bytes.iter().map(|&b| b as usize).collect();
        assert_ne!(perm.forward(), as_perm.as_slice());
    }
}
