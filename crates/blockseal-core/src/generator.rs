//! Tiny synthetic chain generator used by the CLI `simulate` subcommand,
//! the benchmark harness and tests.

use blake3::Hasher;
use rand::{rngs::StdRng, RngCore as _, SeedableRng};

use crate::digest::{to_prefixed_hex, Digest};
use crate::Header;

/// Generate `count` linked headers starting at height 0.
///
/// - state/extrinsics roots are random (seeded, so reproducible),
/// - `hash` = BLAKE3(number ‖ parent ‖ state_root ‖ extrinsics_root),
/// - genesis has an all-zero parent.
#[must_use]
pub fn generate_headers(count: u64, seed: u64) -> Vec<Header> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut parent: Digest = [0u8; 32];
    let mut out = Vec::with_capacity(usize::try_from(count).unwrap_or(0));

    for number in 0..count {
        let mut state_root = [0u8; 32];
        let mut extrinsics_root = [0u8; 32];
        rng.fill_bytes(&mut state_root);
        rng.fill_bytes(&mut extrinsics_root);

        let mut h = Hasher::new();
        h.update(&number.to_le_bytes());
        h.update(&parent);
        h.update(&state_root);
        h.update(&extrinsics_root);
        let hash = *h.finalize().as_bytes();

        out.push(Header {
            number,
            hash: to_prefixed_hex(&hash),
            parent_hash: to_prefixed_hex(&parent),
            state_root: to_prefixed_hex(&state_root),
            extrinsics_root: to_prefixed_hex(&extrinsics_root),
        });
        parent = hash;
    }
    out
}
