// crates/blockseal-merkle/src/lib.rs

//! Binary Merkle trees over one batch of header leaf values.
//!
//! - Level 0 is the leaf sequence in arrival order.
//! - Adjacent nodes pair left-to-right; an odd level pairs its last node with
//!   itself.
//! - Parent = BLAKE3(left ‖ right), never sorted, so every proof step records
//!   which side its sibling sits on.
//! - All layers are kept, so openings are lookups rather than rebuilds.
//!
//! Proof documents and commit manifests (JSON/CBOR) live in [`io`].

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

/// Proof documents and commit manifests.
pub mod io;
/// Tagged sibling paths and the fold that checks them.
pub mod proof;
/// Layered tree construction and openings.
pub mod tree;

pub use io::{CommitManifest, ProofDocument, TreeSummary, MANIFEST_VERSION, PROOF_VERSION};
pub use proof::{fold_proof, Proof, ProofStep, Side};
pub use tree::{MerkleTree, TreeError};
