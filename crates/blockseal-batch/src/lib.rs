//! blockseal-batch: commit headers in fixed-size batches and prove inclusion.
//!
//! ```
//! use blockseal_batch::{HeaderCommitter, ProofLookup};
//! use blockseal_core::generate_headers;
//!
//! let committer = HeaderCommitter::with_batch_size(2)?;
//! let headers = generate_headers(4, 1);
//! for h in &headers {
//!     committer.add_header(h.clone()).expect("well-formed header");
//! }
//! assert_eq!(committer.tree_count(), 2);
//!
//! let ProofLookup::Found { proof, sequence, .. } = committer.generate_proof(&headers[2]) else {
//!     panic!("header 2 was committed");
//! };
//! assert_eq!(sequence, 1);
//! assert!(committer.verify_proof(&proof, &headers[2]));
//! # Ok::<(), blockseal_core::ConfigError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![deny(missing_docs)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

/// Arrival-ordered working buffer that cuts full batches.
pub mod accumulator;
/// Thread-safe commit/prove/verify facade.
pub mod committer;
/// Error types for the commit path.
pub mod error;
/// Append-only, sequence-indexed collection of finalized trees.
pub mod registry;

pub use accumulator::{Batch, BatchAccumulator};
pub use committer::{CommitReceipt, HeaderCommitter, ProofLookup};
pub use error::{CommitError, RegistryError};
pub use registry::{CommittedTree, TreeRegistry};
