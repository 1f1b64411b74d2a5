//! Commit/prove/verify facade shared by the ingest task and readers.
//!
//! Locking: the accumulator sits behind a mutex that is held for the whole of
//! `add_header`, including tree construction and registration, so the flush
//! decision and the registry append are one step. The registry write lock is
//! only ever taken while that mutex is held. Readers take the registry read
//! lock just long enough to clone an `Arc` out.
//!
//! Tree construction runs inline; a large batch stalls the next header until
//! the tree is built.

use std::num::NonZeroUsize;
use std::sync::Arc;

use blockseal_core::{CommitterConfig, ConfigError, Digest, Header};
use blockseal_merkle::{MerkleTree, Proof};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use crate::accumulator::BatchAccumulator;
use crate::error::CommitError;
use crate::registry::{CommittedTree, TreeRegistry};

/// Returned by `add_header` when it completed a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommitReceipt {
    /// Sequence index of the new tree.
    pub sequence: usize,
    /// Its root.
    pub root: Digest,
    /// Height of the batch's first header.
    pub first_number: u64,
    /// Height of the batch's last header.
    pub last_number: u64,
}

/// Outcome of a proof request.
///
/// `Found` with an empty proof is valid (one-leaf tree) and is not the same
/// thing as `NotFound`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProofLookup {
    /// Header is committed.
    Found {
        /// Tree holding the header.
        sequence: usize,
        /// Leaf position in that tree.
        leaf_index: usize,
        /// That tree's root.
        root: Digest,
        /// Sibling path to the root.
        proof: Proof,
    },
    /// No registered tree contains the header.
    NotFound,
}

impl ProofLookup {
    /// `true` for `Found`.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// The proof, if found.
    #[must_use]
    pub const fn proof(&self) -> Option<&Proof> {
        match self {
            Self::Found { proof, .. } => Some(proof),
            Self::NotFound => None,
        }
    }
}

/// Owns the working buffer and the tree registry.
#[derive(Debug)]
pub struct HeaderCommitter {
    batch_size: NonZeroUsize,
    pending: Mutex<BatchAccumulator>,
    registry: RwLock<TreeRegistry>,
}

impl HeaderCommitter {
    /// Build from config; a zero batch size is rejected.
    pub fn new(cfg: &CommitterConfig) -> Result<Self, ConfigError> {
        let batch_size = cfg.batch_size()?;
        Ok(Self {
            batch_size,
            pending: Mutex::new(BatchAccumulator::new(batch_size)),
            registry: RwLock::new(TreeRegistry::new()),
        })
    }

    /// Shorthand for `new(&CommitterConfig::with_batch_size(n))`.
    pub fn with_batch_size(batch_size: usize) -> Result<Self, ConfigError> {
        Self::new(&CommitterConfig::with_batch_size(batch_size))
    }

    /// Buffer `header`; when that fills a batch, build its tree, register it
    /// and clear the buffer before returning.
    pub fn add_header(&self, header: Header) -> Result<Option<CommitReceipt>, CommitError> {
        let mut pending = self.pending.lock();
        let Some(batch) = pending.push(header)? else {
            return Ok(None);
        };

        let tree = MerkleTree::from_leaves(&batch.leaves)?;
        let receipt = CommitReceipt {
            sequence: batch.sequence,
            root: tree.root(),
            first_number: batch.first_number(),
            last_number: batch.last_number(),
        };
        let entry = CommittedTree::new(
            batch.sequence,
            receipt.first_number,
            receipt.last_number,
            tree,
        );
        self.registry.write().append(entry)?;
        drop(pending);

        info!(
            sequence = receipt.sequence,
            root = %hex::encode(receipt.root),
            first = receipt.first_number,
            last = receipt.last_number,
            "committed batch"
        );
        Ok(Some(receipt))
    }

    /// Tree at `sequence`, if registered.
    #[must_use]
    pub fn get_tree(&self, sequence: usize) -> Option<Arc<CommittedTree>> {
        self.registry.read().get_tree(sequence)
    }

    /// Oldest registered tree containing `leaf`.
    #[must_use]
    pub fn find_tree_containing(&self, leaf: &Digest) -> Option<Arc<CommittedTree>> {
        self.registry.read().find_tree_containing(leaf)
    }

    /// Inclusion proof for `header` against the tree it was committed into.
    #[must_use]
    pub fn generate_proof(&self, header: &Header) -> ProofLookup {
        let Ok(leaf) = header.leaf_value() else {
            debug!(number = header.number, "proof requested for malformed header");
            return ProofLookup::NotFound;
        };
        let Some(entry) = self.find_tree_containing(&leaf) else {
            debug!(number = header.number, "header not committed");
            return ProofLookup::NotFound;
        };
        let tree = entry.tree();
        let Some((leaf_index, proof)) = tree
            .position(&leaf)
            .and_then(|i| tree.open(i).map(|p| (i, p)))
        else {
            return ProofLookup::NotFound;
        };
        ProofLookup::Found {
            sequence: entry.sequence(),
            leaf_index,
            root: entry.root(),
            proof,
        }
    }

    /// `true` iff `proof` folds `header`'s leaf into the root of the tree that
    /// header was committed into.
    ///
    /// A missing tree, a malformed header and a wrong proof all give `false`.
    #[must_use]
    pub fn verify_proof(&self, proof: &Proof, header: &Header) -> bool {
        let Ok(leaf) = header.leaf_value() else {
            return false;
        };
        self.find_tree_containing(&leaf)
            .is_some_and(|entry| entry.tree().verify(&leaf, proof))
    }

    /// Configured batch size.
    #[must_use]
    pub const fn batch_size(&self) -> NonZeroUsize {
        self.batch_size
    }

    /// Headers buffered but not yet committed; always below `batch_size`.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Registered tree count.
    #[must_use]
    pub fn tree_count(&self) -> usize {
        self.registry.read().len()
    }

    /// Snapshot of every registered tree, oldest first.
    #[must_use]
    pub fn trees(&self) -> Vec<Arc<CommittedTree>> {
        self.registry.read().iter().cloned().collect()
    }
}
