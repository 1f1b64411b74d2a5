//! Error types for the commit path.

use blockseal_core::HeaderError;
use blockseal_merkle::TreeError;
use thiserror::Error;

/// Registry append that would break sequence order.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Trees must arrive as 0, 1, 2, … with no gaps.
    #[error("out-of-order tree: expected sequence {expected}, got {got}")]
    OutOfOrder {
        /// Next sequence the registry accepts.
        expected: usize,
        /// Sequence that was offered.
        got: usize,
    },
}

/// Failure of `HeaderCommitter::add_header`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommitError {
    /// Header rejected before buffering.
    #[error(transparent)]
    Header(#[from] HeaderError),

    /// Tree construction failed.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Registry refused the new tree.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
