//! Append-only list of finalized trees, indexed by sequence.
//!
//! Entries are `Arc`-shared and immutable, so a reader can hold one after the
//! registry lock is released. Nothing is ever removed (retention is unbounded).

use std::sync::Arc;

use blockseal_core::Digest;
use blockseal_merkle::MerkleTree;

use crate::error::RegistryError;

/// A registered tree plus the header range it covers.
#[derive(Debug)]
pub struct CommittedTree {
    sequence: usize,
    first_number: u64,
    last_number: u64,
    tree: MerkleTree,
}

impl CommittedTree {
    /// Bundle a finalized tree with its batch metadata.
    #[must_use]
    pub fn new(sequence: usize, first_number: u64, last_number: u64, tree: MerkleTree) -> Self {
        Self {
            sequence,
            first_number,
            last_number,
            tree,
        }
    }

    /// Sequence index.
    #[must_use]
    pub const fn sequence(&self) -> usize {
        self.sequence
    }

    /// Height of the batch's first header.
    #[must_use]
    pub const fn first_number(&self) -> u64 {
        self.first_number
    }

    /// Height of the batch's last header.
    #[must_use]
    pub const fn last_number(&self) -> u64 {
        self.last_number
    }

    /// The tree itself.
    #[must_use]
    pub const fn tree(&self) -> &MerkleTree {
        &self.tree
    }

    /// Shorthand for `tree().root()`.
    #[must_use]
    pub const fn root(&self) -> Digest {
        self.tree.root()
    }
}

/// Ordered, gap-free, append-only registry.
#[derive(Debug, Default)]
pub struct TreeRegistry {
    trees: Vec<Arc<CommittedTree>>,
}

impl TreeRegistry {
    /// Empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { trees: Vec::new() }
    }

    /// Append the next tree; its sequence must equal the current length.
    pub fn append(&mut self, entry: CommittedTree) -> Result<Arc<CommittedTree>, RegistryError> {
        let expected = self.trees.len();
        if entry.sequence != expected {
            return Err(RegistryError::OutOfOrder {
                expected,
                got: entry.sequence,
            });
        }
        let entry = Arc::new(entry);
        self.trees.push(Arc::clone(&entry));
        Ok(entry)
    }

    /// Tree at `sequence`, if registered.
    #[must_use]
    pub fn get_tree(&self, sequence: usize) -> Option<Arc<CommittedTree>> {
        self.trees.get(sequence).cloned()
    }

    /// Oldest tree whose leaves include `leaf`.
    ///
    /// A leaf present in several trees (re-submitted header) always resolves
    /// to the earliest one.
    #[must_use]
    pub fn find_tree_containing(&self, leaf: &Digest) -> Option<Arc<CommittedTree>> {
        self.trees.iter().find(|t| t.tree.contains(leaf)).cloned()
    }

    /// Registered tree count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// `true` before the first batch fills.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Trees in sequence order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CommittedTree>> + '_ {
        self.trees.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(sequence: usize, leaves: &[Digest]) -> CommittedTree {
        CommittedTree::new(sequence, 0, 0, MerkleTree::from_leaves(leaves).unwrap())
    }

    #[test]
    fn rejects_gaps_and_repeats() {
        let mut r = TreeRegistry::new();
        r.append(entry(0, &[[1; 32]])).unwrap();
        assert_eq!(
            r.append(entry(2, &[[2; 32]])).unwrap_err(),
            RegistryError::OutOfOrder {
                expected: 1,
                got: 2
            }
        );
        assert_eq!(
            r.append(entry(0, &[[2; 32]])).unwrap_err(),
            RegistryError::OutOfOrder {
                expected: 1,
                got: 0
            }
        );
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn lookup_prefers_earliest_tree() {
        let mut r = TreeRegistry::new();
        r.append(entry(0, &[[1; 32], [2; 32]])).unwrap();
        r.append(entry(1, &[[2; 32], [3; 32]])).unwrap();

        assert_eq!(r.find_tree_containing(&[2; 32]).unwrap().sequence(), 0);
        assert_eq!(r.find_tree_containing(&[3; 32]).unwrap().sequence(), 1);
        assert!(r.find_tree_containing(&[4; 32]).is_none());
        assert!(r.get_tree(1).is_some());
        assert!(r.get_tree(2).is_none());
    }
}
