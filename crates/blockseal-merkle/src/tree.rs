//! Layered Merkle tree over fixed 32-byte leaves.

use std::collections::HashMap;

use blockseal_core::{node_digest, Digest};
use thiserror::Error;

use crate::proof::{Proof, ProofStep, Side};

/// Tree construction failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A tree needs at least one leaf.
    #[error("cannot build a merkle tree from zero leaves")]
    Empty,
}

/// Immutable tree over one batch.
///
/// `layers[0]` holds the leaves, each following layer is half the size
/// (rounded up), and the last layer holds only the root.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    layers: Vec<Vec<Digest>>,
    root: Digest,
    // First index of each distinct leaf value.
    positions: HashMap<Digest, usize>,
}

impl MerkleTree {
    /// Build bottom-up from leaves in arrival order.
    pub fn from_leaves(leaves: &[Digest]) -> Result<Self, TreeError> {
        if leaves.is_empty() {
            return Err(TreeError::Empty);
        }

        let mut layers = vec![leaves.to_vec()];
        let mut level = leaves.to_vec();
        while level.len() > 1 {
            let next: Vec<Digest> = level
                .chunks(2)
                .map(|pair| {
                    let left = &pair[0];
                    // odd tail pairs with itself
                    let right = pair.get(1).unwrap_or(left);
                    node_digest(left, right)
                })
                .collect();
            layers.push(next.clone());
            level = next;
        }
        let root = level[0];

        let mut positions = HashMap::with_capacity(leaves.len());
        for (i, leaf) in leaves.iter().enumerate() {
            positions.entry(*leaf).or_insert(i);
        }

        Ok(Self {
            layers,
            root,
            positions,
        })
    }

    /// Root digest.
    #[inline]
    #[must_use]
    pub const fn root(&self) -> Digest {
        self.root
    }

    /// Leaf values in arrival order.
    #[must_use]
    pub fn leaves(&self) -> &[Digest] {
        &self.layers[0]
    }

    /// Number of leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.layers[0].len()
    }

    /// Number of hashing levels between the leaves and the root (proof length).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Layer `i` (0 = leaves), if it exists.
    #[must_use]
    pub fn layer(&self, i: usize) -> Option<&[Digest]> {
        self.layers.get(i).map(Vec::as_slice)
    }

    /// Index of the first occurrence of `leaf`.
    #[must_use]
    pub fn position(&self, leaf: &Digest) -> Option<usize> {
        self.positions.get(leaf).copied()
    }

    /// Whether `leaf` is one of this tree's leaves.
    #[must_use]
    pub fn contains(&self, leaf: &Digest) -> bool {
        self.positions.contains_key(leaf)
    }

    /// Sibling path for the leaf at `index`; `None` if out of range.
    #[must_use]
    pub fn open(&self, index: usize) -> Option<Proof> {
        if index >= self.leaf_count() {
            return None;
        }
        let mut idx = index;
        let mut steps = Vec::with_capacity(self.depth());
        for layer in &self.layers[..self.depth()] {
            let (sib_idx, side) = if idx % 2 == 0 {
                (idx + 1, Side::Right)
            } else {
                (idx - 1, Side::Left)
            };
            // Missing right sibling means the node was paired with itself.
            let sibling = layer.get(sib_idx).copied().unwrap_or(layer[idx]);
            steps.push(ProofStep { sibling, side });
            idx /= 2;
        }
        Some(Proof::new(steps))
    }

    /// Check `proof` folds `leaf` into this tree's root.
    ///
    /// Proofs whose length differs from [`Self::depth`] are rejected outright.
    #[must_use]
    pub fn verify(&self, leaf: &Digest, proof: &Proof) -> bool {
        proof.len() == self.depth() && proof.fold(*leaf) == self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(n: u8) -> Digest {
        [n; 32]
    }

    #[test]
    fn empty_is_rejected() {
        assert_eq!(MerkleTree::from_leaves(&[]).unwrap_err(), TreeError::Empty);
    }

    #[test]
    fn single_leaf_is_its_own_root() {
        let t = MerkleTree::from_leaves(&[leaf(7)]).unwrap();
        assert_eq!(t.root(), leaf(7));
        assert_eq!(t.depth(), 0);
        let p = t.open(0).unwrap();
        assert!(p.is_empty());
        assert!(t.verify(&leaf(7), &p));
    }

    #[test]
    fn odd_level_duplicates_last_node() {
        let (a, b, c) = (leaf(1), leaf(2), leaf(3));
        let t = MerkleTree::from_leaves(&[a, b, c]).unwrap();
        let ab = node_digest(&a, &b);
        let cc = node_digest(&c, &c);
        assert_eq!(t.root(), node_digest(&ab, &cc));
        assert_eq!(t.depth(), 2);

        let p = t.open(2).unwrap();
        assert_eq!(
            p.steps(),
            &[
                ProofStep {
                    sibling: c,
                    side: Side::Right
                },
                ProofStep {
                    sibling: ab,
                    side: Side::Left
                },
            ]
        );
        assert!(t.verify(&c, &p));
    }

    #[test]
    fn positions_report_first_occurrence() {
        let t = MerkleTree::from_leaves(&[leaf(1), leaf(2), leaf(1)]).unwrap();
        assert_eq!(t.position(&leaf(1)), Some(0));
        assert_eq!(t.position(&leaf(2)), Some(1));
        assert_eq!(t.position(&leaf(3)), None);
        assert!(t.open(3).is_none());
    }

    #[test]
    fn wrong_length_proof_is_rejected() {
        let t = MerkleTree::from_leaves(&[leaf(1), leaf(2)]).unwrap();
        let mut steps = t.open(0).unwrap().steps().to_vec();
        steps.push(steps[0]);
        assert!(!t.verify(&leaf(1), &Proof::new(steps)));
        assert!(!t.verify(&leaf(1), &Proof::default()));
    }
}
