//! Inclusion proofs: sibling digests bottom→top, each tagged with its side.

use blockseal_core::digest::serde_hex;
use blockseal_core::{node_digest, Digest};
use serde::{Deserialize, Serialize};

/// Which side of the running node a sibling occupies.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Sibling is the left input: `parent = H(sibling ‖ current)`.
    Left,
    /// Sibling is the right input: `parent = H(current ‖ sibling)`.
    Right,
}

/// One level of a proof.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProofStep {
    /// Sibling digest at this level.
    #[serde(with = "serde_hex")]
    pub sibling: Digest,
    /// Side of the sibling relative to the running node.
    pub side: Side,
}

impl ProofStep {
    /// Parent of `current` and this step's sibling.
    #[inline]
    #[must_use]
    pub fn apply(&self, current: &Digest) -> Digest {
        match self.side {
            Side::Left => node_digest(&self.sibling, current),
            Side::Right => node_digest(current, &self.sibling),
        }
    }
}

/// Ordered sibling path from a leaf to its tree's root.
///
/// Empty for a one-leaf tree, where the root is the leaf itself.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Proof {
    steps: Vec<ProofStep>,
}

impl Proof {
    /// Wrap a bottom→top step list.
    #[must_use]
    pub const fn new(steps: Vec<ProofStep>) -> Self {
        Self { steps }
    }

    /// Steps, leaf level first.
    #[must_use]
    pub fn steps(&self) -> &[ProofStep] {
        &self.steps
    }

    /// Number of levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// `true` for the one-leaf-tree proof.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Fold `leaf` through every step; the result should be the root.
    #[must_use]
    pub fn fold(&self, leaf: Digest) -> Digest {
        fold_proof(leaf, &self.steps)
    }
}

impl From<Vec<ProofStep>> for Proof {
    fn from(steps: Vec<ProofStep>) -> Self {
        Self::new(steps)
    }
}

/// Fold a leaf through `steps` in order.
#[must_use]
pub fn fold_proof(leaf: Digest, steps: &[ProofStep]) -> Digest {
    steps.iter().fold(leaf, |cur, step| step.apply(&cur))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_selects_concatenation_order() {
        let cur = [1u8; 32];
        let sib = [2u8; 32];
        let right = ProofStep {
            sibling: sib,
            side: Side::Right,
        };
        let left = ProofStep {
            sibling: sib,
            side: Side::Left,
        };
        assert_eq!(right.apply(&cur), node_digest(&cur, &sib));
        assert_eq!(left.apply(&cur), node_digest(&sib, &cur));
    }

    #[test]
    fn empty_proof_folds_to_leaf() {
        let leaf = [9u8; 32];
        assert_eq!(Proof::default().fold(leaf), leaf);
    }

    #[test]
    fn json_shape_is_tagged() {
        let p = Proof::new(vec![ProofStep {
            sibling: [0xab; 32],
            side: Side::Left,
        }]);
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v[0]["side"], "left");
        assert_eq!(v[0]["sibling"], format!("0x{}", "ab".repeat(32)));
        let back: Proof = serde_json::from_value(v).unwrap();
        assert_eq!(back, p);
    }
}
