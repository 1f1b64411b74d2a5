//! Fixed-width digests and the hash shapes used by batch trees.
//!
//! - Leaf: BLAKE3 over the 32 raw bytes of a header's `hash` field.
//! - Parent: BLAKE3 over `left ‖ right`, in that order, never sorted.
//!
//! Digests travel as `0x`-prefixed lowercase hex; the prefix is optional on input.

use blake3::Hasher;
use thiserror::Error;

/// Width in bytes of every digest in the system.
pub const DIGEST_LEN: usize = 32;

/// A BLAKE3 output (leaf value, interior node or root).
pub type Digest = [u8; DIGEST_LEN];

/// Errors raised when decoding a hex digest.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DigestError {
    /// Not valid hexadecimal.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded to the wrong number of bytes.
    #[error("invalid digest length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Required width.
        expected: usize,
        /// Decoded width.
        got: usize,
    },
}

/// Leaf value for an already-decoded header hash.
#[inline]
#[must_use]
pub fn leaf_digest(header_hash: &Digest) -> Digest {
    *blake3::hash(header_hash).as_bytes()
}

/// Parent of two adjacent nodes.
#[inline]
#[must_use]
pub fn node_digest(left: &Digest, right: &Digest) -> Digest {
    let mut h = Hasher::new();
    h.update(left);
    h.update(right);
    *h.finalize().as_bytes()
}

/// Decode a hex digest, with or without a `0x` prefix.
pub fn parse_digest_hex(s: &str) -> Result<Digest, DigestError> {
    let body = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    let bytes = hex::decode(body).map_err(|e| DigestError::InvalidHex(e.to_string()))?;
    let got = bytes.len();
    bytes.try_into().map_err(|_| DigestError::InvalidLength {
        expected: DIGEST_LEN,
        got,
    })
}

/// Encode as `0x`-prefixed lowercase hex.
#[must_use]
pub fn to_prefixed_hex(d: &Digest) -> String {
    format!("0x{}", hex::encode(d))
}

/// `#[serde(with = "blockseal_core::digest::serde_hex")]` for `Digest` fields.
pub mod serde_hex {
    use super::{parse_digest_hex, to_prefixed_hex, Digest};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize as a prefixed hex string.
    pub fn serialize<S: Serializer>(d: &Digest, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&to_prefixed_hex(d))
    }

    /// Deserialize from a hex string (prefix optional).
    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Digest, D::Error> {
        let s = String::deserialize(de)?;
        parse_digest_hex(&s).map_err(<D::Error as serde::de::Error>::custom)
    }
}
