//! Block header records as delivered by a chain subscription.
//!
//! Digest fields stay as the hex strings the source emits. Only `hash` is
//! decoded (and width-checked) because it is the header's identity and the
//! input to its leaf value.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::digest::{leaf_digest, parse_digest_hex, Digest, DigestError};

/// One block header. Immutable once received.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    /// Block height.
    pub number: u64,
    /// Block hash (primary identity), 32-byte hex.
    pub hash: String,
    /// Parent block hash.
    pub parent_hash: String,
    /// State trie root.
    pub state_root: String,
    /// Extrinsics trie root.
    pub extrinsics_root: String,
}

/// Header rejected at ingestion.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// `hash` is not a 32-byte hex digest.
    #[error("header #{number}: malformed hash {hash:?}: {source}")]
    MalformedHash {
        /// Height of the offending header.
        number: u64,
        /// The raw hash string.
        hash: String,
        /// Decoding failure.
        source: DigestError,
    },
}

impl Header {
    /// Decoded `hash` bytes.
    pub fn hash_bytes(&self) -> Result<Digest, HeaderError> {
        parse_digest_hex(&self.hash).map_err(|source| HeaderError::MalformedHash {
            number: self.number,
            hash: self.hash.clone(),
            source,
        })
    }

    /// Leaf value committed for this header: `H(hash_bytes)`.
    pub fn leaf_value(&self) -> Result<Digest, HeaderError> {
        Ok(leaf_digest(&self.hash_bytes()?))
    }
}
