//! Proof documents and commit manifests, JSON or CBOR by file extension.

use anyhow::{Context, Result};
use blockseal_core::digest::serde_hex;
use blockseal_core::io::{ensure_parent_dir, ext_lower};
use blockseal_core::Digest;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::Proof;

/// Format version for [`ProofDocument`].
pub const PROOF_VERSION: u32 = 1;

/// Format version for [`CommitManifest`].
pub const MANIFEST_VERSION: u32 = 1;

/// A proof as handed to a third party, with enough context to re-check it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProofDocument {
    /// Schema version.
    pub version: u32,
    /// Hash of the proven header.
    pub header_hash: String,
    /// Sequence index of the tree holding the header.
    pub sequence: u64,
    /// Leaf position inside that tree.
    pub leaf_index: u64,
    /// Root of that tree when the proof was generated.
    #[serde(with = "serde_hex")]
    pub root: Digest,
    /// Sibling path.
    pub proof: Proof,
}

/// One committed tree as listed in a manifest.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TreeSummary {
    /// Sequence index.
    pub sequence: u64,
    /// Root digest.
    #[serde(with = "serde_hex")]
    pub root: Digest,
    /// Leaves in the tree (the batch size).
    pub leaf_count: u64,
    /// Height of the first header in the batch.
    pub first_number: u64,
    /// Height of the last header in the batch.
    pub last_number: u64,
}

/// Everything committed by one run, oldest tree first.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommitManifest {
    /// Schema version.
    pub version: u32,
    /// Configured batch size.
    pub batch_size: u64,
    /// Committed trees in sequence order.
    pub trees: Vec<TreeSummary>,
    /// Headers still buffered (never committed).
    pub pending: u64,
}

impl ProofDocument {
    /// Read by extension (`.json` / `.cbor`).
    pub fn read_auto<P: AsRef<Path>>(path: P) -> Result<Self> {
        read_auto(path.as_ref(), "proof document")
    }

    /// Write by extension (JSON unless `.cbor`).
    pub fn write_auto<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_auto(path.as_ref(), self, "proof document")
    }
}

impl CommitManifest {
    /// Read by extension (`.json` / `.cbor`).
    pub fn read_auto<P: AsRef<Path>>(path: P) -> Result<Self> {
        read_auto(path.as_ref(), "manifest")
    }

    /// Write by extension (JSON unless `.cbor`).
    pub fn write_auto<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_auto(path.as_ref(), self, "manifest")
    }
}

/* -------------------- JSON/CBOR plumbing -------------------- */

fn read_auto<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut rdr = BufReader::new(f);
    match ext_lower(path).as_deref() {
        Some("json") => {
            serde_json::from_reader(rdr).with_context(|| format!("deserialize JSON {what}"))
        }
        Some("cbor") => {
            ciborium::de::from_reader(&mut rdr).with_context(|| format!("deserialize CBOR {what}"))
        }
        Some(other) => anyhow::bail!("unsupported {what} extension: {other}"),
        None => anyhow::bail!("path has no extension (expected .json or .cbor)"),
    }
}

fn write_auto<T: Serialize>(path: &Path, v: &T, what: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    if ext_lower(path).as_deref() == Some("cbor") {
        ciborium::ser::into_writer(v, &mut w).with_context(|| format!("serialize CBOR {what}"))?;
    } else {
        serde_json::to_writer_pretty(&mut w, v)
            .with_context(|| format!("serialize JSON {what}"))?;
    }
    w.flush().context("flush writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ProofStep, Side};

    fn doc() -> ProofDocument {
        ProofDocument {
            version: PROOF_VERSION,
            header_hash: format!("0x{}", "cd".repeat(32)),
            sequence: 3,
            leaf_index: 1,
            root: [0xee; 32],
            proof: Proof::new(vec![ProofStep {
                sibling: [0x01; 32],
                side: Side::Left,
            }]),
        }
    }

    #[test]
    fn proof_document_json_and_cbor() {
        let dir = std::env::temp_dir().join(format!("blockseal_merkle_io_{}", std::process::id()));
        for ext in ["json", "cbor"] {
            let p = dir.join(format!("proof.{ext}"));
            doc().write_auto(&p).unwrap();
            assert_eq!(ProofDocument::read_auto(&p).unwrap(), doc());
        }
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn manifest_json_uses_hex_roots() {
        let m = CommitManifest {
            version: MANIFEST_VERSION,
            batch_size: 2,
            trees: vec![TreeSummary {
                sequence: 0,
                root: [0xaa; 32],
                leaf_count: 2,
                first_number: 10,
                last_number: 11,
            }],
            pending: 1,
        };
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["trees"][0]["root"], format!("0x{}", "aa".repeat(32)));
        assert_eq!(v["batchSize"], 2);
    }
}
