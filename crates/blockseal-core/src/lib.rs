//! blockseal-core: header types, leaf hashing, configuration and header I/O.
//!
//! This crate defines the **stable boundary** shared by the blockseal crates:
//! - the `Header` record pushed by a header source,
//! - the fixed-width `Digest` and the two hash shapes (leaf, parent),
//! - the TOML-backed configuration (`BlocksealConfig`),
//! - JSON/CBOR/JSONL header I/O and a deterministic synthetic generator.
//!
//! ```
//! use blockseal_core::{generate_headers, leaf_digest};
//!
//! let headers = generate_headers(4, 7);
//! let leaf = headers[0].leaf_value()?;
//! assert_eq!(leaf, leaf_digest(&headers[0].hash_bytes()?));
//! # Ok::<(), blockseal_core::HeaderError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::doc_markdown
)]

/// Runtime configuration (batch size, ingest channel capacity).
pub mod config;
/// Digest type, leaf/parent hashing and hex helpers.
pub mod digest;
/// Deterministic synthetic header chains for tests, benches and the CLI.
pub mod generator;
/// Block header record and its validation.
pub mod header;
/// JSON/CBOR helpers and auto-detecting header read/write APIs.
pub mod io;
/// Streaming JSONL/NDJSON helpers for long header streams.
pub mod io_jsonl;

pub use config::*;
pub use digest::{
    leaf_digest, node_digest, parse_digest_hex, to_prefixed_hex, Digest, DigestError, DIGEST_LEN,
};
pub use generator::generate_headers;
pub use header::*;

/// Commonly-used items for quick imports.
pub mod prelude {
    pub use crate::{
        config::{BlocksealConfig, CommitterConfig, ConfigError, IngestConfig},
        digest::{leaf_digest, node_digest, Digest},
        header::{Header, HeaderError},
    };
}
