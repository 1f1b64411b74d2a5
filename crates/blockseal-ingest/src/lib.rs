//! blockseal-ingest: feed a header stream into a [`HeaderCommitter`].
//!
//! A header source pushes into a bounded channel through a [`HeaderSink`].
//! One consumer task drains it in arrival order, forwarding each header to the
//! [`HeaderIndex`] and then to the committer. That task is the only writer, so
//! headers are committed strictly in the order they were accepted.
//!
//! [`HeaderCommitter`]: blockseal_batch::HeaderCommitter

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

/// By-hash / by-number lookup over every ingested header.
pub mod index;
/// Channel, consumer task and sink.
pub mod pipeline;

pub use index::HeaderIndex;
pub use pipeline::{pump, spawn_ingest, HeaderSink, IngestError, IngestReport};
