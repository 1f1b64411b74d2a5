//! Bounded channel between a header source and the single committing task.
//!
//! ```text
//! source ──submit──▶ mpsc (bounded) ──▶ ingest task ──▶ HeaderIndex
//!                                                   └─▶ HeaderCommitter
//! ```
//!
//! `submit` waits while the channel is full; that is the only backpressure.
//! Dropping every [`HeaderSink`] closes the channel and the task returns its
//! [`IngestReport`].

use std::sync::Arc;

use blockseal_batch::HeaderCommitter;
use blockseal_core::{ConfigError, Header, IngestConfig};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::index::HeaderIndex;

/// Submission failure.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IngestError {
    /// The consumer task is gone.
    #[error("ingest task has shut down")]
    Closed,
}

/// Counters returned by the ingest task when its channel closes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Headers taken off the channel.
    pub received: u64,
    /// Headers the committer refused (malformed hash).
    pub rejected: u64,
    /// Trees sealed by this task.
    pub committed_trees: u64,
}

/// Producer handle; clone it for several sources.
#[derive(Clone, Debug)]
pub struct HeaderSink {
    tx: mpsc::Sender<Header>,
}

impl HeaderSink {
    /// Queue `header`, waiting for capacity.
    pub async fn submit(&self, header: Header) -> Result<(), IngestError> {
        self.tx.send(header).await.map_err(|_| IngestError::Closed)
    }
}

/// Spawn the consumer task on the current tokio runtime.
pub fn spawn_ingest(
    committer: Arc<HeaderCommitter>,
    index: Arc<HeaderIndex>,
    cfg: &IngestConfig,
) -> Result<(HeaderSink, JoinHandle<IngestReport>), ConfigError> {
    let capacity = cfg.channel_capacity()?;
    let (tx, rx) = mpsc::channel(capacity.get());
    let task = tokio::spawn(run(rx, committer, index));
    Ok((HeaderSink { tx }, task))
}

async fn run(
    mut rx: mpsc::Receiver<Header>,
    committer: Arc<HeaderCommitter>,
    index: Arc<HeaderIndex>,
) -> IngestReport {
    let mut report = IngestReport::default();
    while let Some(header) = rx.recv().await {
        report.received += 1;
        index.insert(&header);
        match committer.add_header(header) {
            Ok(Some(receipt)) => {
                report.committed_trees += 1;
                debug!(sequence = receipt.sequence, "ingest sealed batch");
            }
            Ok(None) => {}
            Err(e) => {
                report.rejected += 1;
                warn!(error = %e, "rejected header");
            }
        }
    }
    info!(
        received = report.received,
        rejected = report.rejected,
        committed_trees = report.committed_trees,
        pending = committer.pending_len(),
        "ingest channel closed"
    );
    report
}

/// Push every header from `headers` into `sink`, in order.
///
/// Stops at the first read error or if the task has shut down. Returns how
/// many headers were submitted.
pub async fn pump<I>(sink: &HeaderSink, headers: I) -> anyhow::Result<u64>
where
    I: IntoIterator<Item = anyhow::Result<Header>>,
{
    let mut n = 0u64;
    for item in headers {
        sink.submit(item?).await?;
        n += 1;
    }
    Ok(n)
}
