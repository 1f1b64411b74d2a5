// crates/blockseal-cli/src/main.rs

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

use anyhow::{bail, Context, Result};
use blockseal_batch::{HeaderCommitter, ProofLookup};
use blockseal_core::{
    generate_headers,
    io::{ensure_parent_dir, stream_headers_auto, write_headers_auto},
    BlocksealConfig,
};
use blockseal_ingest::{pump, spawn_ingest, HeaderIndex, IngestReport};
use blockseal_merkle::{CommitManifest, ProofDocument, TreeSummary, MANIFEST_VERSION, PROOF_VERSION};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "blockseal",
    about = "Batch block headers into Merkle trees and prove inclusion",
    long_about = "blockseal CLI.\n\nReplays a header stream through the batch committer, then writes manifests, \
                  produces inclusion proofs, or checks them.",
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    /// TOML config file ([committer] batch_size, [ingest] channel_capacity)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override committer.batch_size
    #[arg(long, global = true)]
    batch_size: Option<usize>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Write a synthetic, linked header chain (JSON/CBOR/JSONL by extension).
    Simulate {
        /// Number of headers
        #[arg(long, default_value_t = 64)]
        count: u64,

        /// RNG seed
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output path for headers
        #[arg(long, default_value = "headers.jsonl")]
        out: PathBuf,
    },

    /// Replay headers through the committer and write a manifest of tree roots
    Commit {
        /// Input headers (JSON/CBOR/JSONL)
        #[arg(long)]
        headers: PathBuf,

        /// Output manifest (JSON/CBOR)
        #[arg(long, default_value = "manifest.json")]
        out: PathBuf,
    },

    /// Replay headers and write an inclusion proof for one of them
    Prove {
        /// Input headers (JSON/CBOR/JSONL)
        #[arg(long)]
        headers: PathBuf,

        /// Hash of the header to prove
        #[arg(long)]
        hash: String,

        /// Output proof document (JSON/CBOR)
        #[arg(long, default_value = "proof.json")]
        out: PathBuf,
    },

    /// Replay headers and check a proof document against the committed trees
    Verify {
        /// Input headers (JSON/CBOR/JSONL)
        #[arg(long)]
        headers: PathBuf,

        /// Proof document (JSON/CBOR)
        #[arg(long)]
        proof: PathBuf,
    },

    /// Replay headers and print one committed tree
    ShowTree {
        /// Input headers (JSON/CBOR/JSONL)
        #[arg(long)]
        headers: PathBuf,

        /// Sequence index of the tree
        #[arg(long)]
        sequence: usize,
    },
}

/// Committer and index after a full replay.
struct Replayed {
    committer: Arc<HeaderCommitter>,
    index: Arc<HeaderIndex>,
    report: IngestReport,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref(), cli.batch_size)?;

    match cli.cmd {
        Cmd::Simulate { count, seed, out } => simulate(count, seed, &out),
        Cmd::Commit { headers, out } => commit(&cfg, &headers, &out).await,
        Cmd::Prove { headers, hash, out } => prove(&cfg, &headers, &hash, &out).await,
        Cmd::Verify { headers, proof } => verify(&cfg, &headers, &proof).await,
        Cmd::ShowTree { headers, sequence } => show_tree(&cfg, &headers, sequence).await,
    }
}

/// Initialize tracing with an env-driven filter (default INFO).
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// File config (or defaults), then flag overrides, then validation.
fn load_config(path: Option<&Path>, batch_size: Option<usize>) -> Result<BlocksealConfig> {
    let mut cfg = match path {
        Some(p) => BlocksealConfig::load(p)?,
        None => BlocksealConfig::default(),
    };
    if let Some(n) = batch_size {
        cfg.committer.batch_size = n;
    }
    cfg.validate().context("invalid configuration")?;
    Ok(cfg)
}

/// Stream `headers` through a fresh committer via the ingest task.
async fn replay(cfg: &BlocksealConfig, headers: &Path) -> Result<Replayed> {
    let committer = Arc::new(HeaderCommitter::new(&cfg.committer)?);
    let index = Arc::new(HeaderIndex::new());
    let (sink, task) = spawn_ingest(Arc::clone(&committer), Arc::clone(&index), &cfg.ingest)?;

    info!(headers=%headers.display(), batch_size = cfg.committer.batch_size, "replaying headers");
    let iter = stream_headers_auto(headers)
        .with_context(|| format!("open headers {}", headers.display()))?;
    let pumped = pump(&sink, iter).await;
    drop(sink);
    let report = task.await.context("ingest task failed")?;
    pumped.with_context(|| format!("reading {}", headers.display()))?;

    if report.rejected > 0 {
        warn!(rejected = report.rejected, "some headers were rejected");
    }
    Ok(Replayed {
        committer,
        index,
        report,
    })
}

fn simulate(count: u64, seed: u64, out: &Path) -> Result<()> {
    info!(count, seed, out=%out.display(), "generating synthetic headers");
    ensure_parent_dir(out)?;
    let headers = generate_headers(count, seed);
    write_headers_auto(out, &headers)
        .with_context(|| format!("writing headers to {}", out.display()))?;
    println!("Simulated {count} headers → {}", out.display());
    Ok(())
}

async fn commit(cfg: &BlocksealConfig, headers: &Path, out: &Path) -> Result<()> {
    let r = replay(cfg, headers).await?;

    let trees = r
        .committer
        .trees()
        .iter()
        .map(|t| TreeSummary {
            sequence: t.sequence() as u64,
            root: t.root(),
            leaf_count: t.tree().leaf_count() as u64,
            first_number: t.first_number(),
            last_number: t.last_number(),
        })
        .collect::<Vec<_>>();
    let manifest = CommitManifest {
        version: MANIFEST_VERSION,
        batch_size: cfg.committer.batch_size as u64,
        trees,
        pending: r.committer.pending_len() as u64,
    };
    manifest
        .write_auto(out)
        .with_context(|| format!("writing manifest {}", out.display()))?;

    println!(
        "Committed {} trees from {} headers ({} pending, {} rejected) → {}",
        manifest.trees.len(),
        r.report.received,
        manifest.pending,
        r.report.rejected,
        out.display()
    );
    Ok(())
}

async fn prove(cfg: &BlocksealConfig, headers: &Path, hash: &str, out: &Path) -> Result<()> {
    let r = replay(cfg, headers).await?;
    let Some(header) = r.index.get_by_hash(hash) else {
        bail!("no header with hash {hash} in {}", headers.display());
    };

    let ProofLookup::Found {
        sequence,
        leaf_index,
        root,
        proof,
    } = r.committer.generate_proof(&header)
    else {
        bail!(
            "header #{} ({}) is not committed in any tree (still pending?)",
            header.number,
            header.hash
        );
    };

    let doc = ProofDocument {
        version: PROOF_VERSION,
        header_hash: header.hash.clone(),
        sequence: sequence as u64,
        leaf_index: leaf_index as u64,
        root,
        proof,
    };
    doc.write_auto(out)
        .with_context(|| format!("writing proof {}", out.display()))?;

    println!(
        "Proved header #{} in tree {} (leaf {}, {} steps) → {}",
        header.number,
        sequence,
        leaf_index,
        doc.proof.len(),
        out.display()
    );
    Ok(())
}

async fn verify(cfg: &BlocksealConfig, headers: &Path, proof: &Path) -> Result<()> {
    let doc = ProofDocument::read_auto(proof)
        .with_context(|| format!("reading proof {}", proof.display()))?;
    let r = replay(cfg, headers).await?;

    let Some(header) = r.index.get_by_hash(&doc.header_hash) else {
        bail!("no header with hash {} in {}", doc.header_hash, headers.display());
    };
    if !r.committer.verify_proof(&doc.proof, &header) {
        bail!("proof rejected for header #{} ({})", header.number, header.hash);
    }
    if r.committer
        .get_tree(usize::try_from(doc.sequence).unwrap_or(usize::MAX))
        .map_or(true, |t| t.root() != doc.root)
    {
        warn!(
            sequence = doc.sequence,
            "proof document's recorded tree does not match the committed one"
        );
    }

    println!("OK: header #{} is included", header.number);
    Ok(())
}

async fn show_tree(cfg: &BlocksealConfig, headers: &Path, sequence: usize) -> Result<()> {
    let r = replay(cfg, headers).await?;
    let Some(t) = r.committer.get_tree(sequence) else {
        bail!(
            "no tree {sequence} (only {} committed)",
            r.committer.tree_count()
        );
    };

    println!("tree {}", t.sequence());
    println!("  root    0x{}", hex::encode(t.root()));
    println!("  headers #{}..=#{}", t.first_number(), t.last_number());
    println!("  depth   {}", t.tree().depth());
    for (i, leaf) in t.tree().leaves().iter().enumerate() {
        println!("  leaf {i:>4} 0x{}", hex::encode(leaf));
    }
    Ok(())
}
