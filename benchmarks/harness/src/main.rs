//! blockseal-bench-harness
//!
//! Run small end-to-end benchmarks (generate -> ingest/commit -> prove -> verify)
//! and append CSV rows into `benchmarks/reports/bench-<unix>.csv`.
//!
//! Usage examples:
//!   cargo run -p blockseal-bench-harness -- --profile benchmarks/profiles/small.toml
//!   cargo run --release -p blockseal-bench-harness -- --profile benchmarks/profiles/medium.toml

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use blockseal_batch::{HeaderCommitter, ProofLookup};
use blockseal_core::io::{stream_headers_auto, write_headers_auto};
use blockseal_core::{generate_headers, CommitterConfig, IngestConfig};
use blockseal_ingest::{pump, spawn_ingest, HeaderIndex};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Profile {
    /// Headers in the synthetic chain
    headers: u64,
    /// Headers per committed tree
    batch_size: usize,
    /// Repetitions of the whole pipeline
    repeats: u32,
}

fn parse_flag(name: &str, default: &str) -> String {
    let mut it = std::env::args().skip(1);
    while let Some(k) = it.next() {
        if k == format!("--{name}") {
            return it.next().unwrap_or_else(|| default.to_string());
        }
    }
    default.to_string()
}

fn dur_ms(d: Duration) -> u128 {
    d.as_millis()
}

fn main() -> Result<()> {
    let profile_path = PathBuf::from(parse_flag("profile", "benchmarks/profiles/small.toml"));

    let profile_src = fs::read_to_string(&profile_path)
        .with_context(|| format!("read profile {}", profile_path.display()))?;
    let profile: Profile = toml::from_str(&profile_src).context("parse profile toml")?;
    println!(
        "Profile: headers={}, batch_size={}, repeats={}",
        profile.headers, profile.batch_size, profile.repeats
    );

    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("build tokio runtime")?;

    fs::create_dir_all("benchmarks/reports").ok();

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let csv_path = PathBuf::from(format!("benchmarks/reports/bench-{ts}.csv"));
    let mut csv = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&csv_path)?;
    writeln!(csv, "timestamp,headers,batch_size,repeat,stage,ms,extra")?;

    let row_prefix = format!("{ts},{},{}", profile.headers, profile.batch_size);

    for rep in 0..profile.repeats {
        let headers_path = PathBuf::from(format!("benchmarks/tmp-headers-{ts}-{rep}.jsonl"));

        // 1) generate chain
        let t0 = Instant::now();
        let headers = generate_headers(profile.headers, u64::from(rep));
        let t_gen = t0.elapsed();
        write_headers_auto(&headers_path, &headers)?;
        writeln!(csv, "{row_prefix},{rep},gen,{},", dur_ms(t_gen))?;

        // 2) stream the file through the ingest task
        let committer = Arc::new(HeaderCommitter::new(&CommitterConfig::with_batch_size(
            profile.batch_size,
        ))?);
        let index = Arc::new(HeaderIndex::new());
        let t0 = Instant::now();
        let report = rt.block_on(async {
            let (sink, task) = spawn_ingest(
                Arc::clone(&committer),
                Arc::clone(&index),
                &IngestConfig::default(),
            )?;
            pump(&sink, stream_headers_auto(&headers_path)?).await?;
            drop(sink);
            let report = task.await.context("ingest task failed")?;
            Ok::<_, anyhow::Error>(report)
        })?;
        let t_ingest = t0.elapsed();
        let last_root = committer
            .trees()
            .last()
            .map(|t| hex::encode(t.root()))
            .unwrap_or_default();
        writeln!(
            csv,
            "{row_prefix},{rep},ingest,{},trees={};pending={};last_root={last_root}",
            dur_ms(t_ingest),
            report.committed_trees,
            committer.pending_len()
        )?;

        // 3) prove every committed header
        let committed = headers.len() - committer.pending_len();
        let t0 = Instant::now();
        let mut proofs = Vec::with_capacity(committed);
        for h in &headers[..committed] {
            match committer.generate_proof(h) {
                ProofLookup::Found { proof, .. } => proofs.push(proof),
                ProofLookup::NotFound => bail!("header #{} was not committed", h.number),
            }
        }
        let t_prove = t0.elapsed();
        let steps: usize = proofs.iter().map(|p| p.len()).sum();
        writeln!(
            csv,
            "{row_prefix},{rep},prove,{},proofs={};steps={steps}",
            dur_ms(t_prove),
            proofs.len()
        )?;

        // 4) verify them all
        let t0 = Instant::now();
        for (h, p) in headers.iter().zip(&proofs) {
            if !committer.verify_proof(p, h) {
                bail!("proof for header #{} rejected", h.number);
            }
        }
        let t_verify = t0.elapsed();
        writeln!(csv, "{row_prefix},{rep},verify,{},", dur_ms(t_verify))?;

        // cleanup temp files to avoid disk bloat
        let _ = fs::remove_file(&headers_path);
    }

    println!("Wrote report → {}", csv_path.display());
    Ok(())
}
