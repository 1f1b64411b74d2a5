//! Serialization helpers for header collections.
//!
//! JSON and CBOR read/write with extension-based auto-detection. Unknown or
//! missing extensions are rejected for reads and default to JSON for writes.
//! [`stream_headers_auto`] yields a boxed iterator so callers consume JSONL
//! (true streaming) and JSON/CBOR (load-then-iterate) the same way.

use crate::Header;
use anyhow::{anyhow, Context, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Ensure the parent directory for a file exists (no-op if none).
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating parent directory {}", dir.display()))?;
        }
    }
    Ok(())
}

/// Read `Vec<Header>` from a **JSON** array.
pub fn read_headers_json<P: AsRef<Path>>(path: P) -> Result<Vec<Header>> {
    let path_ref = path.as_ref();
    let f = File::open(path_ref).with_context(|| format!("open {}", path_ref.display()))?;
    serde_json::from_reader(BufReader::new(f)).context("deserialize JSON headers")
}

/// Write `Vec<Header>` to **JSON** (pretty).
pub fn write_headers_json<P: AsRef<Path>>(path: P, v: &[Header]) -> Result<()> {
    let path_ref = path.as_ref();
    ensure_parent_dir(path_ref)?;
    let f = File::create(path_ref).with_context(|| format!("create {}", path_ref.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, v).context("serialize JSON headers")?;
    w.flush().context("flush JSON writer")?;
    Ok(())
}

/// Read `Vec<Header>` from **CBOR**.
pub fn read_headers_cbor<P: AsRef<Path>>(path: P) -> Result<Vec<Header>> {
    let path_ref = path.as_ref();
    let f = File::open(path_ref).with_context(|| format!("open {}", path_ref.display()))?;
    let mut rdr = BufReader::new(f);
    ciborium::de::from_reader(&mut rdr).context("deserialize CBOR headers")
}

/// Write `Vec<Header>` to **CBOR**.
pub fn write_headers_cbor<P: AsRef<Path>>(path: P, v: &[Header]) -> Result<()> {
    let path_ref = path.as_ref();
    ensure_parent_dir(path_ref)?;
    let f = File::create(path_ref).with_context(|| format!("create {}", path_ref.display()))?;
    let mut w = BufWriter::new(f);
    ciborium::ser::into_writer(v, &mut w).context("serialize CBOR headers")?;
    w.flush().context("flush CBOR writer")?;
    Ok(())
}

/// Auto-detect read by extension `.json` / `.cbor` / `.jsonl` / `.ndjson`.
pub fn read_headers_auto<P: AsRef<Path>>(path: P) -> Result<Vec<Header>> {
    match ext_lower(path.as_ref()).as_deref() {
        Some("json") => read_headers_json(path),
        Some("cbor") => read_headers_cbor(path),
        Some("jsonl" | "ndjson") => crate::io_jsonl::stream_headers_jsonl(path)?.collect(),
        Some(other) => Err(anyhow!(
            "unsupported headers extension: {other} (supported: .json, .cbor, .jsonl)"
        )),
        None => Err(anyhow!(
            "path has no extension (expected .json, .cbor or .jsonl)"
        )),
    }
}

/// Auto-detect write (defaults to **JSON** if unknown or missing).
pub fn write_headers_auto<P: AsRef<Path>>(path: P, v: &[Header]) -> Result<()> {
    match ext_lower(path.as_ref()).as_deref() {
        Some("cbor") => write_headers_cbor(path, v),
        Some("jsonl" | "ndjson") => {
            ensure_parent_dir(path.as_ref())?;
            crate::io_jsonl::write_headers_jsonl(path, v)
        }
        _ => write_headers_json(path, v),
    }
}

/// Boxed iterator over the headers in `path`, in file order.
///
/// `.jsonl` / `.ndjson` stream line by line; `.json` / `.cbor` are loaded
/// first and then iterated.
pub fn stream_headers_auto<P: AsRef<Path>>(
    path: P,
) -> Result<Box<dyn Iterator<Item = Result<Header>> + Send>> {
    let pb = path.as_ref().to_owned();
    match ext_lower(&pb).as_deref() {
        Some("jsonl" | "ndjson") => {
            let it = crate::io_jsonl::stream_headers_jsonl(pb)?;
            Ok(Box::new(it))
        }
        _ => {
            let v = read_headers_auto(&pb)?;
            Ok(Box::new(v.into_iter().map(Ok)))
        }
    }
}

/// Lowercased file extension, if any.
#[inline]
#[must_use]
pub fn ext_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}
