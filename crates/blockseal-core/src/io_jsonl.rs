//! JSON Lines (NDJSON) helpers for streaming `Header` I/O.
//!
//! A header subscription is naturally line-delimited: one JSON object per
//! header, in arrival order. The reader owns its file so the iterator can be
//! moved into a producer task; each item carries its line number on failure.
//!
//! `.jsonl` and `.ndjson` are treated as equivalent.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::Header;

/// Owning JSONL iterator over `Header`.
pub struct JsonlHeaderIter {
    rdr: BufReader<File>,
    buf: String,
    line_no: usize,
}

impl JsonlHeaderIter {
    fn new(file: File) -> Self {
        Self {
            rdr: BufReader::new(file),
            buf: String::with_capacity(1 << 10),
            line_no: 0,
        }
    }
}

impl Iterator for JsonlHeaderIter {
    type Item = Result<Header>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.rdr.read_line(&mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                self.line_no += 1;
                let line = self.buf.trim_end_matches(['\n', '\r']);
                if line.is_empty() {
                    return Some(Err(anyhow::anyhow!(
                        "parse jsonl line {}: empty line",
                        self.line_no
                    )));
                }
                Some(
                    serde_json::from_str::<Header>(line)
                        .with_context(|| format!("parse jsonl line {}", self.line_no)),
                )
            }
            Err(e) => Some(Err(e).with_context(|| format!("read line {}", self.line_no + 1))),
        }
    }
}

/// Stream headers from a JSONL file, one object per line.
pub fn stream_headers_jsonl<P: AsRef<Path>>(path: P) -> Result<JsonlHeaderIter> {
    let f = File::open(path.as_ref())
        .with_context(|| format!("open {}", path.as_ref().display()))?;
    Ok(JsonlHeaderIter::new(f))
}

/// Write headers as JSON Lines.
pub fn write_headers_jsonl<P: AsRef<Path>>(path: P, headers: &[Header]) -> Result<()> {
    let f = File::create(path.as_ref())
        .with_context(|| format!("create {}", path.as_ref().display()))?;
    let mut w = BufWriter::new(f);
    for h in headers {
        serde_json::to_writer(&mut w, h).context("serialize header to json")?;
        w.write_all(b"\n").context("write newline")?;
    }
    w.flush().context("flush writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_headers;
    use std::io::Write as _;

    fn tmp_path(tag: &str) -> std::path::PathBuf {
        use std::time::{SystemTime, UNIX_EPOCH};
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("blockseal_jsonl_{tag}_{nanos}.jsonl"))
    }

    #[test]
    fn streams_in_file_order() {
        let p = tmp_path("order");
        let headers = generate_headers(5, 1);
        write_headers_jsonl(&p, &headers).unwrap();

        let back: Vec<Header> = stream_headers_jsonl(&p)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(back, headers);
        let _ = std::fs::remove_file(p);
    }

    #[test]
    fn bad_line_reports_line_number() {
        let p = tmp_path("bad");
        {
            let mut f = File::create(&p).unwrap();
            let h = &generate_headers(1, 1)[0];
            writeln!(f, "{}", serde_json::to_string(h).unwrap()).unwrap();
            writeln!(f, "{{\"number\": \"nope\"}}").unwrap();
        }
        let items: Vec<Result<Header>> = stream_headers_jsonl(&p).unwrap().collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        let err = items[1].as_ref().unwrap_err().to_string();
        assert!(err.contains("line 2"), "{err}");
        let _ = std::fs::remove_file(p);
    }
}
