//! Lookup of ingested headers by hash or by height.
//!
//! Keys are normalized (lowercase, no `0x`). Last write wins for both maps;
//! nothing here deduplicates what reaches the committer.

use std::collections::HashMap;

use blockseal_core::Header;
use parking_lot::RwLock;

#[derive(Debug, Default)]
struct Maps {
    by_hash: HashMap<String, Header>,
    by_number: HashMap<u64, Header>,
}

/// Thread-safe header index.
#[derive(Debug, Default)]
pub struct HeaderIndex {
    maps: RwLock<Maps>,
}

fn normalize(hash: &str) -> String {
    let body = hash
        .strip_prefix("0x")
        .or_else(|| hash.strip_prefix("0X"))
        .unwrap_or(hash);
    body.to_ascii_lowercase()
}

impl HeaderIndex {
    /// Empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `header` under its hash and its number.
    pub fn insert(&self, header: &Header) {
        let mut maps = self.maps.write();
        maps.by_hash.insert(normalize(&header.hash), header.clone());
        maps.by_number.insert(header.number, header.clone());
    }

    /// Header with this hash (any case, prefix optional).
    #[must_use]
    pub fn get_by_hash(&self, hash: &str) -> Option<Header> {
        self.maps.read().by_hash.get(&normalize(hash)).cloned()
    }

    /// Most recently ingested header at this height.
    #[must_use]
    pub fn get_by_number(&self, number: u64) -> Option<Header> {
        self.maps.read().by_number.get(&number).cloned()
    }

    /// Distinct hashes seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.maps.read().by_hash.len()
    }

    /// `true` before the first insert.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.maps.read().by_hash.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockseal_core::generate_headers;

    #[test]
    fn lookup_ignores_case_and_prefix() {
        let idx = HeaderIndex::new();
        let h = generate_headers(1, 4).remove(0);
        idx.insert(&h);

        let bare = h.hash.trim_start_matches("0x").to_ascii_uppercase();
        assert_eq!(idx.get_by_hash(&bare), Some(h.clone()));
        assert_eq!(idx.get_by_hash(&h.hash), Some(h.clone()));
        assert_eq!(idx.get_by_number(0), Some(h));
        assert_eq!(idx.get_by_number(1), None);
    }

    #[test]
    fn same_height_last_write_wins() {
        let idx = HeaderIndex::new();
        let a = generate_headers(1, 1).remove(0);
        let b = generate_headers(1, 2).remove(0);
        idx.insert(&a);
        idx.insert(&b);
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.get_by_number(0), Some(b));
        assert_eq!(idx.get_by_hash(&a.hash), Some(a));
    }
}
