//! Working buffer for headers that have not yet filled a batch.
//!
//! Headers are kept in arrival order together with their leaf values. The
//! buffer never holds `batch_size` entries between calls: the push that
//! fills it also empties it and returns the full [`Batch`]. A partial tail is
//! kept indefinitely; there is no time-based flush.

use std::num::NonZeroUsize;

use blockseal_core::{Digest, Header, HeaderError};

/// A full, finalized batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Batch {
    /// Sequence index, starting at 0.
    pub sequence: usize,
    /// Headers in arrival order.
    pub headers: Vec<Header>,
    /// Leaf values, parallel to `headers`.
    pub leaves: Vec<Digest>,
}

impl Batch {
    /// Height of the first header.
    #[must_use]
    pub fn first_number(&self) -> u64 {
        self.headers.first().map_or(0, |h| h.number)
    }

    /// Height of the last header.
    #[must_use]
    pub fn last_number(&self) -> u64 {
        self.headers.last().map_or(0, |h| h.number)
    }
}

/// Arrival-ordered header buffer. Not synchronized; the owner provides
/// mutual exclusion.
#[derive(Debug)]
pub struct BatchAccumulator {
    batch_size: NonZeroUsize,
    next_sequence: usize,
    headers: Vec<Header>,
    leaves: Vec<Digest>,
}

impl BatchAccumulator {
    /// Empty buffer that cuts batches of `batch_size`.
    #[must_use]
    pub fn new(batch_size: NonZeroUsize) -> Self {
        Self {
            batch_size,
            next_sequence: 0,
            headers: Vec::with_capacity(batch_size.get()),
            leaves: Vec::with_capacity(batch_size.get()),
        }
    }

    /// Append `header`; returns the full batch when this push completes one.
    ///
    /// A header whose hash does not decode is rejected and not buffered.
    pub fn push(&mut self, header: Header) -> Result<Option<Batch>, HeaderError> {
        let leaf = header.leaf_value()?;
        self.headers.push(header);
        self.leaves.push(leaf);

        if self.headers.len() < self.batch_size.get() {
            return Ok(None);
        }

        let cap = self.batch_size.get();
        let batch = Batch {
            sequence: self.next_sequence,
            headers: std::mem::replace(&mut self.headers, Vec::with_capacity(cap)),
            leaves: std::mem::replace(&mut self.leaves, Vec::with_capacity(cap)),
        };
        self.next_sequence += 1;
        Ok(Some(batch))
    }

    /// Headers currently buffered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// `true` when nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Configured batch size.
    #[must_use]
    pub const fn batch_size(&self) -> NonZeroUsize {
        self.batch_size
    }

    /// Sequence index the next full batch will carry.
    #[must_use]
    pub const fn next_sequence(&self) -> usize {
        self.next_sequence
    }

    /// Buffered headers, oldest first.
    #[must_use]
    pub fn pending(&self) -> &[Header] {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockseal_core::generate_headers;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn cuts_every_batch_size_headers() {
        let mut acc = BatchAccumulator::new(nz(3));
        let headers = generate_headers(7, 5);
        let mut batches = Vec::new();
        for h in headers.iter().cloned() {
            if let Some(b) = acc.push(h).unwrap() {
                batches.push(b);
            }
            assert!(acc.len() < 3);
        }
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].sequence, 0);
        assert_eq!(batches[1].sequence, 1);
        assert_eq!(batches[1].headers, headers[3..6]);
        assert_eq!(batches[1].first_number(), 3);
        assert_eq!(batches[1].last_number(), 5);
        assert_eq!(acc.pending(), &headers[6..]);
        assert_eq!(acc.next_sequence(), 2);
    }

    #[test]
    fn batch_size_one_flushes_every_push() {
        let mut acc = BatchAccumulator::new(nz(1));
        for (i, h) in generate_headers(3, 2).into_iter().enumerate() {
            let b = acc.push(h).unwrap().unwrap();
            assert_eq!(b.sequence, i);
            assert_eq!(b.leaves.len(), 1);
            assert!(acc.is_empty());
        }
    }

    #[test]
    fn malformed_header_is_not_buffered() {
        let mut acc = BatchAccumulator::new(nz(2));
        let mut bad = generate_headers(1, 1).remove(0);
        bad.hash = "0x1234".into();
        assert!(acc.push(bad).is_err());
        assert!(acc.is_empty());
    }
}
