//! Index-space partitioning.
//!
//! The ordered sequence of chunks exactly covers `[0, total)`: no gaps,
//! no overlaps, ascending, final chunk truncated when `total` is not a
//! multiple of the chunk size.

/// A contiguous half-open range `[start, end)` of candidate indices,
/// assigned to a worker as one unit of work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub start: u64,
    pub end: u64,
}

impl Chunk {
    #[inline]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Lazy ascending chunk iterator over `[0, total)`.
///
/// Cloning before iteration restarts the sequence from the beginning.
/// `chunk_size == 0` is a configuration error caught by
/// `SearchConfig::validate`, never passed down here.
#[derive(Clone, Debug)]
pub struct Chunks {
    next_start: u64,
    total: u64,
    chunk_size: u64,
}

impl Chunks {
    pub fn new(total: u64, chunk_size: u64) -> Self {
        debug_assert!(chunk_size > 0);
        Self {
            next_start: 0,
            total,
            chunk_size,
        }
    }
}

impl Iterator for Chunks {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.next_start >= self.total {
            return None;
        }
        let start = self.next_start;
        let end = self.total.min(start.saturating_add(self.chunk_size));
        self.next_start = end;
        Some(Chunk { start, end })
    }
}
