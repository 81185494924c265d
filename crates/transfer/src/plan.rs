use std::ops::Range;

use crate::TransferError;

/// Partition of a file into fixed-size chunk byte ranges.
///
/// The ranges exactly tile `[0, file_size)` with no gaps or overlaps; the
/// last range may be shorter than `chunk_size`. Pure offset arithmetic, no
/// I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    file_size: u64,
    chunk_size: u64,
}

impl ChunkPlan {
    /// Creates a plan for `file_size` bytes split into `chunk_size` pieces.
    pub fn new(file_size: u64, chunk_size: u64) -> Result<Self, TransferError> {
        if chunk_size == 0 {
            return Err(TransferError::ZeroChunkSize);
        }
        Ok(Self {
            file_size,
            chunk_size,
        })
    }

    /// Number of chunks: `ceil(file_size / chunk_size)`.
    pub fn total_chunks(&self) -> u64 {
        self.file_size.div_ceil(self.chunk_size)
    }

    /// Chunk size in bytes (the last chunk may carry fewer).
    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Total file size in bytes.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Byte range `[start, end)` of chunk `index`, or `None` past the end.
    pub fn range(&self, index: u64) -> Option<Range<u64>> {
        if index >= self.total_chunks() {
            return None;
        }
        let start = index * self.chunk_size;
        Some(start..(start + self.chunk_size).min(self.file_size))
    }

    /// Iterates all chunk ranges in ascending index order.
    pub fn ranges(&self) -> impl Iterator<Item = Range<u64>> {
        let plan = *self;
        (0..plan.total_chunks()).map(move |i| {
            let start = i * plan.chunk_size;
            start..(start + plan.chunk_size).min(plan.file_size)
        })
    }
}
