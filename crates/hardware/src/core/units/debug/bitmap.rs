//! Sparse bitmap.
//!
//! One bit per word of the 26-bit address space (2^24 bits) split into
//! fixed-size chunks. A chunk is allocated the first time a bit inside it is
//! set, so an empty bitmap costs one pointer per chunk.

use std::fmt;

/// Number of bits addressed by the bitmap.
pub const BITMAP_BITS: u32 = 1 << 24;

/// log2 of the number of bits held by one chunk.
const CHUNK_BITS_LOG2: u32 = 15;

/// 64-bit words per chunk.
const CHUNK_WORDS: usize = 1 << (CHUNK_BITS_LOG2 - 6);

/// Number of chunks covering the whole bitmap.
const NUM_CHUNKS: usize = (BITMAP_BITS >> CHUNK_BITS_LOG2) as usize;

type Chunk = Box<[u64; CHUNK_WORDS]>;

/// A demand-allocated bitmap over word indices.
#[derive(Clone, PartialEq, Eq)]
pub struct SparseBitmap {
    chunks: Vec<Option<Chunk>>,
}

const fn locate(index: u32) -> (usize, usize, u64) {
    let chunk = (index >> CHUNK_BITS_LOG2) as usize;
    let word = ((index >> 6) as usize) & (CHUNK_WORDS - 1);
    (chunk, word, 1 << (index & 0x3f))
}

impl SparseBitmap {
    /// Creates an empty bitmap with no chunks allocated.
    pub fn new() -> Self {
        Self {
            chunks: vec![None; NUM_CHUNKS],
        }
    }

    /// Returns the bit at `index`. Indices beyond the bitmap read as clear.
    pub fn get(&self, index: u32) -> bool {
        if index >= BITMAP_BITS {
            return false;
        }
        let (chunk, word, mask) = locate(index);
        self.chunks[chunk]
            .as_ref()
            .is_some_and(|bits| bits[word] & mask != 0)
    }

    /// Sets the bit at `index`, allocating its chunk if needed.
    ///
    /// Indices beyond the bitmap are ignored.
    pub fn set(&mut self, index: u32) {
        if index >= BITMAP_BITS {
            return;
        }
        let (chunk, word, mask) = locate(index);
        let bits = self.chunks[chunk].get_or_insert_with(|| Box::new([0; CHUNK_WORDS]));
        bits[word] |= mask;
    }

    /// Clears the bit at `index`. Never allocates.
    pub fn clear(&mut self, index: u32) {
        if index >= BITMAP_BITS {
            return;
        }
        let (chunk, word, mask) = locate(index);
        if let Some(bits) = self.chunks[chunk].as_mut() {
            bits[word] &= !mask;
        }
    }

    /// Drops every chunk, clearing all bits.
    pub fn reset(&mut self) {
        self.chunks.iter_mut().for_each(|chunk| *chunk = None);
    }

    /// Returns the number of chunks currently allocated.
    pub fn allocated_chunks(&self) -> usize {
        self.chunks.iter().filter(|chunk| chunk.is_some()).count()
    }

    /// Returns `true` if no bit is set.
    pub fn is_empty(&self) -> bool {
        self.chunks
            .iter()
            .flatten()
            .all(|bits| bits.iter().all(|&word| word == 0))
    }
}

impl Default for SparseBitmap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SparseBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparseBitmap")
            .field("allocated_chunks", &self.allocated_chunks())
            .finish()
    }
}
