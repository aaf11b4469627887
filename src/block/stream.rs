//! Streaming block compression and decompression.
//!
//! Both streaming states own their history window: up to 64 KiB of the most
//! recently seen bytes, re-anchored on every call. The LZ4 format's 64 KiB
//! match distance makes anything older unreachable, so the owned copy is the
//! whole useful state — there is no borrowed prefix whose contiguity or
//! overlap would need tracking, and index rebase thresholds never trigger.

use crate::block::compress::{compress_into, new_hash_table};
use crate::block::decompress::decompress_core;
use crate::block::types::KB;
use crate::error::Lz4Error;

/// Size of the match-history window kept between streaming calls.
const WINDOW_SIZE: usize = 64 * KB;

/// Minimum ring-buffer size for streaming decompression with block sizes up
/// to `max_block_size`.
///
/// A caller decoding into a circular buffer of at least this size can hand
/// successive regions of it to
/// [`decompress_continue`](Lz4StreamDecode::decompress_continue) and wrap
/// around without ever overwriting bytes the 64 KiB match window still
/// needs. The margin of 14 covers the largest unsplittable match tail.
pub fn decoder_ring_buffer_size(max_block_size: usize) -> usize {
    WINDOW_SIZE + 14 + max_block_size
}

/// Append `block` to `window`, keeping only the trailing [`WINDOW_SIZE`]
/// bytes.
fn roll_window(window: &mut Vec<u8>, block: &[u8]) {
    if block.len() >= WINDOW_SIZE {
        window.clear();
        window.extend_from_slice(&block[block.len() - WINDOW_SIZE..]);
    } else {
        window.extend_from_slice(block);
        if window.len() > WINDOW_SIZE {
            let excess = window.len() - WINDOW_SIZE;
            window.drain(..excess);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Streaming compressor
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming block compressor.
///
/// Successive [`compress_continue`](Lz4Stream::compress_continue) calls share
/// match history: each block may reference the previous 64 KiB of input, so
/// the produced blocks must be decompressed in order by a matching
/// [`Lz4StreamDecode`] (or with the preceding data as a dictionary).
pub struct Lz4Stream {
    window: Vec<u8>,
    table: Box<[u32]>,
}

impl Lz4Stream {
    /// Create a fresh streaming compressor with no history.
    pub fn new() -> Result<Self, Lz4Error> {
        Ok(Self {
            window: Vec::new(),
            table: new_hash_table()?,
        })
    }

    /// Drop all history, returning the stream to its freshly-created state.
    pub fn reset(&mut self) {
        self.window.clear();
    }

    /// Cheap reset between independent streams.
    ///
    /// The hash table is rebuilt lazily on the next
    /// [`compress_continue`](Lz4Stream::compress_continue) call, so this is
    /// equivalent to [`reset`](Lz4Stream::reset).
    pub fn reset_fast(&mut self) {
        self.reset();
    }

    /// Load `dictionary` as initial match history.
    ///
    /// Only the last 64 KiB are kept. Returns the number of bytes retained.
    pub fn load_dict(&mut self, dictionary: &[u8]) -> usize {
        self.window.clear();
        let keep = dictionary.len().min(WINDOW_SIZE);
        self.window
            .extend_from_slice(&dictionary[dictionary.len() - keep..]);
        keep
    }

    /// Compress `src` as the next block of the stream.
    ///
    /// Matches may reach back into the history window accumulated by prior
    /// calls (and [`load_dict`](Lz4Stream::load_dict)). Returns the number of
    /// bytes written to `dst`. On error the stream history is unchanged.
    pub fn compress_continue(
        &mut self,
        src: &[u8],
        dst: &mut [u8],
        acceleration: i32,
    ) -> Result<usize, Lz4Error> {
        let written = compress_into(&self.window, src, dst, &mut self.table, acceleration)?;
        roll_window(&mut self.window, src);
        Ok(written)
    }

    /// Copy the current history window into `safe_buffer` and rebase the
    /// stream onto that copy.
    ///
    /// Fails with `Err(Lz4Error::InvalidState)` when `safe_buffer` cannot
    /// hold the current window. Returns the number of bytes saved.
    pub fn save_dict(&mut self, safe_buffer: &mut [u8]) -> Result<usize, Lz4Error> {
        let n = self.window.len().min(WINDOW_SIZE);
        if safe_buffer.len() < n {
            return Err(Lz4Error::InvalidState);
        }
        let start = self.window.len() - n;
        safe_buffer[..n].copy_from_slice(&self.window[start..]);
        // The copy is now the canonical window.
        self.window.drain(..start);
        Ok(n)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Streaming decompressor
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming block decompressor.
///
/// Decodes blocks produced by [`Lz4Stream`] in order, carrying the decoded
/// history forward so cross-block back-references resolve.
#[derive(Default)]
pub struct Lz4StreamDecode {
    window: Vec<u8>,
}

impl Lz4StreamDecode {
    /// Create a fresh streaming decompressor with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the history with `dictionary` (last 64 KiB kept).
    ///
    /// Pass an empty slice to clear the history and start a new stream.
    pub fn set_stream_decode(&mut self, dictionary: &[u8]) {
        self.window.clear();
        let keep = dictionary.len().min(WINDOW_SIZE);
        self.window
            .extend_from_slice(&dictionary[dictionary.len() - keep..]);
    }

    /// Decompress the next block of the stream into `dst`.
    ///
    /// Returns the number of bytes written. On error the history is
    /// unchanged and the stream must be reset before further use.
    pub fn decompress_continue(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, Lz4Error> {
        let target = dst.len();
        let written = decompress_core(src, dst, 0, 0, target, &self.window, false)?;
        roll_window(&mut self.window, &dst[..written]);
        Ok(written)
    }
}
