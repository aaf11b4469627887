//! Crate-wide error type.
//!
//! Every fallible operation in this crate — block codec, streaming state, and
//! frame container — reports through the single [`Lz4Error`] sum type. Errors
//! are terminal for the operation that produced them: no partial output length
//! is reported, and callers must discard the destination buffer contents.

use thiserror::Error;

/// Errors returned by LZ4 block, streaming, and frame operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lz4Error {
    /// The destination buffer cannot hold the required bytes.
    #[error("destination buffer is too small for the produced output")]
    OutputTooSmall,

    /// The input exceeds the maximum encodable block size (0x7E000000 bytes).
    #[error("input exceeds the maximum LZ4 block size")]
    InputTooLarge,

    /// Malformed block data: bad token, zero offset, offset beyond the
    /// dictionary + prefix window, or a truncated sequence.
    #[error("compressed block data is corrupted")]
    CorruptedData,

    /// A block inside a frame failed to decompress.
    #[error("block decompression failed inside a frame")]
    DecompressionFailed,

    /// The input is too short to contain a complete frame header.
    #[error("frame header is incomplete")]
    FrameHeaderIncomplete,

    /// The frame magic number is not recognized.
    #[error("unknown frame magic number")]
    FrameTypeUnknown,

    /// The frame body is truncated: a block, block checksum, or content
    /// checksum ends past the available input.
    #[error("frame size does not match its declared contents")]
    FrameSizeWrong,

    /// The frame header version field is not the supported version (01).
    #[error("unsupported frame header version")]
    HeaderVersionWrong,

    /// A reserved bit in FLG or BD is set.
    #[error("reserved frame header bit is set")]
    ReservedFlagSet,

    /// The BD block-size identifier is outside the valid range 4..=7.
    #[error("invalid maximum block size identifier")]
    MaxBlockSizeInvalid,

    /// The one-byte frame header checksum does not match.
    #[error("frame header checksum mismatch")]
    HeaderChecksumInvalid,

    /// A per-block XXH32 checksum does not match the stored block bytes.
    #[error("block checksum mismatch")]
    BlockChecksumInvalid,

    /// The whole-frame XXH32 content checksum does not match.
    #[error("content checksum mismatch")]
    ContentChecksumInvalid,

    /// The allocator refused a request for working memory.
    #[error("memory allocation failed")]
    AllocationFailed,

    /// Streaming API misuse, e.g. an external state buffer too small to hold
    /// the requested dictionary.
    #[error("streaming state misuse")]
    InvalidState,
}
