//! `lz4x` — a pure-Rust, memory-safe implementation of the LZ4 block and
//! frame formats.
//!
//! The crate produces and consumes the standard LZ4 wire formats: the block
//! codec (fast mode and the High-Compression strategies), streaming states
//! that carry match history across block boundaries, and the Frame container
//! with its descriptors, checksums, and end marker.
//!
//! # Crate layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | `block` | Block compression/decompression and streaming states. |
//! | `hc` | High-compression strategies (LZ4MID, LZ4HC, LZ4OPT). |
//! | `frame` | LZ4 Frame format (magic, descriptors, checksums). |
//! | `xxhash` | XXH32 checksum wrapper. |
//! | `error` | The crate-wide error type. |
//!
//! # Quick start
//!
//! ```
//! use lz4x::{compress_frame_to_vec, decompress_frame_to_vec};
//!
//! let data = b"an example payload, an example payload, an example payload";
//! let frame = compress_frame_to_vec(data, None).unwrap();
//! let restored = decompress_frame_to_vec(&frame).unwrap();
//! assert_eq!(&restored, data);
//! ```
//!
//! All history addressing goes through a unified index space over byte
//! slices; the crate contains no `unsafe` code.

#![forbid(unsafe_code)]

pub mod block;
pub mod error;
pub mod frame;
pub mod hc;
pub mod xxhash;

pub use error::Lz4Error;

// Block API
pub use block::{
    compress_bound, compress_default, compress_dest_size, compress_fast,
    decoder_ring_buffer_size, decompress_safe, decompress_safe_partial,
    decompress_safe_using_dict, Lz4Stream, Lz4StreamDecode, LZ4_ACCELERATION_DEFAULT,
    LZ4_ACCELERATION_MAX, LZ4_DISTANCE_MAX, LZ4_MAX_INPUT_SIZE,
};

// HC API
pub use hc::{
    compress_hc, LZ4HC_CLEVEL_DEFAULT, LZ4HC_CLEVEL_MAX, LZ4HC_CLEVEL_MIN, LZ4HC_CLEVEL_OPT_MIN,
};

// Frame API
pub use frame::{
    compress_frame, compress_frame_bound, compress_frame_to_vec, decompress_frame,
    decompress_frame_to_vec, get_frame_info, header_size, write_skippable_frame, BlockChecksum,
    BlockMode, BlockSizeId, ContentChecksum, FrameInfo, FrameType, Preferences,
};

pub use xxhash::xxh32_oneshot;
