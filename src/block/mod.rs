//! LZ4 block compression and decompression.
//!
//! The block format is the inner codec of LZ4: a byte stream of sequences,
//! each a token, a literal run, a 16-bit back-reference offset, and a match
//! length. This module holds the fast compressor, the safe decompressor used
//! by every mode, and the streaming states that carry match history across
//! block boundaries.

pub mod compress;
pub mod decompress;
pub mod encode;
pub mod stream;
pub mod types;

pub use compress::{compress_bound, compress_default, compress_dest_size, compress_fast};
pub use decompress::{decompress_safe, decompress_safe_partial, decompress_safe_using_dict};
pub use stream::{decoder_ring_buffer_size, Lz4Stream, Lz4StreamDecode};
pub use types::{
    LZ4_ACCELERATION_DEFAULT, LZ4_ACCELERATION_MAX, LZ4_DISTANCE_MAX, LZ4_MAX_INPUT_SIZE,
};
