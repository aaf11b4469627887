//! LZ4 Frame format.
//!
//! The frame container wraps LZ4 blocks with a magic number, a bit-packed
//! descriptor (block size, linking mode, checksum flags, optional content
//! size and dictionary ID), per-block headers, an end marker, and optional
//! XXH32 integrity checksums. Frames are self-terminating and may be
//! concatenated back to back; skippable frames carry opaque payloads.

pub mod compress;
pub mod decompress;
pub mod header;
pub mod types;

pub use compress::{compress_frame, write_skippable_frame};
pub use decompress::{decompress_frame, decompress_frame_to_vec, get_frame_info};
pub use header::{compress_frame_bound, header_size};
pub use types::{
    BlockChecksum, BlockMode, BlockSizeId, ContentChecksum, FrameInfo, FrameType, Preferences,
};

use crate::error::Lz4Error;

/// Compress `src` into a freshly allocated frame with the given preferences.
pub fn compress_frame_to_vec(
    src: &[u8],
    prefs: Option<&Preferences>,
) -> Result<Vec<u8>, Lz4Error> {
    let bound = compress_frame_bound(src.len(), prefs);
    let mut buf: Vec<u8> = Vec::new();
    buf.try_reserve_exact(bound)
        .map_err(|_| Lz4Error::AllocationFailed)?;
    buf.resize(bound, 0);
    let written = compress_frame(src, &mut buf, prefs)?;
    buf.truncate(written);
    Ok(buf)
}
