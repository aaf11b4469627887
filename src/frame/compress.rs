//! One-shot frame compression.
//!
//! Chunks the input at the frame's block size, compresses each chunk with
//! the codec selected by the compression level, and falls back to storing a
//! chunk verbatim whenever compression would not shrink it. Linked mode
//! feeds each block the previous 64 KiB of input as dictionary.

use crate::block::compress::{compress_into, new_hash_table};
use crate::block::types::{write_u32_le, KB};
use crate::error::Lz4Error;
use crate::frame::header::write_frame_header;
use crate::frame::types::{
    BlockChecksum, BlockMode, ContentChecksum, Preferences, LZ4F_BLOCK_UNCOMPRESSED_FLAG,
    LZ4F_MAGIC_SKIPPABLE_START,
};
use crate::hc::types::HcState;
use crate::hc::{compress_hc_into, LZ4HC_CLEVEL_MIN};
use crate::xxhash::xxh32_oneshot;

/// History window visible to linked-mode blocks.
const LINK_WINDOW: usize = 64 * KB;

enum BlockCodec {
    Fast { table: Box<[u32]>, acceleration: i32 },
    Hc { state: HcState },
}

impl BlockCodec {
    fn for_level(level: i32) -> Result<Self, Lz4Error> {
        if level < LZ4HC_CLEVEL_MIN {
            // Levels below the HC range select the fast codec; negative
            // levels raise its acceleration.
            let acceleration = if level < 0 { 1 - level } else { 1 };
            Ok(BlockCodec::Fast {
                table: new_hash_table()?,
                acceleration,
            })
        } else {
            Ok(BlockCodec::Hc {
                state: HcState::new(level)?,
            })
        }
    }

    fn compress(
        &mut self,
        dict: &[u8],
        chunk: &[u8],
        dst: &mut [u8],
        favor_dec_speed: bool,
    ) -> Result<usize, Lz4Error> {
        match self {
            BlockCodec::Fast {
                table,
                acceleration,
            } => compress_into(dict, chunk, dst, table, *acceleration),
            BlockCodec::Hc { state } => {
                compress_hc_into(state, dict, chunk, dst, favor_dec_speed)
            }
        }
    }
}

/// Compress `src` into a complete LZ4 frame in `dst`.
///
/// Returns the number of bytes written (header through trailing checksum).
/// `None` preferences mean defaults: linked 64 KiB blocks, no checksums,
/// fast codec.
pub fn compress_frame(
    src: &[u8],
    dst: &mut [u8],
    prefs: Option<&Preferences>,
) -> Result<usize, Lz4Error> {
    let mut prefs = prefs.copied().unwrap_or_default();
    prefs.frame_info.block_size_id = prefs.frame_info.block_size_id.optimal_for(src.len());
    if prefs.frame_info.content_size != 0 {
        // The header records the true content size, whatever hint was given.
        prefs.frame_info.content_size = src.len() as u64;
    }
    let block_size = prefs.frame_info.block_size_id.block_size();
    let linked = prefs.frame_info.block_mode == BlockMode::Linked;
    let block_checksums = prefs.frame_info.block_checksum_flag == BlockChecksum::Enabled;

    let mut op = 0usize;
    write_frame_header(dst, &mut op, &prefs.frame_info)?;

    let mut codec = BlockCodec::for_level(prefs.compression_level)?;

    let mut pos = 0usize;
    while pos < src.len() {
        let end = (pos + block_size).min(src.len());
        let chunk = &src[pos..end];
        let raw_len = chunk.len();
        let dict: &[u8] = if linked && pos > 0 {
            &src[pos - pos.min(LINK_WINDOW)..pos]
        } else {
            &[]
        };

        if op + 4 > dst.len() {
            return Err(Lz4Error::OutputTooSmall);
        }
        let data_start = op + 4;
        let avail = dst.len() - data_start;
        // Cap the compressor at one byte under the raw size: anything that
        // does not beat verbatim storage is stored verbatim.
        let window = avail.min(raw_len - 1);

        let (stored_len, block_header) = match codec.compress(
            dict,
            chunk,
            &mut dst[data_start..data_start + window],
            prefs.favor_dec_speed,
        ) {
            Ok(n) => (n, n as u32),
            Err(Lz4Error::OutputTooSmall) => {
                if avail < raw_len {
                    return Err(Lz4Error::OutputTooSmall);
                }
                dst[data_start..data_start + raw_len].copy_from_slice(chunk);
                (raw_len, raw_len as u32 | LZ4F_BLOCK_UNCOMPRESSED_FLAG)
            }
            Err(other) => return Err(other),
        };

        write_u32_le(dst, op, block_header);
        op = data_start + stored_len;

        if block_checksums {
            if op + 4 > dst.len() {
                return Err(Lz4Error::OutputTooSmall);
            }
            let checksum = xxh32_oneshot(&dst[data_start..data_start + stored_len], 0);
            write_u32_le(dst, op, checksum);
            op += 4;
        }
        pos = end;
    }

    // End marker.
    if op + 4 > dst.len() {
        return Err(Lz4Error::OutputTooSmall);
    }
    write_u32_le(dst, op, 0);
    op += 4;

    if prefs.frame_info.content_checksum_flag == ContentChecksum::Enabled {
        if op + 4 > dst.len() {
            return Err(Lz4Error::OutputTooSmall);
        }
        write_u32_le(dst, op, xxh32_oneshot(src, 0));
        op += 4;
    }

    Ok(op)
}

/// Write a skippable frame carrying `payload`.
///
/// `sub_magic` selects one of the 16 skippable magic values (low nibble).
pub fn write_skippable_frame(
    payload: &[u8],
    dst: &mut [u8],
    sub_magic: u8,
) -> Result<usize, Lz4Error> {
    if payload.len() > u32::MAX as usize {
        return Err(Lz4Error::InputTooLarge);
    }
    let total = 8 + payload.len();
    if dst.len() < total {
        return Err(Lz4Error::OutputTooSmall);
    }
    write_u32_le(dst, 0, LZ4F_MAGIC_SKIPPABLE_START + (sub_magic & 0x0F) as u32);
    write_u32_le(dst, 4, payload.len() as u32);
    dst[8..total].copy_from_slice(payload);
    Ok(total)
}
