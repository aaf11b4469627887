//! Frame header encoding, parsing, and sizing.
//!
//! Header layout (multi-byte fields little-endian):
//!
//! | Offset | Size | Content |
//! |--------|------|---------|
//! | 0 | 4 | Magic `0x184D2204` |
//! | 4 | 1 | FLG |
//! | 5 | 1 | BD |
//! | 6 | 0 or 8 | Content size (iff FLG bit 3) |
//! | 6 or 14 | 0 or 4 | Dictionary ID (iff FLG bit 0) |
//! | last | 1 | Header checksum: bits 15..8 of XXH32 over bytes 4.. |
//!
//! FLG bits: 7–6 version (=0b01), 5 block-independence, 4 block-checksum,
//! 3 content-size, 2 content-checksum, 1 reserved, 0 dictID.
//! BD bits: 7 reserved, 6–4 block-size id, 3–0 reserved.

use crate::block::compress::compress_bound;
use crate::block::types::{read_u32_le, read_u64_le, write_u32_le, write_u64_le};
use crate::error::Lz4Error;
use crate::frame::types::{
    BlockChecksum, BlockMode, BlockSizeId, ContentChecksum, FrameInfo, FrameType, Preferences,
    BF_SIZE, BH_SIZE, LZ4F_MAGIC_NUMBER, LZ4F_MAGIC_SKIPPABLE_MASK, LZ4F_MAGIC_SKIPPABLE_START,
    MAX_FH_SIZE, MIN_FH_SIZE,
};
use crate::xxhash::xxh32_oneshot;

/// One-byte header checksum: bits 15..8 of XXH32 (seed 0) over the
/// descriptor bytes.
#[inline]
pub fn header_checksum(descriptor: &[u8]) -> u8 {
    ((xxh32_oneshot(descriptor, 0) >> 8) & 0xFF) as u8
}

/// Returns true for a magic in the skippable range.
#[inline]
pub(crate) fn is_skippable_magic(magic: u32) -> bool {
    magic & LZ4F_MAGIC_SKIPPABLE_MASK == LZ4F_MAGIC_SKIPPABLE_START
}

/// Size in bytes of the frame header starting at `src`.
///
/// Needs at least 5 input bytes to decide. Skippable frames report their
/// fixed 8-byte prologue.
pub fn header_size(src: &[u8]) -> Result<usize, Lz4Error> {
    if src.len() < 5 {
        return Err(Lz4Error::FrameHeaderIncomplete);
    }
    let magic = read_u32_le(src, 0);
    if is_skippable_magic(magic) {
        return Ok(8);
    }
    if magic != LZ4F_MAGIC_NUMBER {
        return Err(Lz4Error::FrameTypeUnknown);
    }
    let flg = src[4];
    let mut size = MIN_FH_SIZE;
    if flg & 0x08 != 0 {
        size += 8; // content size
    }
    if flg & 0x01 != 0 {
        size += 4; // dict ID
    }
    Ok(size)
}

/// Parse and validate a standard frame header.
///
/// Returns the decoded [`FrameInfo`] and the header length consumed.
pub fn parse_frame_header(src: &[u8]) -> Result<(FrameInfo, usize), Lz4Error> {
    let size = header_size(src)?;
    let magic = read_u32_le(src, 0);
    if is_skippable_magic(magic) {
        if src.len() < 8 {
            return Err(Lz4Error::FrameHeaderIncomplete);
        }
        let info = FrameInfo {
            frame_type: FrameType::SkippableFrame,
            ..FrameInfo::default()
        };
        return Ok((info, 8));
    }
    if src.len() < size {
        return Err(Lz4Error::FrameHeaderIncomplete);
    }

    let flg = src[4];
    let bd = src[5];
    if flg >> 6 != 0b01 {
        return Err(Lz4Error::HeaderVersionWrong);
    }
    if flg & 0x02 != 0 || bd & 0x80 != 0 || bd & 0x0F != 0 {
        return Err(Lz4Error::ReservedFlagSet);
    }
    let block_size_id = BlockSizeId::from_bits((bd >> 4) as u32 & 0x07)?;

    let stored = src[size - 1];
    if header_checksum(&src[4..size - 1]) != stored {
        return Err(Lz4Error::HeaderChecksumInvalid);
    }

    let mut offset = 6;
    let content_size = if flg & 0x08 != 0 {
        let v = read_u64_le(src, offset);
        offset += 8;
        v
    } else {
        0
    };
    let dict_id = if flg & 0x01 != 0 {
        let v = read_u32_le(src, offset);
        offset += 4;
        v
    } else {
        0
    };
    debug_assert_eq!(offset + 1, size);

    let info = FrameInfo {
        block_size_id,
        block_mode: if flg & 0x20 != 0 {
            BlockMode::Independent
        } else {
            BlockMode::Linked
        },
        content_checksum_flag: if flg & 0x04 != 0 {
            ContentChecksum::Enabled
        } else {
            ContentChecksum::Disabled
        },
        frame_type: FrameType::Frame,
        content_size,
        dict_id,
        block_checksum_flag: if flg & 0x10 != 0 {
            BlockChecksum::Enabled
        } else {
            BlockChecksum::Disabled
        },
    };
    Ok((info, size))
}

/// Serialize a frame header for `info` at `dst[*op..]`, advancing `*op`.
pub(crate) fn write_frame_header(
    dst: &mut [u8],
    op: &mut usize,
    info: &FrameInfo,
) -> Result<(), Lz4Error> {
    let mut size = MIN_FH_SIZE;
    if info.content_size != 0 {
        size += 8;
    }
    if info.dict_id != 0 {
        size += 4;
    }
    if *op + size > dst.len() {
        return Err(Lz4Error::OutputTooSmall);
    }

    let base = *op;
    write_u32_le(dst, base, LZ4F_MAGIC_NUMBER);
    let mut flg = 0b0100_0000u8; // version 01
    if info.block_mode == BlockMode::Independent {
        flg |= 0x20;
    }
    if info.block_checksum_flag == BlockChecksum::Enabled {
        flg |= 0x10;
    }
    if info.content_size != 0 {
        flg |= 0x08;
    }
    if info.content_checksum_flag == ContentChecksum::Enabled {
        flg |= 0x04;
    }
    if info.dict_id != 0 {
        flg |= 0x01;
    }
    dst[base + 4] = flg;
    let bsid = match info.block_size_id {
        BlockSizeId::Default => BlockSizeId::Max64Kb,
        other => other,
    };
    dst[base + 5] = ((bsid as u32) << 4) as u8;

    let mut offset = base + 6;
    if info.content_size != 0 {
        write_u64_le(dst, offset, info.content_size);
        offset += 8;
    }
    if info.dict_id != 0 {
        write_u32_le(dst, offset, info.dict_id);
        offset += 4;
    }
    dst[offset] = header_checksum(&dst[base + 4..offset]);
    *op = offset + 1;
    Ok(())
}

/// Worst-case frame size for compressing `src_size` bytes under `prefs`.
///
/// `header_max + ceil(n / blockSize) * (4 + compress_bound(blockSize) +
/// optional block checksum) + end marker + optional content checksum`.
pub fn compress_frame_bound(src_size: usize, prefs: Option<&Preferences>) -> usize {
    let prefs = prefs.copied().unwrap_or_default();
    let bsid = prefs
        .frame_info
        .block_size_id
        .optimal_for(src_size);
    let block_size = bsid.block_size();
    let nb_blocks = (src_size + block_size - 1) / block_size;
    let per_block_checksum = match prefs.frame_info.block_checksum_flag {
        BlockChecksum::Enabled => BF_SIZE,
        BlockChecksum::Disabled => 0,
    };
    let content_checksum = match prefs.frame_info.content_checksum_flag {
        ContentChecksum::Enabled => BF_SIZE,
        ContentChecksum::Disabled => 0,
    };
    MAX_FH_SIZE
        + nb_blocks * (BH_SIZE + compress_bound(block_size) + per_block_checksum)
        + BH_SIZE
        + content_checksum
}
