//! One-shot frame decompression.
//!
//! Drives an explicit stage machine per frame:
//! `ParseHeader → (ReadBlockHeader → CopyOrDecompress →
//! VerifyBlockChecksum?)* → VerifyContentChecksum? → Done`.
//! Skippable frames are consumed transparently, and concatenated frames
//! decode back-to-back into the same output buffer.

use crate::block::decompress::decompress_core;
use crate::block::types::{read_u32_le, KB};
use crate::error::Lz4Error;
use crate::frame::header::{is_skippable_magic, parse_frame_header};
use crate::frame::types::{
    BlockChecksum, BlockMode, ContentChecksum, DecodeStage, FrameInfo,
    LZ4F_BLOCK_UNCOMPRESSED_FLAG,
};
use crate::xxhash::xxh32_oneshot;

/// Decode one standard frame starting at `src`, writing at
/// `dst[out_base..]`. Returns `(input consumed, bytes written)`.
fn decompress_frame_at(
    src: &[u8],
    dst: &mut [u8],
    out_base: usize,
) -> Result<(usize, usize), Lz4Error> {
    let mut stage = DecodeStage::ParseHeader;
    let mut ip = 0usize;
    let mut out = out_base;
    let mut info = FrameInfo::default();
    let mut max_block_size = 0usize;
    let mut block_len = 0usize;
    let mut block_uncompressed = false;
    let mut block_data_start = 0usize;

    loop {
        match stage {
            DecodeStage::ParseHeader => {
                let (fi, consumed) = parse_frame_header(src)?;
                info = fi;
                max_block_size = info.block_size_id.block_size();
                ip = consumed;
                stage = DecodeStage::ReadBlockHeader;
            }

            DecodeStage::ReadBlockHeader => {
                if src.len() - ip < 4 {
                    return Err(Lz4Error::FrameSizeWrong);
                }
                let bh = read_u32_le(src, ip);
                ip += 4;
                if bh == 0 {
                    // End marker (the uncompressed flag is ignored here).
                    stage = if info.content_checksum_flag == ContentChecksum::Enabled {
                        DecodeStage::VerifyContentChecksum
                    } else {
                        DecodeStage::Done
                    };
                } else {
                    block_uncompressed = bh & LZ4F_BLOCK_UNCOMPRESSED_FLAG != 0;
                    block_len = (bh & !LZ4F_BLOCK_UNCOMPRESSED_FLAG) as usize;
                    if block_len > max_block_size {
                        return Err(Lz4Error::MaxBlockSizeInvalid);
                    }
                    stage = DecodeStage::CopyOrDecompress;
                }
            }

            DecodeStage::CopyOrDecompress => {
                if src.len() - ip < block_len {
                    return Err(Lz4Error::FrameSizeWrong);
                }
                block_data_start = ip;
                let block = &src[ip..ip + block_len];
                ip += block_len;

                if block_uncompressed {
                    if dst.len() - out < block_len {
                        return Err(Lz4Error::OutputTooSmall);
                    }
                    dst[out..out + block_len].copy_from_slice(block);
                    out += block_len;
                } else {
                    // Linked blocks may reference earlier output of this
                    // frame; independent blocks may not.
                    let low_prefix = match info.block_mode {
                        BlockMode::Linked => out_base,
                        BlockMode::Independent => out,
                    };
                    let remaining = dst.len() - out;
                    let target = remaining.min(max_block_size);
                    let written =
                        decompress_core(block, dst, out, low_prefix, target, &[], false)
                            .map_err(|e| match e {
                                Lz4Error::CorruptedData => Lz4Error::DecompressionFailed,
                                Lz4Error::OutputTooSmall if remaining > max_block_size => {
                                    // The block claims more than the frame's
                                    // block size allows.
                                    Lz4Error::DecompressionFailed
                                }
                                other => other,
                            })?;
                    out += written;
                }

                stage = if info.block_checksum_flag == BlockChecksum::Enabled {
                    DecodeStage::VerifyBlockChecksum
                } else {
                    DecodeStage::ReadBlockHeader
                };
            }

            DecodeStage::VerifyBlockChecksum => {
                if src.len() - ip < 4 {
                    return Err(Lz4Error::FrameSizeWrong);
                }
                let stored = read_u32_le(src, ip);
                let actual =
                    xxh32_oneshot(&src[block_data_start..block_data_start + block_len], 0);
                if stored != actual {
                    return Err(Lz4Error::BlockChecksumInvalid);
                }
                ip += 4;
                stage = DecodeStage::ReadBlockHeader;
            }

            DecodeStage::VerifyContentChecksum => {
                if src.len() - ip < 4 {
                    return Err(Lz4Error::FrameSizeWrong);
                }
                let stored = read_u32_le(src, ip);
                let actual = xxh32_oneshot(&dst[out_base..out], 0);
                if stored != actual {
                    return Err(Lz4Error::ContentChecksumInvalid);
                }
                ip += 4;
                stage = DecodeStage::Done;
            }

            DecodeStage::Done => {
                if info.content_size != 0 && (out - out_base) as u64 != info.content_size {
                    return Err(Lz4Error::FrameSizeWrong);
                }
                return Ok((ip, out - out_base));
            }
        }
    }
}

/// Decompress the frame(s) in `src` into `dst`.
///
/// Skippable frames are skipped; concatenated frames append to the same
/// output. Returns the total number of bytes written.
pub fn decompress_frame(src: &[u8], dst: &mut [u8]) -> Result<usize, Lz4Error> {
    let mut ip = 0usize;
    let mut out = 0usize;
    while ip < src.len() {
        if src.len() - ip >= 4 && is_skippable_magic(read_u32_le(src, ip)) {
            if src.len() - ip < 8 {
                return Err(Lz4Error::FrameHeaderIncomplete);
            }
            let payload = read_u32_le(src, ip + 4) as usize;
            ip += 8;
            if src.len() - ip < payload {
                return Err(Lz4Error::FrameSizeWrong);
            }
            ip += payload;
            continue;
        }
        let (consumed, written) = decompress_frame_at(&src[ip..], dst, out)?;
        ip += consumed;
        out += written;
    }
    Ok(out)
}

/// Parse the header at `src` without decoding the body.
///
/// Returns the frame parameters and the header size consumed.
pub fn get_frame_info(src: &[u8]) -> Result<(FrameInfo, usize), Lz4Error> {
    parse_frame_header(src)
}

/// Decompress the frame(s) in `src` into a freshly allocated vector.
///
/// Sizes the buffer from the header's content size when recorded, growing
/// geometrically otherwise.
pub fn decompress_frame_to_vec(src: &[u8]) -> Result<Vec<u8>, Lz4Error> {
    let mut capacity = match get_frame_info(src) {
        Ok((info, _)) if info.content_size != 0 => info.content_size as usize,
        _ => src.len().saturating_mul(3).max(64 * KB),
    };
    // A frame cannot legally expand beyond ~255x; anything past that bound
    // means the input itself demands more than it can describe.
    let hard_cap = src.len().saturating_mul(256).saturating_add(64 * KB);
    loop {
        let mut buf: Vec<u8> = Vec::new();
        buf.try_reserve_exact(capacity)
            .map_err(|_| Lz4Error::AllocationFailed)?;
        buf.resize(capacity, 0);
        match decompress_frame(src, &mut buf) {
            Ok(written) => {
                buf.truncate(written);
                return Ok(buf);
            }
            Err(Lz4Error::OutputTooSmall) if capacity < hard_cap => {
                capacity = capacity.saturating_mul(2).min(hard_cap);
            }
            Err(e) => return Err(e),
        }
    }
}
