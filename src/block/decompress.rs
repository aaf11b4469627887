//! Safe LZ4 block decompressor.
//!
//! One core loop serves every mode: full-block decode, partial decode capped
//! at a target length, in-buffer prefix history (linked frames), and external
//! dictionaries. Malformed or truncated input returns
//! `Err(Lz4Error::CorruptedData)` — it must never panic, read out of bounds,
//! or write past the requested target.

use crate::block::types::{read_u16_le, MINMATCH, ML_BITS, ML_MASK, RUN_MASK};
use crate::error::Lz4Error;

/// Decode an extended length: a run of 0xFF bytes terminated by a byte
/// < 255, summed onto `base`.
#[inline(always)]
fn read_length_extension(src: &[u8], ip: &mut usize, base: usize) -> Result<usize, Lz4Error> {
    let mut len = base;
    loop {
        if *ip >= src.len() {
            return Err(Lz4Error::CorruptedData);
        }
        let b = src[*ip];
        *ip += 1;
        len += b as usize;
        if b != 255 {
            return Ok(len);
        }
    }
}

/// Core decompression loop.
///
/// * `dst[low_prefix..out_start]` holds already-decoded history that matches
///   may reference (the in-buffer prefix).
/// * `ext_dict` is a non-contiguous history region logically located just
///   before the prefix.
/// * At most `target` bytes are written, starting at `out_start`. With
///   `partial` set the decoder stops cleanly once the target is reached;
///   otherwise running out of room is an error.
///
/// Returns the number of bytes written.
pub(crate) fn decompress_core(
    src: &[u8],
    dst: &mut [u8],
    out_start: usize,
    low_prefix: usize,
    target: usize,
    ext_dict: &[u8],
    partial: bool,
) -> Result<usize, Lz4Error> {
    debug_assert!(low_prefix <= out_start);
    let oend = out_start + target.min(dst.len() - out_start);
    let mut ip = 0usize;
    let mut op = out_start;

    if src.is_empty() {
        return Ok(0);
    }

    loop {
        if ip >= src.len() {
            // A block must end with a literals-only sequence, never a match.
            return Err(Lz4Error::CorruptedData);
        }
        let token = src[ip];
        ip += 1;

        // ── Literals ─────────────────────────────────────────────────────
        let mut lit_len = (token >> ML_BITS) as usize;
        if lit_len == RUN_MASK {
            lit_len = read_length_extension(src, &mut ip, lit_len)?;
        }
        if lit_len > 0 {
            if ip + lit_len > src.len() {
                return Err(Lz4Error::CorruptedData);
            }
            let avail = oend - op;
            if lit_len > avail {
                if partial {
                    dst[op..oend].copy_from_slice(&src[ip..ip + avail]);
                    return Ok(oend - out_start);
                }
                return Err(Lz4Error::OutputTooSmall);
            }
            dst[op..op + lit_len].copy_from_slice(&src[ip..ip + lit_len]);
            ip += lit_len;
            op += lit_len;
        }

        // The final sequence carries no match: literals run to the end of
        // the input.
        if ip == src.len() {
            return Ok(op - out_start);
        }
        if partial && op >= oend {
            return Ok(op - out_start);
        }

        // ── Offset and match length ──────────────────────────────────────
        if ip + 2 > src.len() {
            return Err(Lz4Error::CorruptedData);
        }
        let offset = read_u16_le(src, ip) as usize;
        ip += 2;
        if offset == 0 {
            return Err(Lz4Error::CorruptedData);
        }
        let mut match_len = (token & ML_MASK as u8) as usize;
        if match_len == ML_MASK {
            match_len = read_length_extension(src, &mut ip, match_len)?;
        }
        match_len += MINMATCH;

        let avail = oend - op;
        let copy_len = if match_len > avail {
            if !partial {
                return Err(Lz4Error::OutputTooSmall);
            }
            avail
        } else {
            match_len
        };

        // ── Match copy ───────────────────────────────────────────────────
        let prefix_avail = op - low_prefix;
        if offset <= prefix_avail {
            // Source lies entirely within the output buffer.
            let mstart = op - offset;
            if offset >= copy_len {
                dst.copy_within(mstart..mstart + copy_len, op);
                op += copy_len;
            } else {
                // Overlapping back-reference: byte-wise copy replicates the
                // pattern (RLE for any stride ≥ 1).
                for k in 0..copy_len {
                    dst[op + k] = dst[mstart + k];
                }
                op += copy_len;
            }
        } else {
            // Match starts in the external dictionary.
            let needed = offset - prefix_avail;
            if ext_dict.is_empty() || needed > ext_dict.len() {
                return Err(Lz4Error::CorruptedData);
            }
            let dict_start = ext_dict.len() - needed;
            let dict_part = copy_len.min(needed);
            dst[op..op + dict_part]
                .copy_from_slice(&ext_dict[dict_start..dict_start + dict_part]);
            op += dict_part;
            // The remainder continues at the start of the prefix; byte-wise
            // since it may have caught up with the write cursor.
            let rest = copy_len - dict_part;
            for k in 0..rest {
                dst[op + k] = dst[low_prefix + k];
            }
            op += rest;
        }

        if copy_len < match_len {
            // Partial mode truncated the match at the target.
            return Ok(op - out_start);
        }
        if partial && op >= oend {
            return Ok(op - out_start);
        }
    }
}

/// Decompress a complete block into `dst`.
///
/// Returns the number of bytes written. Fails with
/// `Err(Lz4Error::OutputTooSmall)` when `dst` cannot hold the decoded data
/// and `Err(Lz4Error::CorruptedData)` on malformed input.
pub fn decompress_safe(src: &[u8], dst: &mut [u8]) -> Result<usize, Lz4Error> {
    let target = dst.len();
    decompress_core(src, dst, 0, 0, target, &[], false)
}

/// Decompress at most `target_len` bytes of a block into `dst`.
///
/// Stops cleanly as soon as the target is reached; never writes past it.
/// The bytes produced equal the first `written` bytes of the full decode.
pub fn decompress_safe_partial(
    src: &[u8],
    dst: &mut [u8],
    target_len: usize,
) -> Result<usize, Lz4Error> {
    let target = target_len.min(dst.len());
    decompress_core(src, dst, 0, 0, target, &[], true)
}

/// Decompress a block that may reference `dict` as preceding history.
pub fn decompress_safe_using_dict(
    src: &[u8],
    dst: &mut [u8],
    dict: &[u8],
) -> Result<usize, Lz4Error> {
    let target = dst.len();
    decompress_core(src, dst, 0, 0, target, dict, false)
}
