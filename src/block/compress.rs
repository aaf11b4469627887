//! Fast LZ4 block compressor.
//!
//! Single-table hash compressor with an acceleration-parameterized adaptive
//! probe stride. The same core serves the one-shot entry points, the
//! streaming compressor, and linked-mode frames: match history is supplied
//! as an explicit `dict` slice logically located immediately before `src`
//! in a unified index space (`0..dict.len()` is dictionary, the rest is the
//! current block).
//!
//! Capacity-exceeded conditions are signalled as
//! `Err(Lz4Error::OutputTooSmall)` rather than a zero return, which keeps
//! error handling unambiguous at call sites.

use crate::block::encode::{put_last_literals, put_sequence};
use crate::block::types::{
    count_common, hash_sequence, read_u32_le, LZ4_ACCELERATION_DEFAULT, LZ4_ACCELERATION_MAX,
    LZ4_DISTANCE_MAX, LZ4_HASH_SIZE, LZ4_MAX_INPUT_SIZE, LZ4_MIN_LENGTH, LZ4_SKIP_TRIGGER,
    LASTLITERALS, MFLIMIT, MINMATCH,
};
use crate::error::Lz4Error;

/// Allocate a zeroed fast-codec hash table.
pub(crate) fn new_hash_table() -> Result<Box<[u32]>, Lz4Error> {
    let mut v: Vec<u32> = Vec::new();
    v.try_reserve_exact(LZ4_HASH_SIZE)
        .map_err(|_| Lz4Error::AllocationFailed)?;
    v.resize(LZ4_HASH_SIZE, 0);
    Ok(v.into_boxed_slice())
}

/// Worst-case compressed size for an `input_size`-byte block.
///
/// Returns 0 if `input_size` exceeds [`LZ4_MAX_INPUT_SIZE`].
#[inline]
pub fn compress_bound(input_size: usize) -> usize {
    if input_size > LZ4_MAX_INPUT_SIZE {
        0
    } else {
        input_size + input_size / 255 + 16
    }
}

/// Core fast compression over a `(dict, src)` window pair.
///
/// Positions `0..dict.len()` of the index space map into `dict`, positions
/// `dict.len()..` into `src`. The hash table is cleared and the dictionary
/// seeded on entry, so `table` only needs the right size. Returns the number
/// of bytes written to `dst`.
pub(crate) fn compress_into(
    dict: &[u8],
    src: &[u8],
    dst: &mut [u8],
    table: &mut [u32],
    acceleration: i32,
) -> Result<usize, Lz4Error> {
    debug_assert_eq!(table.len(), LZ4_HASH_SIZE);
    let len = src.len();
    if len > LZ4_MAX_INPUT_SIZE {
        return Err(Lz4Error::InputTooLarge);
    }
    if len == 0 {
        return Ok(0);
    }

    let mut op = 0usize;
    if len < LZ4_MIN_LENGTH {
        // Too short for any match; a single literals-only sequence.
        put_last_literals(dst, &mut op, src)?;
        return Ok(op);
    }

    let accel = acceleration.clamp(LZ4_ACCELERATION_DEFAULT, LZ4_ACCELERATION_MAX) as usize;
    let d = dict.len();

    table.fill(0);
    if d > MINMATCH - 1 {
        // Seed history positions; later entries overwrite earlier ones, so
        // each slot keeps the most recent position sharing its hash.
        for p in 0..d - (MINMATCH - 1) {
            table[hash_sequence(read_u32_le(dict, p))] = p as u32;
        }
    }

    let mflimit = len - MFLIMIT; // last index where a match may start
    let matchlimit = len - LASTLITERALS;
    let mut anchor = 0usize;
    let mut ip = 1usize;

    loop {
        // ── Find a match ─────────────────────────────────────────────────
        let mut search_nb = accel << LZ4_SKIP_TRIGGER;
        let cand: usize;
        loop {
            if ip > mflimit {
                put_last_literals(dst, &mut op, &src[anchor..])?;
                return Ok(op);
            }
            let seq = read_u32_le(src, ip);
            let h = hash_sequence(seq);
            let cur = d + ip;
            let c = table[h] as usize;
            // Update after reading, so a position can never match itself.
            table[h] = cur as u32;
            let step = search_nb >> LZ4_SKIP_TRIGGER;
            search_nb += 1;

            if c > 0 && c < cur && cur - c <= LZ4_DISTANCE_MAX {
                let cand_seq = if c >= d {
                    read_u32_le(src, c - d)
                } else if c + MINMATCH <= d {
                    read_u32_le(dict, c)
                } else {
                    // Candidate straddles the dict/prefix boundary.
                    !seq
                };
                if cand_seq == seq {
                    cand = c;
                    break;
                }
            }
            ip += step;
        }

        // ── Measure match length ─────────────────────────────────────────
        let cur = d + ip;
        let offset = cur - cand;
        let match_len = if cand >= d {
            let mpos = cand - d;
            MINMATCH + count_common(&src[ip + MINMATCH..matchlimit], &src[mpos + MINMATCH..])
        } else {
            // Match starts inside the dictionary; it may run through the
            // dictionary end and continue at the start of the block.
            let mut l =
                MINMATCH + count_common(&src[ip + MINMATCH..matchlimit], &dict[cand + MINMATCH..]);
            if cand + l == d && ip + l < matchlimit {
                l += count_common(&src[ip + l..matchlimit], src);
            }
            l
        };

        // ── Encode ───────────────────────────────────────────────────────
        put_sequence(dst, &mut op, &src[anchor..ip], offset as u16, match_len)?;
        ip += match_len;
        anchor = ip;

        if ip > mflimit {
            put_last_literals(dst, &mut op, &src[anchor..])?;
            return Ok(op);
        }
        // Record the post-match position before resuming the search.
        table[hash_sequence(read_u32_le(src, ip))] = (d + ip) as u32;
    }
}

/// Compress `src` into `dst` with a caller-chosen acceleration factor.
///
/// `acceleration` is clamped to `1..=65537`; larger values trade ratio for
/// speed on poorly compressible data. Returns the number of bytes written.
pub fn compress_fast(src: &[u8], dst: &mut [u8], acceleration: i32) -> Result<usize, Lz4Error> {
    let mut table = new_hash_table()?;
    compress_into(&[], src, dst, &mut table, acceleration)
}

/// Compress `src` into `dst` with the default acceleration factor (1).
///
/// The recommended entry point for one-shot block compression.
pub fn compress_default(src: &[u8], dst: &mut [u8]) -> Result<usize, Lz4Error> {
    compress_fast(src, dst, LZ4_ACCELERATION_DEFAULT)
}

/// Compress the largest prefix of `src` that fits into `dst`.
///
/// On entry `*src_len` bounds how much of `src` may be consumed; on success
/// it holds the number of source bytes actually consumed and the compressed
/// bytes are in `dst`. The prefix is located by binary search over one-shot
/// compression attempts.
pub fn compress_dest_size(
    src: &[u8],
    dst: &mut [u8],
    src_len: &mut usize,
) -> Result<usize, Lz4Error> {
    let mut table = new_hash_table()?;
    let cap = (*src_len).min(src.len()).min(LZ4_MAX_INPUT_SIZE);

    let attempt = |n: usize, dst: &mut [u8], table: &mut [u32]| -> Result<usize, Lz4Error> {
        if n == 0 {
            return Ok(0);
        }
        compress_into(&[], &src[..n], dst, table, LZ4_ACCELERATION_DEFAULT)
    };

    if let Ok(n) = attempt(cap, dst, &mut table) {
        *src_len = cap;
        return Ok(n);
    }

    // `lo` fits, `hi` does not.
    let mut lo = 0usize;
    let mut hi = cap;
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if attempt(mid, dst, &mut table).is_ok() {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    // Re-run the winning prefix so `dst` holds its output.
    let written = attempt(lo, dst, &mut table)?;
    *src_len = lo;
    Ok(written)
}
