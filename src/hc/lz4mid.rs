//! LZ4MID — the level-2 strategy.
//!
//! Two 2^14-entry tables share the HC hash-table storage: one keyed on the
//! 4-byte hash at the current position, one on the low 56 bits of the
//! 8-byte value. The long hash is probed first; a hit of at least MINMATCH
//! is committed immediately. A short-hash hit peeks one byte ahead through
//! the long table and keeps the longer of the two. Misses skip forward with
//! a linearly growing stride.

use crate::block::encode::{put_last_literals, put_sequence};
use crate::block::types::{
    count_common, read_u32_le, read_u64_le, LASTLITERALS, LZ4_DISTANCE_MAX, LZ4_MIN_LENGTH,
    MFLIMIT, MINMATCH,
};
use crate::error::Lz4Error;
use crate::hc::types::{mid_hash4, mid_hash8, HcState, LZ4MID_TABLE_SIZE};

/// Forward match length for a candidate index, resolving through the prefix
/// or the dictionary (continuing into the prefix at the boundary).
#[inline]
fn candidate_len(
    dict: &[u8],
    src: &[u8],
    dict_limit: u32,
    low_limit: u32,
    pos: u32,
    ip: usize,
    matchlimit: usize,
) -> usize {
    if pos >= dict_limit {
        let mpos = (pos - dict_limit) as usize;
        if mpos >= ip {
            return 0;
        }
        count_common(&src[ip..matchlimit], &src[mpos..])
    } else {
        let dpos = (pos - low_limit) as usize;
        if dpos >= dict.len() {
            return 0;
        }
        let mut l = count_common(&src[ip..matchlimit], &dict[dpos..]);
        if dpos + l == dict.len() && ip + l < matchlimit {
            l += count_common(&src[ip + l..matchlimit], src);
        }
        l
    }
}

/// Seed both tables from the dictionary: a coarse pass every third position,
/// then a dense long-hash pass over the last 32 KiB.
fn seed_dict(h4t: &mut [u32], h8t: &mut [u32], dict: &[u8], low_limit: u32) {
    let d = dict.len();
    let mut p = 0usize;
    while p + 9 <= d {
        h4t[mid_hash4(read_u32_le(dict, p))] = low_limit + p as u32;
        h8t[mid_hash8(read_u64_le(dict, p + 1))] = low_limit + p as u32 + 1;
        p += 3;
    }
    let dense_start = d.saturating_sub(32 * 1024);
    let dense_end = d.saturating_sub(8);
    for q in dense_start..dense_end {
        h8t[mid_hash8(read_u64_le(dict, q))] = low_limit + q as u32;
    }
}

/// Compress `src` with the LZ4MID strategy, writing into `dst`.
pub(crate) fn compress_lz4mid(
    st: &mut HcState,
    dict: &[u8],
    src: &[u8],
    dst: &mut [u8],
) -> Result<usize, Lz4Error> {
    let len = src.len();
    let mut op = 0usize;
    if len < LZ4_MIN_LENGTH {
        put_last_literals(dst, &mut op, src)?;
        return Ok(op);
    }

    let mflimit = len - MFLIMIT;
    let matchlimit = len - LASTLITERALS;
    let dl = st.dict_limit;
    let ll = st.low_limit;
    let (h4t, h8t) = st.hash_table.split_at_mut(LZ4MID_TABLE_SIZE);
    if !dict.is_empty() {
        seed_dict(h4t, h8t, dict, ll);
    }

    let mut anchor = 0usize;
    let mut ip = 0usize;

    while ip <= mflimit {
        let g = dl + ip as u32;
        let mut found: Option<(usize, u32)> = None;

        // ── Long-match probe (8-byte hash) ───────────────────────────────
        {
            let h8 = mid_hash8(read_u64_le(src, ip));
            let pos8 = h8t[h8];
            h8t[h8] = g;
            if pos8 >= ll && g - pos8 <= LZ4_DISTANCE_MAX as u32 {
                let l = candidate_len(dict, src, dl, ll, pos8, ip, matchlimit);
                if l >= MINMATCH {
                    found = Some((l, g - pos8));
                }
            }
        }

        // ── Short-match probe (4-byte hash) with one-ahead peek ──────────
        if found.is_none() {
            let h4 = mid_hash4(read_u32_le(src, ip));
            let pos4 = h4t[h4];
            h4t[h4] = g;
            if pos4 >= ll && g - pos4 <= LZ4_DISTANCE_MAX as u32 {
                let l = candidate_len(dict, src, dl, ll, pos4, ip, matchlimit);
                if l >= MINMATCH {
                    let mut best = (l, g - pos4);
                    if ip < mflimit {
                        // A longer 8-byte candidate one position ahead wins.
                        let h8n = mid_hash8(read_u64_le(src, ip + 1));
                        let pos8n = h8t[h8n];
                        if pos8n >= dl && (g + 1) - pos8n <= LZ4_DISTANCE_MAX as u32 {
                            let mpos = (pos8n - dl) as usize;
                            let l2 = count_common(&src[ip + 1..matchlimit], &src[mpos..]);
                            if l2 > best.0 {
                                h8t[h8n] = g + 1;
                                ip += 1;
                                best = (l2, (dl + ip as u32) - pos8n);
                            }
                        }
                    }
                    found = Some(best);
                }
            }
        }

        let (mut mlen, dist) = match found {
            None => {
                // Growing skip over incompressible stretches.
                ip += 1 + ((ip - anchor) >> 9);
                continue;
            }
            Some(m) => m,
        };

        // ── Catch back within the prefix ─────────────────────────────────
        let doff = dist as usize;
        while ip > anchor && ip > doff && src[ip - 1] == src[ip - 1 - doff] {
            ip -= 1;
            mlen += 1;
        }

        // Seed positions just after the match start so the run stays
        // discoverable.
        if ip + 10 <= len {
            let gi = dl + ip as u32;
            h8t[mid_hash8(read_u64_le(src, ip + 1))] = gi + 1;
            h8t[mid_hash8(read_u64_le(src, ip + 2))] = gi + 2;
            h4t[mid_hash4(read_u32_le(src, ip + 1))] = gi + 1;
        }

        put_sequence(dst, &mut op, &src[anchor..ip], dist as u16, mlen)?;
        ip += mlen;
        anchor = ip;

        // Seed positions around the match end.
        let ge = dl + ip as u32;
        if ip >= 5 && ip + 3 <= len {
            h8t[mid_hash8(read_u64_le(src, ip - 5))] = ge - 5;
        }
        if ip >= 3 && ip + 5 <= len {
            h8t[mid_hash8(read_u64_le(src, ip - 3))] = ge - 3;
        }
        if ip >= 2 && ip + 6 <= len {
            h8t[mid_hash8(read_u64_le(src, ip - 2))] = ge - 2;
        }
        if ip >= 1 && ip + 3 <= len {
            h4t[mid_hash4(read_u32_le(src, ip - 1))] = ge - 1;
        }
    }

    put_last_literals(dst, &mut op, &src[anchor..])?;
    Ok(op)
}
