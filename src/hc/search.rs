//! Match-finding core for the HC compressor.
//!
//! Three interleaved concerns:
//!
//! 1. **Insertion** ([`insert`]) — lazily fill the hash and chain tables for
//!    every index in `[next_to_update, target)`.
//! 2. **Pattern utilities** ([`count_pattern`], [`reverse_count_pattern`]) —
//!    run-length counting for the repetitive-pattern rescue.
//! 3. **Search** ([`wider_match`]) — walk the hash chain for the longest
//!    match, resolving candidates through the prefix or the external
//!    dictionary, with backward extension and optional pattern rescue.

use crate::block::types::{
    count_back, count_common, read_u32_le, read_u64_le, LZ4_DISTANCE_MAX, MINMATCH,
};
use crate::hc::types::{hc_hash, HcState, LZ4HC_MAXD_MASK};

/// A match located by the search.
///
/// `len` includes any backward extension; the match starts `back` bytes
/// before the searched position. `len == 0` means no match was found.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HcMatch {
    pub len: usize,
    pub off: u32,
    pub back: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Repeat {
    Untested,
    Not,
    Confirmed,
}

/// Read the chain delta for `idx`.
#[inline(always)]
fn delta_next(chain_table: &[u16], idx: u32) -> u32 {
    chain_table[idx as usize & LZ4HC_MAXD_MASK] as u32
}

// ─────────────────────────────────────────────────────────────────────────────
// Insertion
// ─────────────────────────────────────────────────────────────────────────────

/// Fill hash and chain entries for every index in `[next_to_update, target)`.
///
/// Dictionary indices whose 4-byte read would cross the dict/prefix boundary
/// get a saturated chain entry and no hash entry; the boundary gap is at
/// most 3 positions.
pub(crate) fn insert(st: &mut HcState, dict: &[u8], src: &[u8], target: u32) {
    let dl = st.dict_limit;
    let ll = st.low_limit;
    let mut idx = st.next_to_update;
    while idx < target {
        let seq = if idx >= dl {
            let p = (idx - dl) as usize;
            debug_assert!(p + MINMATCH <= src.len());
            read_u32_le(src, p)
        } else {
            let p = (idx - ll) as usize;
            if p + MINMATCH > dict.len() {
                st.chain_table[idx as usize & LZ4HC_MAXD_MASK] = LZ4_DISTANCE_MAX as u16;
                idx += 1;
                continue;
            }
            read_u32_le(dict, p)
        };
        let h = hc_hash(seq);
        let prev = st.hash_table[h];
        // An empty slot reads as 0, far below any valid index, so the delta
        // saturates and the chain terminates there.
        let delta = (idx - prev).min(LZ4_DISTANCE_MAX as u32) as u16;
        st.chain_table[idx as usize & LZ4HC_MAXD_MASK] = delta;
        st.hash_table[h] = idx;
        idx += 1;
    }
    st.next_to_update = target;
}

// ─────────────────────────────────────────────────────────────────────────────
// Pattern utilities
// ─────────────────────────────────────────────────────────────────────────────

/// Count how many leading bytes of `s` continue the repeating 4-byte
/// `pattern` (little-endian byte order). `s` must start on a pattern
/// boundary.
pub fn count_pattern(s: &[u8], pattern: u32) -> usize {
    let pat64 = (pattern as u64) | ((pattern as u64) << 32);
    let bytes = pattern.to_le_bytes();
    let mut i = 0;
    while i + 8 <= s.len() {
        let diff = read_u64_le(s, i) ^ pat64;
        if diff != 0 {
            return i + (diff.trailing_zeros() >> 3) as usize;
        }
        i += 8;
    }
    while i < s.len() && s[i] == bytes[i & 3] {
        i += 1;
    }
    i
}

/// Count how many trailing bytes of `s` continue the repeating 4-byte
/// `pattern`, scanning backward. `s` must end on a pattern boundary.
pub fn reverse_count_pattern(s: &[u8], pattern: u32) -> usize {
    let bytes = pattern.to_le_bytes();
    let mut n = 0;
    while n + 4 <= s.len() {
        if read_u32_le(s, s.len() - n - 4) != pattern {
            break;
        }
        n += 4;
    }
    while n < s.len() {
        if s[s.len() - 1 - n] != bytes[3 - (n & 3)] {
            break;
        }
        n += 1;
    }
    n
}

// ─────────────────────────────────────────────────────────────────────────────
// Chain search
// ─────────────────────────────────────────────────────────────────────────────

/// Insert all indices up to `ip` (exclusive), then walk the hash chain for
/// the longest match beating `min_len`.
///
/// * `ip` — current position within `src`.
/// * `i_low` — lower bound for backward extension (the literal anchor);
///   passing `ip` disables backward extension.
/// * `i_high` — forward counting limit (`src.len() - LASTLITERALS`).
/// * `max_attempts` — chain-walk budget from the level table.
/// * `pattern_analysis` — enable the repetitive-pattern rescue (levels ≥ 9).
/// * `favor_dec_speed` — skip matches at offsets < 8.
///
/// A candidate below `dict_limit` resolves through `dict`; its forward count
/// may run through the dictionary end and continue at the start of `src`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn wider_match(
    st: &mut HcState,
    dict: &[u8],
    src: &[u8],
    ip: usize,
    i_low: usize,
    i_high: usize,
    min_len: usize,
    max_attempts: i32,
    pattern_analysis: bool,
    favor_dec_speed: bool,
) -> HcMatch {
    let prefix_idx = st.dict_limit;
    let dict_idx = st.low_limit;
    let ip_index = prefix_idx + ip as u32;
    let lowest = if dict_idx + LZ4_DISTANCE_MAX as u32 + 1 > ip_index {
        dict_idx
    } else {
        ip_index - LZ4_DISTANCE_MAX as u32
    };

    insert(st, dict, src, ip_index);

    let pattern = read_u32_le(src, ip);
    let mut m_idx = st.hash_table[hc_hash(pattern)];
    let mut attempts = max_attempts;
    let mut repeat = Repeat::Untested;
    let mut src_pat_len = 0usize;

    let mut best_len = min_len;
    let mut best_off = 0u32;
    let mut best_back = 0usize;

    'chain: while m_idx >= lowest && attempts > 0 {
        attempts -= 1;

        if favor_dec_speed && ip_index - m_idx < 8 {
            // Short offsets decompress slowly; skip them entirely.
        } else if m_idx >= prefix_idx {
            // ── Candidate within the current block ───────────────────────
            let mpos = (m_idx - prefix_idx) as usize;
            if read_u32_le(src, mpos) == pattern {
                let fwd = MINMATCH
                    + count_common(&src[ip + MINMATCH..i_high], &src[mpos + MINMATCH..]);
                let back = if i_low < ip {
                    count_back(&src[i_low..ip], &src[..mpos])
                } else {
                    0
                };
                if fwd + back > best_len {
                    best_len = fwd + back;
                    best_off = ip_index - m_idx;
                    best_back = back;
                }
            }
        } else {
            // ── Candidate within the external dictionary ─────────────────
            let dpos = (m_idx - dict_idx) as usize;
            if dpos + MINMATCH <= dict.len() && read_u32_le(dict, dpos) == pattern {
                let mut fwd = MINMATCH
                    + count_common(&src[ip + MINMATCH..i_high], &dict[dpos + MINMATCH..]);
                if dpos + fwd == dict.len() && ip + fwd < i_high {
                    // The match runs through the dictionary end and resumes
                    // at the start of the block.
                    fwd += count_common(&src[ip + fwd..i_high], src);
                }
                let back = if i_low < ip {
                    count_back(&src[i_low..ip], &dict[..dpos])
                } else {
                    0
                };
                if fwd + back > best_len {
                    best_len = fwd + back;
                    best_off = ip_index - m_idx;
                    best_back = back;
                }
            }
        }

        let delta = delta_next(&st.chain_table, m_idx);

        // ── Repetitive-pattern rescue ────────────────────────────────────
        // A candidate at distance 1 from a chain entry signals a run. When
        // the 4-byte pattern is a repeat of a 1/2/4-byte sub-pattern, jump
        // the chain walk to the alignment that maximizes usable length
        // instead of stepping through the run one position at a time.
        if pattern_analysis && delta == 1 {
            let cand = m_idx - 1;
            if repeat == Repeat::Untested {
                if (pattern & 0xFFFF) == (pattern >> 16) && (pattern & 0xFF) == (pattern >> 24) {
                    repeat = Repeat::Confirmed;
                    src_pat_len = count_pattern(&src[ip + MINMATCH..i_high], pattern) + MINMATCH;
                } else {
                    repeat = Repeat::Not;
                }
            }
            if repeat == Repeat::Confirmed && cand >= lowest.max(prefix_idx) {
                let cpos = (cand - prefix_idx) as usize;
                if read_u32_le(src, cpos) == pattern {
                    let fwd_pat = count_pattern(&src[cpos + MINMATCH..i_high], pattern) + MINMATCH;
                    let max_back = (cand - lowest.max(prefix_idx)) as usize;
                    let back_pat = reverse_count_pattern(&src[..cpos], pattern).min(max_back);
                    let segment = back_pat + fwd_pat;
                    if segment >= src_pat_len && fwd_pat <= src_pat_len {
                        // Align to the pattern end minus the source run: the
                        // whole source run becomes coverable.
                        m_idx = cand - (src_pat_len - fwd_pat) as u32;
                        continue 'chain;
                    }
                    // Otherwise move to the farthest position of the run.
                    m_idx = cand - back_pat as u32;
                    if i_low == ip {
                        let max_ml = segment.min(src_pat_len);
                        if best_len < max_ml {
                            let dist = ip_index - m_idx;
                            if dist > LZ4_DISTANCE_MAX as u32 {
                                break 'chain;
                            }
                            best_len = max_ml;
                            best_off = dist;
                            best_back = 0;
                        }
                        let jump = delta_next(&st.chain_table, m_idx);
                        if jump == 0 || jump > m_idx {
                            break 'chain;
                        }
                        m_idx -= jump;
                    }
                    continue 'chain;
                }
            }
        }

        // ── Follow the chain ─────────────────────────────────────────────
        if delta == 0 || delta > m_idx {
            break;
        }
        m_idx -= delta;
    }

    if best_len > min_len {
        HcMatch {
            len: best_len,
            off: best_off,
            back: best_back,
        }
    } else {
        HcMatch::default()
    }
}
