//! LZ4OPT — forward dynamic-programming parser (levels 10–12).
//!
//! For each starting position the parser prices every reachable position in
//! a 4096-wide trellis (cost = exact output bytes), then backtraces the
//! cheapest path and emits it through the shared encoder. Matches longer
//! than the level's target length shortcut the trellis entirely.

use crate::block::encode::{put_last_literals, put_sequence};
use crate::block::types::{
    LASTLITERALS, LZ4_MIN_LENGTH, MFLIMIT, MINMATCH, ML_MASK, RUN_MASK,
};
use crate::error::Lz4Error;
use crate::hc::search::{wider_match, HcMatch};
use crate::hc::types::{HcState, LZ4_OPT_NUM};

/// Trellis slots past the last match position, so trailing literal updates
/// need no bounds checks.
const TRAILING_LITERALS: usize = 3;

/// One trellis node: cheapest known way to reach this position.
#[derive(Clone, Copy, Default)]
struct OptCell {
    /// Cost in output bytes to reach this position.
    price: i32,
    /// Offset of the step arriving here (0 for a literal).
    off: i32,
    /// Length of the step arriving here (1 for a literal).
    mlen: i32,
    /// Literal run length accumulated before this position.
    litlen: i32,
}

/// Output bytes needed to encode `litlen` literals (token share included).
#[inline(always)]
pub fn literals_price(litlen: i32) -> i32 {
    debug_assert!(litlen >= 0);
    let mut price = litlen;
    if litlen >= RUN_MASK as i32 {
        price += 1 + (litlen - RUN_MASK as i32) / 255;
    }
    price
}

/// Output bytes for one full sequence: `litlen` literals then a match of
/// `mlen` (≥ MINMATCH).
#[inline(always)]
pub fn sequence_price(litlen: i32, mlen: i32) -> i32 {
    debug_assert!(mlen >= MINMATCH as i32);
    let mut price = 1 + 2; // token + offset
    price += literals_price(litlen);
    if mlen >= (ML_MASK + MINMATCH) as i32 {
        price += 1 + (mlen - (ML_MASK + MINMATCH) as i32) / 255;
    }
    price
}

/// Search for a match strictly longer than `min_len` at `ip`, without
/// backward extension. Pattern analysis is always on at these levels.
fn longer_match(
    st: &mut HcState,
    dict: &[u8],
    src: &[u8],
    ip: usize,
    i_high: usize,
    min_len: usize,
    nb_searches: i32,
    favor_dec_speed: bool,
) -> HcMatch {
    let mut m = wider_match(
        st,
        dict,
        src,
        ip,
        ip,
        i_high,
        min_len,
        nb_searches,
        true,
        favor_dec_speed,
    );
    debug_assert_eq!(m.back, 0);
    if favor_dec_speed && m.len > 18 && m.len <= 36 {
        // A match split at 18 keeps the length code inside the token,
        // which decodes faster; the ratio cost is marginal.
        m.len = 18;
    }
    m
}

/// Compress `src` with the optimal parser, writing into `dst`.
///
/// `target_len` is the level's greedy-shortcut threshold; `full_update`
/// (level 12) re-searches every trellis position instead of only those that
/// could still improve.
pub(crate) fn compress_optimal(
    st: &mut HcState,
    dict: &[u8],
    src: &[u8],
    dst: &mut [u8],
    nb_searches: i32,
    target_len: usize,
    full_update: bool,
) -> Result<usize, Lz4Error> {
    let favor = st.favor_dec_speed;
    let len = src.len();
    let mut op = 0usize;
    if len < LZ4_MIN_LENGTH {
        put_last_literals(dst, &mut op, src)?;
        return Ok(op);
    }

    let mflimit = len - MFLIMIT;
    let matchlimit = len - LASTLITERALS;
    let sufficient_len = target_len.min(LZ4_OPT_NUM - 1);

    let mut opt: Vec<OptCell> = Vec::new();
    opt.try_reserve_exact(LZ4_OPT_NUM + TRAILING_LITERALS)
        .map_err(|_| Lz4Error::AllocationFailed)?;
    opt.resize(LZ4_OPT_NUM + TRAILING_LITERALS, OptCell::default());

    let mut ip = 0usize;
    let mut anchor = 0usize;

    while ip <= mflimit {
        let llen = ip - anchor;
        let first = longer_match(
            st,
            dict,
            src,
            ip,
            matchlimit,
            MINMATCH - 1,
            nb_searches,
            favor,
        );
        if first.len == 0 {
            ip += 1;
            continue;
        }

        if first.len > sufficient_len {
            // Good enough: encode immediately, skip the trellis.
            put_sequence(dst, &mut op, &src[anchor..ip], first.off as u16, first.len)?;
            ip += first.len;
            anchor = ip;
            continue;
        }

        // ── Initialize the trellis ───────────────────────────────────────
        for r in 0..MINMATCH {
            opt[r] = OptCell {
                mlen: 1,
                off: 0,
                litlen: (llen + r) as i32,
                price: literals_price((llen + r) as i32),
            };
        }
        for ml in MINMATCH..=first.len {
            opt[ml] = OptCell {
                mlen: ml as i32,
                off: first.off as i32,
                litlen: llen as i32,
                price: sequence_price(llen as i32, ml as i32),
            };
        }
        let mut last_match_pos = first.len;
        for al in 1..=TRAILING_LITERALS {
            opt[last_match_pos + al] = OptCell {
                mlen: 1,
                off: 0,
                litlen: al as i32,
                price: opt[last_match_pos].price + literals_price(al as i32),
            };
        }

        // ── Relax prices over the window ─────────────────────────────────
        let mut early_exit: Option<(usize, usize, u32)> = None; // (cur, mlen, off)
        let mut cur = 1usize;
        while cur < last_match_pos {
            if ip + cur > mflimit {
                break;
            }
            // Skip positions that cannot improve the path.
            if full_update {
                if opt[cur + 1].price <= opt[cur].price
                    && opt[cur + MINMATCH].price < opt[cur].price + 3
                {
                    cur += 1;
                    continue;
                }
            } else if opt[cur + 1].price <= opt[cur].price {
                cur += 1;
                continue;
            }

            let min_here = if full_update {
                MINMATCH - 1
            } else {
                last_match_pos - cur
            };
            let nm = longer_match(
                st,
                dict,
                src,
                ip + cur,
                matchlimit,
                min_here,
                nb_searches,
                favor,
            );
            if nm.len == 0 {
                cur += 1;
                continue;
            }

            if nm.len > sufficient_len || cur + nm.len >= LZ4_OPT_NUM {
                // Oversized for the trellis: commit the path up to here,
                // then this match, and restart the outer scan after it.
                early_exit = Some((cur, nm.len, nm.off));
                last_match_pos = cur + 1;
                break;
            }

            // Literal steps out of `cur`.
            let base_litlen = opt[cur].litlen;
            for l in 1..MINMATCH {
                let price = opt[cur].price - literals_price(base_litlen)
                    + literals_price(base_litlen + l as i32);
                let p = cur + l;
                if price < opt[p].price {
                    opt[p] = OptCell {
                        mlen: 1,
                        off: 0,
                        litlen: base_litlen + l as i32,
                        price,
                    };
                }
            }

            // Match steps out of `cur`, one per reachable length.
            for ml in MINMATCH..=nm.len {
                let p = cur + ml;
                let (ll_field, price) = if opt[cur].mlen == 1 {
                    // Arriving on a literal run: price from the run start.
                    let l = opt[cur].litlen as usize;
                    let base = if cur > l { opt[cur - l].price } else { 0 };
                    (opt[cur].litlen, base + sequence_price(opt[cur].litlen, ml as i32))
                } else {
                    (0, opt[cur].price + sequence_price(0, ml as i32))
                };
                let bias = favor as i32;
                if p > last_match_pos + TRAILING_LITERALS || price <= opt[p].price - bias {
                    if ml == nm.len && last_match_pos < p {
                        last_match_pos = p;
                    }
                    opt[p] = OptCell {
                        mlen: ml as i32,
                        off: nm.off as i32,
                        litlen: ll_field,
                        price,
                    };
                }
            }

            for al in 1..=TRAILING_LITERALS {
                opt[last_match_pos + al] = OptCell {
                    mlen: 1,
                    off: 0,
                    litlen: al as i32,
                    price: opt[last_match_pos].price + literals_price(al as i32),
                };
            }

            cur += 1;
        }

        // ── Backtrace the chosen path ────────────────────────────────────
        let (best_mlen, best_off, mut cpos) = match early_exit {
            Some((c, ml, off)) => (ml as i32, off as i32, c),
            None => {
                let bm = opt[last_match_pos].mlen;
                debug_assert!(bm >= 1 && bm as usize <= last_match_pos);
                (bm, opt[last_match_pos].off, last_match_pos - bm as usize)
            }
        };
        {
            let mut sel_ml = best_mlen;
            let mut sel_off = best_off;
            loop {
                let next_ml = opt[cpos].mlen;
                let next_off = opt[cpos].off;
                opt[cpos].mlen = sel_ml;
                opt[cpos].off = sel_off;
                sel_ml = next_ml;
                sel_off = next_off;
                if next_ml as usize > cpos {
                    break;
                }
                debug_assert!(next_ml > 0);
                cpos -= next_ml as usize;
            }
        }

        // ── Emit the recorded sequences in order ─────────────────────────
        let mut r = 0usize;
        while r < last_match_pos {
            let ml = opt[r].mlen;
            if ml == 1 {
                ip += 1;
                r += 1;
                continue;
            }
            let off = opt[r].off;
            r += ml as usize;
            put_sequence(dst, &mut op, &src[anchor..ip], off as u16, ml as usize)?;
            ip += ml as usize;
            anchor = ip;
        }
    }

    put_last_literals(dst, &mut op, &src[anchor..])?;
    Ok(op)
}
