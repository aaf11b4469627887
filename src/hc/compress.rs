//! Hash-chain HC compression loop (levels 3–9).
//!
//! A greedy selector: at each position the chain is searched for the longest
//! match (with backward extension toward the literal anchor), the sequence
//! is emitted through the shared encoder, and the cursor advances past the
//! match. Levels 9+ enable the repetitive-pattern rescue in the search.

use crate::block::encode::{put_last_literals, put_sequence};
use crate::block::types::{LASTLITERALS, LZ4_MIN_LENGTH, MFLIMIT, MINMATCH};
use crate::error::Lz4Error;
use crate::hc::search::wider_match;
use crate::hc::types::HcState;

/// Compress `src` with the hash-chain strategy, writing into `dst`.
///
/// `st` must have been [`reset`](HcState::reset) for `dict`. Returns the
/// number of bytes written.
pub(crate) fn compress_hash_chain(
    st: &mut HcState,
    dict: &[u8],
    src: &[u8],
    dst: &mut [u8],
    nb_searches: i32,
    pattern_analysis: bool,
) -> Result<usize, Lz4Error> {
    let len = src.len();
    let mut op = 0usize;
    if len < LZ4_MIN_LENGTH {
        put_last_literals(dst, &mut op, src)?;
        return Ok(op);
    }

    let mflimit = len - MFLIMIT;
    let matchlimit = len - LASTLITERALS;
    let mut anchor = 0usize;
    let mut ip = 0usize;

    while ip <= mflimit {
        let m = wider_match(
            st,
            dict,
            src,
            ip,
            anchor,
            matchlimit,
            MINMATCH - 1,
            nb_searches,
            pattern_analysis,
            false,
        );
        if m.len < MINMATCH {
            ip += 1;
            continue;
        }
        let start = ip - m.back;
        put_sequence(dst, &mut op, &src[anchor..start], m.off as u16, m.len)?;
        ip = start + m.len;
        anchor = ip;
    }

    put_last_literals(dst, &mut op, &src[anchor..])?;
    Ok(op)
}
