//! High-compression (HC) encoders.
//!
//! A compression level in `[2, 12]` selects one of three strategies:
//!
//! | Level | Strategy | Module |
//! |-------|----------|--------|
//! | 2 | dual-hash LZ4MID | [`lz4mid`] |
//! | 3–9 | hash-chain search | [`compress`] |
//! | 10–12 | optimal parser | [`opt`] |
//!
//! All strategies emit through the shared sequence encoder, so their output
//! is interchangeable on the wire with the fast codec's.

pub mod compress;
pub mod lz4mid;
pub mod opt;
pub mod search;
pub mod types;

pub use types::{
    HcState, LZ4HC_CLEVEL_DEFAULT, LZ4HC_CLEVEL_MAX, LZ4HC_CLEVEL_MIN, LZ4HC_CLEVEL_OPT_MIN,
};

use crate::block::types::LZ4_MAX_INPUT_SIZE;
use crate::error::Lz4Error;
use types::{clevel_params, normalize_clevel, HcStrategy};

/// Compress `src` into `dst` at the given compression level.
///
/// Levels below 1 select the default (9); other values clamp into `[2, 12]`.
/// Returns the number of bytes written.
pub fn compress_hc(src: &[u8], dst: &mut [u8], level: i32) -> Result<usize, Lz4Error> {
    let mut state = HcState::new(level)?;
    compress_hc_into(&mut state, &[], src, dst, false)
}

/// Strategy dispatch over a prepared context.
///
/// `dict` supplies up to 64 KiB of history logically preceding `src`
/// (linked-mode frames, streaming). The state is reset for the new window
/// on entry.
pub(crate) fn compress_hc_into(
    state: &mut HcState,
    dict: &[u8],
    src: &[u8],
    dst: &mut [u8],
    favor_dec_speed: bool,
) -> Result<usize, Lz4Error> {
    if src.len() > LZ4_MAX_INPUT_SIZE {
        return Err(Lz4Error::InputTooLarge);
    }
    if src.is_empty() {
        return Ok(0);
    }

    let level = normalize_clevel(state.level);
    let params = clevel_params(level);
    state.reset(dict.len());
    state.favor_dec_speed = favor_dec_speed;

    match params.strat {
        HcStrategy::Lz4Mid => lz4mid::compress_lz4mid(state, dict, src, dst),
        HcStrategy::Lz4Hc => compress::compress_hash_chain(
            state,
            dict,
            src,
            dst,
            params.nb_searches as i32,
            params.nb_searches > 128,
        ),
        HcStrategy::Lz4Opt => opt::compress_optimal(
            state,
            dict,
            src,
            dst,
            params.nb_searches as i32,
            params.target_len as usize,
            level >= LZ4HC_CLEVEL_MAX,
        ),
    }
}
