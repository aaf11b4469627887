//! HC compression types: the level table, hash functions, and the shared
//! compression context.

use crate::block::types::{KB, LZ4_DISTANCE_MAX};
use crate::error::Lz4Error;

// ─────────────────────────────────────────────────────────────────────────────
// Compression-level constants
// ─────────────────────────────────────────────────────────────────────────────

pub const LZ4HC_CLEVEL_MIN: i32 = 2;
pub const LZ4HC_CLEVEL_DEFAULT: i32 = 9;
pub const LZ4HC_CLEVEL_OPT_MIN: i32 = 10;
pub const LZ4HC_CLEVEL_MAX: i32 = 12;

// ─────────────────────────────────────────────────────────────────────────────
// Table sizing
// ─────────────────────────────────────────────────────────────────────────────

pub const LZ4HC_HASH_LOG: u32 = 15;
/// HC hash-table entries (32 768 u32 slots).
pub const LZ4HC_HASHTABLE_SIZE: usize = 1 << LZ4HC_HASH_LOG;

/// Chain-table length: one entry per slot in the 64 KiB window.
pub const LZ4HC_MAXD: usize = 1 << 16;
pub const LZ4HC_MAXD_MASK: usize = LZ4HC_MAXD - 1;

pub const LZ4MID_HASHLOG: u32 = LZ4HC_HASH_LOG - 1; // 14
/// Entries per LZ4MID table; two of them overlay the HC hash-table storage.
pub const LZ4MID_TABLE_SIZE: usize = 1 << LZ4MID_HASHLOG;

/// Max match length the hash-chain loop prefers to keep in one token group.
pub const OPTIMAL_ML: usize = 18;

/// Lookahead window of the optimal parser.
pub const LZ4_OPT_NUM: usize = 1 << 12;

/// Fresh states anchor their index space here so a zeroed hash table reads
/// unambiguously as "no entry": every valid index is ≥ the anchor, and any
/// stale zero is more than [`LZ4_DISTANCE_MAX`] away.
pub(crate) const INDEX_BASE: u32 = 64 * KB as u32;

// ─────────────────────────────────────────────────────────────────────────────
// Strategy selection
// ─────────────────────────────────────────────────────────────────────────────

/// Compression strategy selected by the compression level.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HcStrategy {
    /// Dual-hash medium strategy (level 2).
    Lz4Mid,
    /// Hash-chain strategy (levels 3–9).
    Lz4Hc,
    /// Optimal-parser strategy (levels 10–12).
    Lz4Opt,
}

/// Per-level compression parameters.
#[derive(Clone, Copy, Debug)]
pub struct CParams {
    pub strat: HcStrategy,
    pub nb_searches: u32,
    pub target_len: u32,
}

/// Level → parameter table, indexed by compression level 0–12.
/// Entries 0 and 1 exist only to keep the indexing direct; level
/// normalization never selects them.
pub static LEVEL_TABLE: [CParams; (LZ4HC_CLEVEL_MAX + 1) as usize] = [
    CParams { strat: HcStrategy::Lz4Mid, nb_searches:      2, target_len:   16 }, /* 0 (unused) */
    CParams { strat: HcStrategy::Lz4Mid, nb_searches:      2, target_len:   16 }, /* 1 (unused) */
    CParams { strat: HcStrategy::Lz4Mid, nb_searches:      2, target_len:   16 }, /* 2 */
    CParams { strat: HcStrategy::Lz4Hc,  nb_searches:      4, target_len:   16 }, /* 3 */
    CParams { strat: HcStrategy::Lz4Hc,  nb_searches:      8, target_len:   16 }, /* 4 */
    CParams { strat: HcStrategy::Lz4Hc,  nb_searches:     16, target_len:   16 }, /* 5 */
    CParams { strat: HcStrategy::Lz4Hc,  nb_searches:     32, target_len:   16 }, /* 6 */
    CParams { strat: HcStrategy::Lz4Hc,  nb_searches:     64, target_len:   16 }, /* 7 */
    CParams { strat: HcStrategy::Lz4Hc,  nb_searches:    128, target_len:   16 }, /* 8 */
    CParams { strat: HcStrategy::Lz4Hc,  nb_searches:    256, target_len:   16 }, /* 9 */
    CParams { strat: HcStrategy::Lz4Opt, nb_searches:     96, target_len:   64 }, /* 10 */
    CParams { strat: HcStrategy::Lz4Opt, nb_searches:    512, target_len:  128 }, /* 11 */
    CParams { strat: HcStrategy::Lz4Opt, nb_searches: 16_384, target_len: 4096 }, /* 12 */
];

/// Normalize a user-supplied level: < 1 selects the default (9), everything
/// else clamps into `[2, 12]`.
#[inline]
pub fn normalize_clevel(level: i32) -> i32 {
    if level < 1 {
        LZ4HC_CLEVEL_DEFAULT
    } else {
        level.clamp(LZ4HC_CLEVEL_MIN, LZ4HC_CLEVEL_MAX)
    }
}

/// Parameters for a (normalized) compression level.
#[inline]
pub fn clevel_params(level: i32) -> CParams {
    LEVEL_TABLE[normalize_clevel(level) as usize]
}

// ─────────────────────────────────────────────────────────────────────────────
// Hash functions
// ─────────────────────────────────────────────────────────────────────────────

/// 4-byte hash reduced to [`LZ4HC_HASH_LOG`] bits.
#[inline(always)]
pub fn hc_hash(sequence: u32) -> usize {
    (sequence.wrapping_mul(2_654_435_761) >> (32 - LZ4HC_HASH_LOG)) as usize
}

/// 4-byte hash for the LZ4MID short table.
#[inline(always)]
pub fn mid_hash4(sequence: u32) -> usize {
    (sequence.wrapping_mul(2_654_435_761) >> (32 - LZ4MID_HASHLOG)) as usize
}

/// 56-bit hash for the LZ4MID long table: the top byte of the little-endian
/// read is discarded, then a 64-bit golden-ratio multiply spreads the rest.
#[inline(always)]
pub fn mid_hash8(sequence: u64) -> usize {
    ((sequence << 8).wrapping_mul(58_295_818_150_454_627) >> (64 - LZ4MID_HASHLOG)) as usize
}

// ─────────────────────────────────────────────────────────────────────────────
// Compression context
// ─────────────────────────────────────────────────────────────────────────────

/// HC compression context.
///
/// History is addressed through a unified `u32` index space:
/// `[low_limit, dict_limit)` maps into an external-dictionary slice,
/// `[dict_limit, ..)` into the block being compressed. Both slices are
/// supplied per call; the context holds only tables and index bounds.
pub struct HcState {
    /// Most recent index per 4-byte hash. For LZ4MID the same storage is
    /// split in halves: `[0, 2^14)` keyed on the 4-byte hash,
    /// `[2^14, 2^15)` on the 56-bit hash.
    pub(crate) hash_table: Box<[u32]>,
    /// Delta to the previous index sharing the hash, saturating at 65 535;
    /// indexed by `idx & LZ4HC_MAXD_MASK`.
    pub(crate) chain_table: Box<[u16]>,
    /// First index of the current block.
    pub(crate) dict_limit: u32,
    /// First index of the external dictionary (== `dict_limit` when none).
    pub(crate) low_limit: u32,
    /// First index not yet inserted into the tables.
    pub(crate) next_to_update: u32,
    /// Normalized compression level.
    pub(crate) level: i32,
    /// Prefer decompression speed over ratio in the optimal parser.
    pub(crate) favor_dec_speed: bool,
}

impl HcState {
    /// Allocate a context for `level` (normalized on entry).
    pub fn new(level: i32) -> Result<Self, Lz4Error> {
        let mut hash: Vec<u32> = Vec::new();
        hash.try_reserve_exact(LZ4HC_HASHTABLE_SIZE)
            .map_err(|_| Lz4Error::AllocationFailed)?;
        hash.resize(LZ4HC_HASHTABLE_SIZE, 0);
        let mut chain: Vec<u16> = Vec::new();
        chain
            .try_reserve_exact(LZ4HC_MAXD)
            .map_err(|_| Lz4Error::AllocationFailed)?;
        chain.resize(LZ4HC_MAXD, 0xFFFF);
        Ok(Self {
            hash_table: hash.into_boxed_slice(),
            chain_table: chain.into_boxed_slice(),
            dict_limit: INDEX_BASE,
            low_limit: INDEX_BASE,
            next_to_update: INDEX_BASE,
            level: normalize_clevel(level),
            favor_dec_speed: false,
        })
    }

    /// Zero the hash table and saturate the chain table.
    pub(crate) fn clear_tables(&mut self) {
        self.hash_table.fill(0);
        self.chain_table.fill(LZ4_DISTANCE_MAX as u16);
    }

    /// Prepare the context for a new block preceded by `dict_len` bytes of
    /// external dictionary.
    ///
    /// Each call re-anchors the index space at [`INDEX_BASE`], so
    /// accumulated indices can never approach the u32 range; the tables are
    /// cleared because entries from a previous window would alias the new
    /// one.
    pub(crate) fn reset(&mut self, dict_len: usize) {
        debug_assert!(dict_len <= 64 * KB);
        self.clear_tables();
        self.low_limit = INDEX_BASE;
        self.dict_limit = INDEX_BASE + dict_len as u32;
        self.next_to_update = INDEX_BASE;
    }
}
