//! LZ4 Frame format types and constants.

use crate::error::Lz4Error;

// ─────────────────────────────────────────────────────────────────────────────
// Frame constants
// ─────────────────────────────────────────────────────────────────────────────

/// Magic number opening every standard LZ4 frame (little-endian on the wire).
pub const LZ4F_MAGIC_NUMBER: u32 = 0x184D_2204;

/// First magic of the skippable-frame range `0x184D2A50..=0x184D2A5F`.
pub const LZ4F_MAGIC_SKIPPABLE_START: u32 = 0x184D_2A50;

/// Mask isolating the fixed part of a skippable magic.
pub const LZ4F_MAGIC_SKIPPABLE_MASK: u32 = 0xFFFF_FFF0;

/// High bit of a block header: block data is stored uncompressed.
pub const LZ4F_BLOCK_UNCOMPRESSED_FLAG: u32 = 0x8000_0000;

/// Block header size in bytes.
pub const BH_SIZE: usize = 4;

/// Block/content checksum size in bytes.
pub const BF_SIZE: usize = 4;

/// Minimum frame header size: magic + FLG + BD + header checksum.
pub const MIN_FH_SIZE: usize = 7;

/// Maximum frame header size: minimum + content size (8) + dict ID (4).
pub const MAX_FH_SIZE: usize = 19;

// ─────────────────────────────────────────────────────────────────────────────
// Frame parameters
// ─────────────────────────────────────────────────────────────────────────────

/// Maximum block size stored in a frame, from BD bits 6–4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum BlockSizeId {
    /// Resolves to [`BlockSizeId::Max64Kb`].
    #[default]
    Default = 0,
    Max64Kb = 4,
    Max256Kb = 5,
    Max1Mb = 6,
    Max4Mb = 7,
}

impl BlockSizeId {
    /// Block byte size this identifier stands for.
    pub fn block_size(self) -> usize {
        match self {
            BlockSizeId::Default | BlockSizeId::Max64Kb => 64 * 1024,
            BlockSizeId::Max256Kb => 256 * 1024,
            BlockSizeId::Max1Mb => 1024 * 1024,
            BlockSizeId::Max4Mb => 4 * 1024 * 1024,
        }
    }

    /// Decode the BD bits-6..4 field.
    pub fn from_bits(bits: u32) -> Result<Self, Lz4Error> {
        match bits {
            4 => Ok(BlockSizeId::Max64Kb),
            5 => Ok(BlockSizeId::Max256Kb),
            6 => Ok(BlockSizeId::Max1Mb),
            7 => Ok(BlockSizeId::Max4Mb),
            _ => Err(Lz4Error::MaxBlockSizeInvalid),
        }
    }

    /// Smallest identifier whose block size holds `src_size`, capped at
    /// `self`.
    pub fn optimal_for(self, src_size: usize) -> Self {
        let mut proposed = BlockSizeId::Max64Kb;
        let mut max = 64 * 1024usize;
        while (self as u32) > (proposed as u32) {
            if src_size <= max {
                return proposed;
            }
            proposed = match proposed {
                BlockSizeId::Max64Kb => BlockSizeId::Max256Kb,
                BlockSizeId::Max256Kb => BlockSizeId::Max1Mb,
                _ => BlockSizeId::Max4Mb,
            };
            max <<= 2;
        }
        self
    }
}

/// Block linking mode: linked blocks share a 64 KiB history window,
/// independent blocks do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockMode {
    #[default]
    Linked,
    Independent,
}

/// Whether an XXH32 of the whole content follows the end marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentChecksum {
    #[default]
    Disabled,
    Enabled,
}

/// Whether an XXH32 of the stored bytes follows each block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockChecksum {
    #[default]
    Disabled,
    Enabled,
}

/// Frame kind: standard LZ4 frame or opaque skippable frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameType {
    #[default]
    Frame,
    SkippableFrame,
}

/// Decoded (or to-be-encoded) frame header parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInfo {
    pub block_size_id: BlockSizeId,
    pub block_mode: BlockMode,
    pub content_checksum_flag: ContentChecksum,
    pub frame_type: FrameType,
    /// Uncompressed content size; 0 = not recorded in the header.
    pub content_size: u64,
    /// Dictionary ID hint; 0 = none.
    pub dict_id: u32,
    pub block_checksum_flag: BlockChecksum,
}

/// Compression preferences for frame production.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preferences {
    pub frame_info: FrameInfo,
    /// Compression level: < 2 routes to the fast codec (negative values map
    /// to acceleration `1 - level`); 2–12 select the HC strategies.
    pub compression_level: i32,
    /// Bias the optimal parser toward decompression speed.
    pub favor_dec_speed: bool,
}

/// Stages of the frame decoding state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DecodeStage {
    ParseHeader,
    ReadBlockHeader,
    CopyOrDecompress,
    VerifyBlockChecksum,
    VerifyContentChecksum,
    Done,
}
