// Wire-format interop against an independent LZ4 implementation
// (`lz4_flex`): frames and raw blocks, both directions.

use lz4x::{
    compress_frame_to_vec, compress_hc, decompress_frame_to_vec, BlockChecksum, BlockMode,
    BlockSizeId, ContentChecksum, FrameInfo, Preferences,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::io::{Read, Write};

fn corpus() -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(0x1A4);
    let mut v = b"interoperability, interoperability, interoperability! ".repeat(400);
    let noise_at = v.len() / 2;
    rng.fill(&mut v[noise_at..noise_at + 4096]);
    v
}

fn foreign_decode(frame: &[u8]) -> Vec<u8> {
    let mut decoder = lz4_flex::frame::FrameDecoder::new(frame);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).unwrap();
    out
}

#[test]
fn our_default_frame_decodes_elsewhere() {
    let src = corpus();
    let frame = compress_frame_to_vec(&src, None).unwrap();
    assert_eq!(foreign_decode(&frame), src);
}

#[test]
fn our_checked_independent_frame_decodes_elsewhere() {
    let src = corpus();
    let p = Preferences {
        frame_info: FrameInfo {
            block_size_id: BlockSizeId::Max64Kb,
            block_mode: BlockMode::Independent,
            content_checksum_flag: ContentChecksum::Enabled,
            block_checksum_flag: BlockChecksum::Enabled,
            ..FrameInfo::default()
        },
        compression_level: 0,
        ..Preferences::default()
    };
    let frame = compress_frame_to_vec(&src, Some(&p)).unwrap();
    assert_eq!(foreign_decode(&frame), src);
}

#[test]
fn our_linked_hc_frame_decodes_elsewhere() {
    let src = corpus();
    for level in [2, 9, 12] {
        let p = Preferences {
            frame_info: FrameInfo {
                block_size_id: BlockSizeId::Max64Kb,
                block_mode: BlockMode::Linked,
                content_checksum_flag: ContentChecksum::Enabled,
                ..FrameInfo::default()
            },
            compression_level: level,
            ..Preferences::default()
        };
        let frame = compress_frame_to_vec(&src, Some(&p)).unwrap();
        assert_eq!(foreign_decode(&frame), src, "level {level}");
    }
}

#[test]
fn foreign_frame_decodes_here() {
    let src = corpus();
    let mut encoder = lz4_flex::frame::FrameEncoder::new(Vec::new());
    encoder.write_all(&src).unwrap();
    let frame = encoder.finish().unwrap();
    assert_eq!(decompress_frame_to_vec(&frame).unwrap(), src);
}

#[test]
fn our_block_decodes_elsewhere() {
    let src = corpus();
    let mut dst = vec![0u8; lz4x::compress_bound(src.len())];
    let n = lz4x::compress_default(&src, &mut dst).unwrap();
    let foreign = lz4_flex::block::decompress(&dst[..n], src.len()).unwrap();
    assert_eq!(foreign, src);
}

#[test]
fn our_hc_block_decodes_elsewhere() {
    let src = corpus();
    let mut dst = vec![0u8; lz4x::compress_bound(src.len())];
    for level in [2, 5, 9, 11] {
        let n = compress_hc(&src, &mut dst, level).unwrap();
        let foreign = lz4_flex::block::decompress(&dst[..n], src.len()).unwrap();
        assert_eq!(foreign, src, "level {level}");
    }
}

#[test]
fn foreign_block_decodes_here() {
    let src = corpus();
    let compressed = lz4_flex::block::compress(&src);
    let mut out = vec![0u8; src.len()];
    let n = lz4x::decompress_safe(&compressed, &mut out).unwrap();
    assert_eq!(n, src.len());
    assert_eq!(out, src);
}
