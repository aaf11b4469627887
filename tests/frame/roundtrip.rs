// Frame format: round-trips across preference combinations, exact wire
// expectations for trivial frames, skippable frames, and concatenation.

use lz4x::{
    compress_frame, compress_frame_bound, compress_frame_to_vec, decompress_frame,
    decompress_frame_to_vec, get_frame_info, header_size, write_skippable_frame, BlockChecksum,
    BlockMode, BlockSizeId, ContentChecksum, FrameInfo, Preferences,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn prefs(
    mode: BlockMode,
    bsid: BlockSizeId,
    content: ContentChecksum,
    block: BlockChecksum,
    level: i32,
) -> Preferences {
    Preferences {
        frame_info: FrameInfo {
            block_size_id: bsid,
            block_mode: mode,
            content_checksum_flag: content,
            block_checksum_flag: block,
            ..FrameInfo::default()
        },
        compression_level: level,
        ..Preferences::default()
    }
}

fn frame_roundtrip(src: &[u8], p: Option<&Preferences>) -> Vec<u8> {
    let frame = compress_frame_to_vec(src, p).unwrap();
    assert!(frame.len() <= compress_frame_bound(src.len(), p), "bound");
    let mut out = vec![0u8; src.len() + 64];
    let n = decompress_frame(&frame, &mut out).unwrap();
    assert_eq!(n, src.len());
    out.truncate(n);
    assert_eq!(out, src);
    frame
}

fn mixed_corpus(len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(0xF00D);
    let mut v = vec![0u8; len];
    rng.fill(&mut v[..]);
    // Carve compressible stretches into the noise.
    let phrase = b"structured segment / structured segment ";
    let mut pos = 0;
    while pos + 4096 < v.len() {
        for (i, b) in v[pos..pos + 2048].iter_mut().enumerate() {
            *b = phrase[i % phrase.len()];
        }
        pos += 8192;
    }
    v
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trips
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn default_preferences_roundtrip() {
    let src = b"frame me, frame me, frame me, frame me, frame me once more";
    frame_roundtrip(src, None);
}

#[test]
fn preference_matrix_roundtrip() {
    // 200 KiB spans several 64 KiB blocks.
    let src = mixed_corpus(200_000);
    for mode in [BlockMode::Linked, BlockMode::Independent] {
        for content in [ContentChecksum::Disabled, ContentChecksum::Enabled] {
            for block in [BlockChecksum::Disabled, BlockChecksum::Enabled] {
                for level in [0, 2, 9] {
                    let p = prefs(mode, BlockSizeId::Max64Kb, content, block, level);
                    frame_roundtrip(&src, Some(&p));
                }
            }
        }
    }
}

#[test]
fn block_size_ids_roundtrip() {
    let src = mixed_corpus(300_000);
    for bsid in [
        BlockSizeId::Max64Kb,
        BlockSizeId::Max256Kb,
        BlockSizeId::Max1Mb,
        BlockSizeId::Max4Mb,
    ] {
        let p = prefs(
            BlockMode::Linked,
            bsid,
            ContentChecksum::Enabled,
            BlockChecksum::Disabled,
            0,
        );
        frame_roundtrip(&src, Some(&p));
    }
}

#[test]
fn high_level_independent_blocks_roundtrip() {
    let src = b"The quick brown fox jumps over the lazy dog. ".repeat(100);
    let p = prefs(
        BlockMode::Independent,
        BlockSizeId::Max64Kb,
        ContentChecksum::Disabled,
        BlockChecksum::Disabled,
        12,
    );
    let frame = frame_roundtrip(&src, Some(&p));
    assert!(frame.len() < src.len() / 4);
}

#[test]
fn linked_mode_exploits_cross_block_history() {
    // A 32 KiB random section repeated three times over 64 KiB blocks: the
    // final 32 KiB block can only reference the previous block in linked
    // mode, so independent mode must store it raw.
    let mut rng = StdRng::seed_from_u64(0xABCD);
    let mut section = vec![0u8; 32_768];
    rng.fill(&mut section[..]);
    let src: Vec<u8> = section.repeat(3);

    let linked = frame_roundtrip(
        &src,
        Some(&prefs(
            BlockMode::Linked,
            BlockSizeId::Max64Kb,
            ContentChecksum::Disabled,
            BlockChecksum::Disabled,
            0,
        )),
    );
    let independent = frame_roundtrip(
        &src,
        Some(&prefs(
            BlockMode::Independent,
            BlockSizeId::Max64Kb,
            ContentChecksum::Disabled,
            BlockChecksum::Disabled,
            0,
        )),
    );
    assert!(
        linked.len() + 16_384 < independent.len(),
        "linked {} vs independent {}",
        linked.len(),
        independent.len()
    );
}

#[test]
fn incompressible_blocks_stored_verbatim() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut src = vec![0u8; 70_000];
    rng.fill(&mut src[..]);
    let frame = frame_roundtrip(&src, None);
    // Two stored blocks + framing: barely any growth.
    assert!(frame.len() < src.len() + 64);
    // Stored-block flag visible in the first block header.
    let hsize = header_size(&frame).unwrap();
    let bh = u32::from_le_bytes(frame[hsize..hsize + 4].try_into().unwrap());
    assert_ne!(bh & 0x8000_0000, 0, "expected an uncompressed block");
}

// ─────────────────────────────────────────────────────────────────────────────
// Exact wire shapes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_input_minimal_frame() {
    let frame = compress_frame_to_vec(&[], None).unwrap();
    // 7-byte header + 4-byte end marker.
    assert_eq!(frame.len(), 11);
    assert_eq!(&frame[..4], &[0x04, 0x22, 0x4D, 0x18]);
    assert_eq!(&frame[7..11], &[0, 0, 0, 0]);

    let mut out = [0u8; 8];
    assert_eq!(decompress_frame(&frame, &mut out).unwrap(), 0);
}

#[test]
fn empty_input_with_content_checksum() {
    let p = prefs(
        BlockMode::Linked,
        BlockSizeId::Default,
        ContentChecksum::Enabled,
        BlockChecksum::Disabled,
        0,
    );
    let frame = compress_frame_to_vec(&[], Some(&p)).unwrap();
    // Header + end marker + XXH32 of the empty content.
    assert_eq!(frame.len(), 15);
    assert_eq!(
        u32::from_le_bytes(frame[11..15].try_into().unwrap()),
        0x02CC_5D05
    );
    let mut out = [0u8; 8];
    assert_eq!(decompress_frame(&frame, &mut out).unwrap(), 0);
}

#[test]
fn content_size_recorded_and_checked() {
    let src = b"sized content, sized content, sized content";
    let p = Preferences {
        frame_info: FrameInfo {
            content_size: 1, // any non-zero enables the field
            ..FrameInfo::default()
        },
        ..Preferences::default()
    };
    let frame = compress_frame_to_vec(src, Some(&p)).unwrap();
    let (info, hsize) = get_frame_info(&frame).unwrap();
    assert_eq!(info.content_size, src.len() as u64);
    assert_eq!(hsize, 15);
    assert_eq!(header_size(&frame).unwrap(), 15);

    let mut out = vec![0u8; src.len()];
    assert_eq!(decompress_frame(&frame, &mut out).unwrap(), src.len());
}

// ─────────────────────────────────────────────────────────────────────────────
// Skippable frames and concatenation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn skippable_frames_are_skipped() {
    let src = b"payload between skippable frames, repeated a bit, repeated a bit";
    let mut buf = Vec::new();

    let mut skip = vec![0u8; 64];
    let n = write_skippable_frame(b"opaque metadata", &mut skip, 3).unwrap();
    buf.extend_from_slice(&skip[..n]);

    buf.extend_from_slice(&compress_frame_to_vec(src, None).unwrap());

    let n = write_skippable_frame(b"", &mut skip, 15).unwrap();
    buf.extend_from_slice(&skip[..n]);

    let out = decompress_frame_to_vec(&buf).unwrap();
    assert_eq!(out, src);
}

#[test]
fn concatenated_frames_append() {
    let a = b"first frame first frame first frame ";
    let b = b"second frame second frame second frame ";
    let mut joined = compress_frame_to_vec(a, None).unwrap();
    joined.extend_from_slice(&compress_frame_to_vec(b, None).unwrap());

    let out = decompress_frame_to_vec(&joined).unwrap();
    let mut expected = a.to_vec();
    expected.extend_from_slice(b);
    assert_eq!(out, expected);
}

// ─────────────────────────────────────────────────────────────────────────────
// Bound and output sizing
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn bound_covers_worst_case() {
    let p = prefs(
        BlockMode::Independent,
        BlockSizeId::Max64Kb,
        ContentChecksum::Enabled,
        BlockChecksum::Enabled,
        0,
    );
    let mut rng = StdRng::seed_from_u64(0xBEEF);
    for size in [0usize, 1, 100, 65_536, 65_537, 200_000] {
        let mut src = vec![0u8; size];
        rng.fill(&mut src[..]);
        let bound = compress_frame_bound(size, Some(&p));
        let mut dst = vec![0u8; bound];
        let n = compress_frame(&src, &mut dst, Some(&p)).unwrap();
        assert!(n <= bound, "size {size}: {n} > {bound}");
    }
}

#[test]
fn exact_output_slice_roundtrip() {
    // The slice API works without the to_vec convenience.
    let src = mixed_corpus(100_000);
    let mut frame = vec![0u8; compress_frame_bound(src.len(), None)];
    let n = compress_frame(&src, &mut frame, None).unwrap();
    let mut out = vec![0u8; src.len()];
    assert_eq!(decompress_frame(&frame[..n], &mut out).unwrap(), src.len());
    assert_eq!(out, src);
}

#[test]
fn to_vec_without_content_size_hint() {
    let src = mixed_corpus(150_000);
    let frame = compress_frame_to_vec(&src, None).unwrap();
    assert_eq!(decompress_frame_to_vec(&frame).unwrap(), src);
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenario: 64 KiB cycle with content checksum
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn cycle_corpus_with_content_checksum() {
    let mut src = Vec::with_capacity(65_536);
    for _ in 0..256 {
        src.extend(0u8..=255);
    }
    let p = prefs(
        BlockMode::Linked,
        BlockSizeId::Max64Kb,
        ContentChecksum::Enabled,
        BlockChecksum::Disabled,
        9,
    );
    let frame = frame_roundtrip(&src, Some(&p));
    assert!(frame.len() < 2048, "low-entropy cycle should collapse");

    // Corrupting the trailing checksum bytes must fail the whole frame.
    let mut tampered = frame;
    let n = tampered.len();
    for b in &mut tampered[n - 4..] {
        *b ^= 0xA5;
    }
    let mut out = vec![0u8; src.len()];
    assert_eq!(
        decompress_frame(&tampered, &mut out),
        Err(lz4x::Lz4Error::ContentChecksumInvalid)
    );
}
