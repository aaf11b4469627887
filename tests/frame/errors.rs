// Frame decoding failure modes: malformed headers, truncation, checksum
// mismatches, and bit-flip sensitivity.

use lz4x::{
    compress_frame_to_vec, decompress_frame, header_size, BlockChecksum, BlockMode, BlockSizeId,
    ContentChecksum, FrameInfo, Lz4Error, Preferences,
};

fn checked_prefs() -> Preferences {
    Preferences {
        frame_info: FrameInfo {
            block_size_id: BlockSizeId::Max64Kb,
            block_mode: BlockMode::Linked,
            content_checksum_flag: ContentChecksum::Enabled,
            block_checksum_flag: BlockChecksum::Enabled,
            ..FrameInfo::default()
        },
        ..Preferences::default()
    }
}

fn sample_frame() -> Vec<u8> {
    let src = b"integrity matters, integrity matters, integrity matters!";
    compress_frame_to_vec(src, Some(&checked_prefs())).unwrap()
}

fn decode(frame: &[u8]) -> Result<usize, Lz4Error> {
    let mut out = vec![0u8; 4096];
    decompress_frame(frame, &mut out)
}

// ─────────────────────────────────────────────────────────────────────────────
// Header validation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_and_truncated_headers() {
    assert_eq!(header_size(&[]), Err(Lz4Error::FrameHeaderIncomplete));
    let frame = sample_frame();
    assert_eq!(decode(&frame[..4]), Err(Lz4Error::FrameHeaderIncomplete));
    assert_eq!(decode(&frame[..6]), Err(Lz4Error::FrameHeaderIncomplete));
}

#[test]
fn wrong_magic() {
    let mut frame = sample_frame();
    frame[0] ^= 0x01;
    assert_eq!(decode(&frame), Err(Lz4Error::FrameTypeUnknown));
}

#[test]
fn wrong_version_bits() {
    let mut frame = sample_frame();
    frame[4] = (frame[4] & 0x3F) | 0x80;
    assert_eq!(decode(&frame), Err(Lz4Error::HeaderVersionWrong));
}

#[test]
fn reserved_flag_bits() {
    let mut frame = sample_frame();
    frame[4] |= 0x02;
    assert_eq!(decode(&frame), Err(Lz4Error::ReservedFlagSet));

    let mut frame = sample_frame();
    frame[5] |= 0x08;
    assert_eq!(decode(&frame), Err(Lz4Error::ReservedFlagSet));
}

#[test]
fn invalid_block_size_id() {
    let mut frame = sample_frame();
    frame[5] = (frame[5] & 0x8F) | 0x20; // BD block-size id = 2
    assert_eq!(decode(&frame), Err(Lz4Error::MaxBlockSizeInvalid));
}

#[test]
fn header_checksum_mismatch() {
    let mut frame = sample_frame();
    frame[6] ^= 0xFF; // header checksum byte of a minimal descriptor
    assert_eq!(decode(&frame), Err(Lz4Error::HeaderChecksumInvalid));
}

// ─────────────────────────────────────────────────────────────────────────────
// Body validation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn truncated_body_is_frame_size_wrong() {
    let frame = sample_frame();
    let hsize = header_size(&frame).unwrap();
    // Cut mid block-header, mid block-data, and before the end marker.
    for cut in [hsize + 2, hsize + 10, frame.len() - 6] {
        assert_eq!(decode(&frame[..cut]), Err(Lz4Error::FrameSizeWrong), "cut {cut}");
    }
}

#[test]
fn block_checksum_mismatch() {
    let mut frame = sample_frame();
    let hsize = header_size(&frame).unwrap();
    let block_len =
        (u32::from_le_bytes(frame[hsize..hsize + 4].try_into().unwrap()) & 0x7FFF_FFFF) as usize;
    // The 4 bytes after the block data hold its checksum.
    frame[hsize + 4 + block_len] ^= 0x10;
    assert_eq!(decode(&frame), Err(Lz4Error::BlockChecksumInvalid));
}

#[test]
fn content_checksum_mismatch() {
    let mut frame = sample_frame();
    let n = frame.len();
    frame[n - 1] ^= 0x01;
    assert_eq!(decode(&frame), Err(Lz4Error::ContentChecksumInvalid));
}

#[test]
fn corrupt_block_data_detected() {
    let mut frame = sample_frame();
    let hsize = header_size(&frame).unwrap();
    // Flip a bit inside the compressed block payload: either the block
    // checksum or the decoder itself must object.
    frame[hsize + 7] ^= 0x40;
    let err = decode(&frame).unwrap_err();
    assert!(
        matches!(
            err,
            Lz4Error::BlockChecksumInvalid
                | Lz4Error::DecompressionFailed
                | Lz4Error::ContentChecksumInvalid
        ),
        "unexpected {err:?}"
    );
}

#[test]
fn any_sampled_bit_flip_is_detected() {
    // With both checksum layers enabled, no single bit flip may pass
    // silently. Sampling keeps the runtime reasonable.
    let frame = sample_frame();
    let mut bit = 0;
    while bit < frame.len() * 8 {
        let mut tampered = frame.clone();
        tampered[bit / 8] ^= 1 << (bit % 8);
        assert!(
            decode(&tampered).is_err(),
            "bit flip at {bit} went unnoticed"
        );
        bit += 7;
    }
}

#[test]
fn output_too_small() {
    let src = b"does not fit, does not fit, does not fit, does not fit!!";
    let frame = compress_frame_to_vec(src, None).unwrap();
    let mut out = vec![0u8; 8];
    assert_eq!(
        decompress_frame(&frame, &mut out),
        Err(Lz4Error::OutputTooSmall)
    );
}

#[test]
fn truncated_skippable_frame() {
    // Magic + length announcing more payload than present.
    let mut frame = vec![0x52, 0x2A, 0x4D, 0x18, 0xFF, 0x00, 0x00, 0x00];
    frame.extend_from_slice(&[0u8; 16]);
    assert_eq!(decode(&frame), Err(Lz4Error::FrameSizeWrong));
}
