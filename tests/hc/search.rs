// Pattern run-length helpers used by the repetitive-pattern rescue.

use lz4x::hc::search::{count_pattern, reverse_count_pattern};

/// Little-endian 4-byte pattern value for a byte quadruple.
fn pat(bytes: [u8; 4]) -> u32 {
    u32::from_le_bytes(bytes)
}

#[test]
fn count_full_run() {
    let s = b"abababababab";
    assert_eq!(count_pattern(s, pat(*b"abab")), s.len());
}

#[test]
fn count_stops_at_break() {
    let s = b"abababX_____";
    assert_eq!(count_pattern(s, pat(*b"abab")), 6);
}

#[test]
fn count_handles_tail_shorter_than_word() {
    // 9 bytes: one 8-byte word plus a single trailing byte.
    let s = b"aaaaaaaaa";
    assert_eq!(count_pattern(s, pat(*b"aaaa")), 9);
}

#[test]
fn count_empty() {
    assert_eq!(count_pattern(b"", pat(*b"aaaa")), 0);
}

#[test]
fn reverse_full_run() {
    let s = b"cdcdcdcd";
    assert_eq!(reverse_count_pattern(s, pat(*b"cdcd")), s.len());
}

#[test]
fn reverse_stops_at_break() {
    let s = b"Xcdcdcdcd";
    assert_eq!(reverse_count_pattern(s, pat(*b"cdcd")), 8);
}

#[test]
fn reverse_partial_phase() {
    // The slice ends on a pattern boundary; a leading partial repetition
    // still counts byte by byte.
    let s = b"dcdcdcd";
    // Stepping back: d, c, d, c, d, c, d — all continue the "cdcd" cycle.
    assert_eq!(reverse_count_pattern(s, pat(*b"cdcd")), 7);
}

#[test]
fn single_byte_pattern_runs() {
    let s = vec![0x7Eu8; 100];
    assert_eq!(count_pattern(&s, pat([0x7E; 4])), 100);
    assert_eq!(reverse_count_pattern(&s, pat([0x7E; 4])), 100);
}
