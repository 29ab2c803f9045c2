//! # Tag Codec Tests
//!
//! Address decomposition and the line span of multi-byte accesses.

use proptest::prelude::*;
use rstest::rstest;

use cachesim_core::cache::TagCodec;

#[rstest]
#[case(64, 64, 0x0000, 0x0, 0, 0x00)]
#[case(64, 64, 0x1040, 0x41, 1, 0x00)]
#[case(64, 1, 0xdead_beef, 0xdead_beef >> 6, 0, 0x2f)]
#[case(32, 8, 0x12345, 0x12345 >> 5, (0x12345 >> 5) & 7, 0x05)]
fn test_split(
    #[case] line: usize,
    #[case] sets: usize,
    #[case] addr: u64,
    #[case] tag: u64,
    #[case] set_index: usize,
    #[case] offset: u64,
) {
    let split = TagCodec::new(line, sets).split(addr);
    assert_eq!(split.tag, tag);
    assert_eq!(split.set_index, set_index);
    assert_eq!(split.line_offset, offset);
}

#[test]
fn test_recover_yields_line_base() {
    let codec = TagCodec::new(64, 16);
    let split = codec.split(0x4_0123);
    assert_eq!(codec.recover(split.tag), 0x4_0100);
}

#[rstest]
#[case::within_one_line(0x40, 4, vec![0x40])]
#[case::exact_line(0x40, 64, vec![0x40])]
#[case::straddles(0x7e, 4, vec![0x40, 0x80])]
#[case::three_lines(0x3f, 66, vec![0x00, 0x40, 0x80])]
#[case::zero_size_touches_one_line(0x90, 0, vec![0x80])]
fn test_line_span(#[case] addr: u64, #[case] size: u32, #[case] expected: Vec<u64>) {
    let codec = TagCodec::new(64, 4);
    let lines: Vec<u64> = codec.lines(addr, size).collect();
    assert_eq!(lines, expected);
}

proptest! {
    /// The span visits exactly ceil((addr mod line + size) / line) lines, contiguous and aligned.
    #[test]
    fn prop_line_span_covers_range(
        line_shift in 2u32..8,
        addr in 0u64..(1 << 40),
        size in 1u32..2048,
    ) {
        let line = 1u64 << line_shift;
        let codec = TagCodec::new(line as usize, 4);
        let lines: Vec<u64> = codec.lines(addr, size).collect();

        let expected = ((addr % line) + u64::from(size)).div_ceil(line);
        prop_assert_eq!(lines.len() as u64, expected);
        prop_assert_eq!(codec.lines(addr, size).len() as u64, expected);
        prop_assert_eq!(lines[0], addr & !(line - 1));
        for pair in lines.windows(2) {
            prop_assert_eq!(pair[1] - pair[0], line);
        }
        let last = *lines.last().unwrap();
        prop_assert!(last <= addr + u64::from(size) - 1);
        prop_assert!(addr + u64::from(size) - 1 < last + line);
    }

    /// Splitting then recovering never moves an address out of its line.
    #[test]
    fn prop_recover_is_line_base(addr in any::<u64>(), sets_shift in 0u32..12) {
        let codec = TagCodec::new(64, 1 << sets_shift);
        let split = codec.split(addr);
        prop_assert_eq!(codec.recover(split.tag) + split.line_offset, addr);
        prop_assert!(split.set_index < 1 << sets_shift);
    }
}
