//! Range to CIDR decomposition.
//!
//! Splits an inclusive address range into the minimal ascending list of
//! aligned CIDR blocks covering it exactly.

use crate::error::Result;
use crate::models::{broadcast_addr, lo_mask, CidrBlock, IpAddress, IpRange};

/// Decompose a range into its minimal CIDR cover.
pub fn decompose(range: IpRange) -> Vec<CidrBlock> {
    let mut blocks = Vec::new();
    let mut cursor = range.start;

    loop {
        let len = find_biggest_block(cursor, range.end);
        let block = CidrBlock { base: cursor, len };
        let last = block.hi();
        blocks.push(block);

        if last >= range.end {
            break;
        }
        // last < end, so there is always a next address
        match last.checked_next() {
            Some(next) => cursor = next,
            None => break,
        }
    }

    log::trace!("decompose({range}) => {} block(s)", blocks.len());
    blocks
}

/// Decompose two endpoints, validating them into a range first.
pub fn decompose_pair(start: IpAddress, end: IpAddress) -> Result<Vec<CidrBlock>> {
    Ok(decompose(IpRange::new(start, end)?))
}

/// Decompose many ranges, concatenating their blocks in input order.
pub fn decompose_all<'a, I>(ranges: I) -> Vec<CidrBlock>
where
    I: IntoIterator<Item = &'a IpRange>,
{
    ranges.into_iter().flat_map(|r| decompose(*r)).collect()
}

/// Find the biggest block starting at `start_ip` that ends at or before `end`.
///
/// The returned prefix length is constrained by:
/// 1. The alignment of `start_ip` - it must be the network address of the block
/// 2. The block's last address must not pass `end`
fn find_biggest_block(start_ip: IpAddress, end: IpAddress) -> u8 {
    let width = start_ip.version.width();

    // Alignment gives the smallest usable prefix length
    let mut next_len = lo_mask(start_ip);

    loop {
        let hi = broadcast_addr(start_ip, next_len).unwrap_or(start_ip);
        if hi > end && next_len < width {
            next_len += 1;
        } else {
            break;
        }
    }

    debug_assert!(next_len <= width, "next_len[{next_len}] > {width} should never happen.");
    next_len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CidrError;

    fn range(start: &str, end: &str) -> IpRange {
        IpRange::parse(start, end).unwrap()
    }

    fn strings(blocks: &[CidrBlock]) -> Vec<String> {
        blocks.iter().map(|b| b.to_string()).collect()
    }

    /// Check exact cover: ascending, contiguous, inside the range.
    fn assert_exact_cover(r: IpRange, blocks: &[CidrBlock]) {
        assert!(!blocks.is_empty());
        assert_eq!(blocks[0].lo(), r.start);
        assert_eq!(blocks[blocks.len() - 1].hi(), r.end);
        for pair in blocks.windows(2) {
            assert_eq!(pair[0].hi().checked_next(), Some(pair[1].lo()));
        }
        for b in blocks {
            assert!(r.contains(b.lo()) && r.contains(b.hi()), "{b} outside {r}");
            assert_eq!(CidrBlock::new(b.base, b.len).unwrap(), *b);
        }
    }

    #[test]
    fn test_find_biggest_block() {
        let start: IpAddress = "10.0.0.0".parse().unwrap();
        assert_eq!(24, find_biggest_block(start, "10.0.0.255".parse().unwrap()));
        assert_eq!(13, find_biggest_block(start, "10.11.15.255".parse().unwrap()));

        // 10.6.2.80 can only be /28 or smaller due to alignment
        let start: IpAddress = "10.6.2.80".parse().unwrap();
        assert_eq!(28, find_biggest_block(start, "10.6.7.255".parse().unwrap()));
        assert_eq!(30, find_biggest_block(start, "10.6.2.84".parse().unwrap()));
    }

    #[test]
    fn test_aligned_block() {
        let blocks = decompose(range("10.0.0.0", "10.0.0.7"));
        assert_eq!(strings(&blocks), vec!["10.0.0.0/29"]);
    }

    #[test]
    fn test_unaligned_range() {
        let r = range("10.0.0.1", "10.0.0.6");
        let blocks = decompose(r);
        assert_eq!(
            strings(&blocks),
            vec!["10.0.0.1/32", "10.0.0.2/31", "10.0.0.4/31", "10.0.0.6/32"]
        );
        assert_exact_cover(r, &blocks);
    }

    #[test]
    fn test_class_c() {
        let blocks = decompose(range("192.168.1.0", "192.168.1.255"));
        assert_eq!(strings(&blocks), vec!["192.168.1.0/24"]);
    }

    #[test]
    fn test_ipv6_block() {
        let blocks = decompose(range("2001:db8::", "2001:db8::ff"));
        assert_eq!(strings(&blocks), vec!["2001:db8::/120"]);
    }

    #[test]
    fn test_single_address() {
        assert_eq!(strings(&decompose(range("1.2.3.4", "1.2.3.4"))), vec!["1.2.3.4/32"]);
        assert_eq!(strings(&decompose(range("::1", "::1"))), vec!["::1/128"]);
    }

    #[test]
    fn test_full_space() {
        assert_eq!(
            strings(&decompose(range("0.0.0.0", "255.255.255.255"))),
            vec!["0.0.0.0/0"]
        );
        assert_eq!(
            strings(&decompose(range("::", "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff"))),
            vec!["::/0"]
        );
    }

    #[test]
    fn test_top_of_space() {
        let r = range("255.255.255.254", "255.255.255.255");
        assert_eq!(strings(&decompose(r)), vec!["255.255.255.254/31"]);

        let r = range("255.255.255.253", "255.255.255.255");
        let blocks = decompose(r);
        assert_eq!(
            strings(&blocks),
            vec!["255.255.255.253/32", "255.255.255.254/31"]
        );
        assert_exact_cover(r, &blocks);
    }

    #[test]
    fn test_real_world_range() {
        // typical registry allocation that is not a single block
        let r = range("1.0.4.0", "1.0.7.255");
        assert_eq!(strings(&decompose(r)), vec!["1.0.4.0/22"]);

        let r = range("1.0.1.0", "1.0.3.255");
        let blocks = decompose(r);
        assert_eq!(strings(&blocks), vec!["1.0.1.0/24", "1.0.2.0/23"]);
        assert_exact_cover(r, &blocks);
    }

    #[test]
    fn test_cover_properties_many_ranges() {
        let cases = [
            ("10.0.0.3", "10.0.1.17"),
            ("0.0.0.1", "0.0.0.254"),
            ("172.16.5.77", "172.31.0.2"),
            ("2001:db8::3", "2001:db8::1:4"),
            ("::ffff", "::1:0"),
        ];
        for (start, end) in cases {
            let r = range(start, end);
            let blocks = decompose(r);
            assert_exact_cover(r, &blocks);

            // re-decomposing each emitted block yields that block alone
            for b in &blocks {
                assert_eq!(decompose(b.to_range()), vec![*b]);
            }
        }
    }

    #[test]
    fn test_minimal_count() {
        // 0.0.0.1 - 0.0.0.254 needs 2 blocks per bit level below /24
        let blocks = decompose(range("0.0.0.1", "0.0.0.254"));
        assert_eq!(blocks.len(), 14);
    }

    #[test]
    fn test_decompose_pair_errors() {
        let a: IpAddress = "10.0.0.2".parse().unwrap();
        let b: IpAddress = "10.0.0.1".parse().unwrap();
        assert!(matches!(
            decompose_pair(a, b),
            Err(CidrError::InvalidRange { .. })
        ));
        let v6: IpAddress = "::1".parse().unwrap();
        assert_eq!(
            decompose_pair(a, v6).unwrap_err(),
            CidrError::InvalidRange {
                start: "10.0.0.2".to_string(),
                end: "::1".to_string()
            }
        );
        assert_eq!(decompose_pair(b, a).unwrap().len(), 2);
    }

    #[test]
    fn test_decompose_all_keeps_order() {
        let ranges = vec![range("10.0.1.0", "10.0.1.255"), range("10.0.0.0", "10.0.0.127")];
        let blocks = decompose_all(&ranges);
        assert_eq!(strings(&blocks), vec!["10.0.1.0/24", "10.0.0.0/25"]);
    }
}
