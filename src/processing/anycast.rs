//! Remove a country's own prefixes from an anycast prefix list.

use super::filter::range_overlaps_any;
use crate::models::{CidrBlock, IpRange, IpVersion};

/// Anycast prefixes left after removing those inside a country.
#[derive(Debug, Default)]
pub struct AnycastSplit {
    pub v4: Vec<CidrBlock>,
    pub v6: Vec<CidrBlock>,
    /// Prefixes overlapping the country's ranges.
    pub dropped: usize,
    /// Entries that did not parse.
    pub invalid: usize,
}

/// Keep prefixes that do not overlap any of `country_ranges`.
///
/// Prefixes keep their input order within each version.
pub fn filter_anycast_by_country<S: AsRef<str>>(
    cidrs: &[S],
    country_ranges: &[IpRange],
    country: &str,
) -> AnycastSplit {
    let mut split = AnycastSplit::default();

    for raw in cidrs {
        let raw = raw.as_ref();
        let block = match CidrBlock::parse(raw) {
            Ok(block) => block,
            Err(e) => {
                log::warn!("  -> Skipping invalid CIDR: {raw} ({e})");
                split.invalid += 1;
                continue;
            }
        };
        if range_overlaps_any(&block, country_ranges) {
            log::debug!("  -> Filtering out {block} (belongs to {country})");
            split.dropped += 1;
            continue;
        }
        match block.version() {
            IpVersion::V4 => split.v4.push(block),
            IpVersion::V6 => split.v6.push(block),
        }
    }

    log::info!(
        "Anycast filter for {country}: kept {} IPv4 + {} IPv6, dropped {}, invalid {}",
        split.v4.len(),
        split.v6.len(),
        split.dropped,
        split.invalid
    );
    split
}

/// File name of the filtered output for `version` and `country`.
pub fn anycast_file_name(version: IpVersion, country: &str) -> String {
    format!(
        "anycast_ipv{}_{}_filtered.txt",
        version.number(),
        country.to_lowercase()
    )
}
