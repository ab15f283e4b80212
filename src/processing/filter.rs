//! CIDR set containment, overlap and exclusion filtering.
//!
//! Comparisons across address families never match: a candidate is only
//! dropped when a same-version exclude entry covers or touches it.

use crate::error::{CidrError, Result};
use crate::models::{get_cidr_mask, AllocationRecord, CidrBlock, IpRange, IpVersion};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How a candidate is compared against exclude entries.
#[derive(Serialize, Deserialize, Eq, PartialEq, Debug, Copy, Clone, Hash, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExcludeMode {
    /// Drop candidates wholly inside (or equal to) an exclude block.
    Subset,
    /// Drop candidates sharing any address with an exclude block.
    Overlap,
}

fn same_version(left: IpVersion, right: IpVersion) -> Result<()> {
    if left != right {
        return Err(CidrError::VersionMismatch { left, right });
    }
    Ok(())
}

/// Every address of `a` is in `b`; errors on mixed versions.
pub fn try_is_subset_or_equal(a: &CidrBlock, b: &CidrBlock) -> Result<bool> {
    same_version(a.version(), b.version())?;
    if a.len < b.len {
        return Ok(false);
    }
    let mask = get_cidr_mask(b.version(), b.len)?;
    Ok(a.base.bits & mask == b.base.bits)
}

/// Every address of `a` is in `b`. Mixed versions are never a subset.
pub fn is_subset_or_equal(a: &CidrBlock, b: &CidrBlock) -> bool {
    try_is_subset_or_equal(a, b).unwrap_or_else(|e| {
        log::trace!("is_subset_or_equal({a}, {b}): {e}");
        false
    })
}

/// Closed ranges intersect. Mixed versions never overlap.
pub fn overlaps(a: &IpRange, b: &IpRange) -> bool {
    a.version() == b.version() && a.start <= b.end && a.end >= b.start
}

/// `block` shares at least one address with any of `ranges`.
pub fn range_overlaps_any(block: &CidrBlock, ranges: &[IpRange]) -> bool {
    let r = block.to_range();
    ranges.iter().any(|other| overlaps(&r, other))
}

/// Parsed exclude list, e.g. anycast prefixes.
#[derive(Debug, Default, Clone)]
pub struct ExcludeSet {
    pub blocks: Vec<CidrBlock>,
}

impl ExcludeSet {
    pub fn new(blocks: Vec<CidrBlock>) -> ExcludeSet {
        ExcludeSet { blocks }
    }

    /// Parse raw CIDR strings, skipping malformed entries with a warning.
    pub fn from_strings<S: AsRef<str>>(raw: &[S]) -> ExcludeSet {
        let blocks = raw
            .iter()
            .filter_map(|s| match CidrBlock::parse(s.as_ref()) {
                Ok(block) => Some(block),
                Err(e) => {
                    log::warn!("Skipping invalid exclude CIDR '{}': {e}", s.as_ref());
                    None
                }
            })
            .collect();
        ExcludeSet { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Should `candidate` be dropped given `set` and `mode`.
pub fn is_excluded(candidate: &CidrBlock, set: &ExcludeSet, mode: ExcludeMode) -> bool {
    let hit = match mode {
        ExcludeMode::Subset => set.blocks.iter().find(|b| is_subset_or_equal(candidate, b)),
        ExcludeMode::Overlap => {
            let r = candidate.to_range();
            set.blocks.iter().find(|b| overlaps(&r, &b.to_range()))
        }
    };
    if let Some(b) = hit {
        log::debug!("Excluding {candidate} ({mode:?} match on {b})");
    }
    hit.is_some()
}

/// Keep candidates not excluded by `set`, preserving order.
pub fn filter_cidrs(candidates: Vec<CidrBlock>, set: &ExcludeSet, mode: ExcludeMode) -> Vec<CidrBlock> {
    if set.is_empty() {
        return candidates;
    }
    let original_count = candidates.len();
    let kept: Vec<CidrBlock> = candidates
        .into_iter()
        .filter(|c| !is_excluded(c, set, mode))
        .collect();

    let filtered_count = original_count - kept.len();
    if filtered_count > 0 {
        log::info!("Filtered out {filtered_count} CIDR(s) matching the exclude list ({mode:?})");
    }
    kept
}

/// Row-level country exclusion.
///
/// Only active when scanning all countries; a job that names a country
/// keeps its rows regardless of the code list.
#[derive(Debug, Default, Clone)]
pub struct CountryExclusion {
    pub codes: BTreeSet<String>,
    pub active: bool,
}

impl CountryExclusion {
    /// Build from codes plus the job's country selector state.
    pub fn new<S: AsRef<str>>(codes: &[S], scanning_all_countries: bool) -> CountryExclusion {
        CountryExclusion {
            codes: codes
                .iter()
                .map(|c| c.as_ref().trim().to_ascii_uppercase())
                .filter(|c| !c.is_empty())
                .collect(),
            active: scanning_all_countries,
        }
    }

    /// Drop this record before decomposition.
    pub fn skips(&self, record: &AllocationRecord) -> bool {
        self.active && self.codes.contains(&record.country.to_ascii_uppercase())
    }
}
