//! Allocation record read from the ASN datasets.

use super::{IpRange, IpVersion};
use serde::{Deserialize, Serialize};

/// Wildcard accepted by every selector.
pub const ALL: &str = "ALL";

/// Matches one value of a record field, or every value for `ALL`.
#[derive(Serialize, Deserialize, Eq, PartialEq, Debug, Clone, Hash)]
pub enum Selector {
    All,
    Value(String),
}

impl Selector {
    pub fn new(value: &str) -> Selector {
        let value = value.trim();
        if value == ALL {
            Selector::All
        } else {
            Selector::Value(value.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }

    pub fn matches(&self, field: &str) -> bool {
        match self {
            Selector::All => true,
            Selector::Value(v) => v == field,
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Selector::All => write!(f, "{ALL}"),
            Selector::Value(v) => write!(f, "{v}"),
        }
    }
}

/// One contiguous allocation with its registry metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRecord {
    /// Allocated addresses.
    pub range: IpRange,
    /// ISO country code, empty when the dataset has no country column.
    pub country: String,
    /// Continent code, empty when the dataset has no continent column.
    pub continent: String,
    /// Autonomous system, e.g. `AS13335`.
    pub asn: String,
    /// Operator name, when present.
    pub as_name: Option<String>,
}

impl AllocationRecord {
    pub fn version(&self) -> IpVersion {
        self.range.version()
    }
}
