//! CIDR block and inclusive address range.

use super::ip::{broadcast_addr, cut_addr, get_cidr_mask, IpAddress, IpVersion};
use crate::error::{CidrError, Result};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Inclusive range of addresses of one family, `start <= end`.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct IpRange {
    pub start: IpAddress,
    pub end: IpAddress,
}

impl IpRange {
    /// Build a range, checking version agreement and ordering.
    pub fn new(start: IpAddress, end: IpAddress) -> Result<IpRange> {
        if start.version != end.version || start.bits > end.bits {
            return Err(CidrError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(IpRange { start, end })
    }

    /// Parse both ends from text.
    pub fn parse(start: &str, end: &str) -> Result<IpRange> {
        IpRange::new(start.parse()?, end.parse()?)
    }

    pub fn version(&self) -> IpVersion {
        self.start.version
    }

    pub fn contains(&self, ip: IpAddress) -> bool {
        ip.version == self.version() && ip >= self.start && ip <= self.end
    }
}

impl std::fmt::Display for IpRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Canonical CIDR block: `base` has no host bits set.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct CidrBlock {
    /// Network address.
    pub base: IpAddress,
    /// Prefix length, `0..=width`.
    pub len: u8,
}

impl CidrBlock {
    /// Build a block from a network address, rejecting host bits.
    pub fn new(base: IpAddress, len: u8) -> Result<CidrBlock> {
        let mask = get_cidr_mask(base.version, len)?;
        if base.bits & mask != base.bits {
            return Err(CidrError::Parse(format!(
                "{base}/{len} has host bits set"
            )));
        }
        Ok(CidrBlock { base, len })
    }

    /// Parse `addr/len`, clearing any host bits.
    ///
    /// A bare address is taken as a host block (`/32` or `/128`).
    pub fn parse(addr_cidr: &str) -> Result<CidrBlock> {
        let addr_cidr = addr_cidr.trim();
        let (addr, len) = match addr_cidr.split_once('/') {
            Some((addr, len)) => (addr, Some(len)),
            None => (addr_cidr, None),
        };
        let addr: IpAddress = addr.parse()?;
        let len = match len {
            Some(len) => len
                .trim()
                .parse::<u8>()
                .map_err(|_| CidrError::Parse(format!("invalid prefix length in {addr_cidr}")))?,
            None => addr.version.width(),
        };
        let base = cut_addr(addr, len)?;
        if base != addr {
            log::debug!("CIDR {addr_cidr} has host bits set, using {base}/{len}");
        }
        Ok(CidrBlock { base, len })
    }

    pub fn version(&self) -> IpVersion {
        self.base.version
    }

    /// Lowest (network) address in the block.
    pub fn lo(&self) -> IpAddress {
        self.base
    }

    /// Highest address in the block.
    ///
    /// Blocks must come from [`CidrBlock::new`] or [`CidrBlock::parse`]; a
    /// hand-built block with `len` wider than the address is a bug.
    pub fn hi(&self) -> IpAddress {
        debug_assert!(
            self.len <= self.version().width(),
            "prefix length /{} is too long for {}",
            self.len,
            self.version()
        );
        broadcast_addr(self.base, self.len).unwrap_or(self.base)
    }

    /// The block as an inclusive range.
    pub fn to_range(&self) -> IpRange {
        IpRange {
            start: self.lo(),
            end: self.hi(),
        }
    }

    /// Check if an address is contained within this block.
    pub fn contains(&self, ip: IpAddress) -> bool {
        self.to_range().contains(ip)
    }
}

impl FromStr for CidrBlock {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self> {
        CidrBlock::parse(s)
    }
}

impl std::fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.base, self.len)
    }
}

impl Serialize for CidrBlock {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CidrBlock {
    fn deserialize<D>(deserializer: D) -> std::result::Result<CidrBlock, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        CidrBlock::parse(&s).map_err(de::Error::custom)
    }
}
