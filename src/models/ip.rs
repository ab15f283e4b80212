//! IP address model shared by IPv4 and IPv6.
//!
//! Addresses are stored as a `u128` plus an [`IpVersion`] tag so that the
//! mask and alignment helpers below are written once for both widths.

use crate::error::{CidrError, Result};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Address family.
#[derive(Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// Number of bits in an address of this family.
    pub fn width(self) -> u8 {
        match self {
            IpVersion::V4 => 32,
            IpVersion::V6 => 128,
        }
    }

    /// Highest address value, `2^width - 1`.
    pub fn max_bits(self) -> u128 {
        match self {
            IpVersion::V4 => u32::MAX as u128,
            IpVersion::V6 => u128::MAX,
        }
    }

    /// Version number as used on the command line and in file names.
    pub fn number(self) -> u8 {
        match self {
            IpVersion::V4 => 4,
            IpVersion::V6 => 6,
        }
    }

    /// Parse the `4` / `6` version token.
    pub fn from_number(n: &str) -> Result<IpVersion> {
        match n.trim() {
            "4" => Ok(IpVersion::V4),
            "6" => Ok(IpVersion::V6),
            other => Err(CidrError::InvalidJob(format!(
                "ip_version must be 4 or 6, but got {other}"
            ))),
        }
    }
}

impl std::fmt::Display for IpVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "IPv{}", self.number())
    }
}

/// Bits below the network part for prefix `len`, all set.
pub fn host_mask(version: IpVersion, len: u8) -> Result<u128> {
    let width = version.width();
    if len > width {
        return Err(CidrError::InvalidPrefix { len, version });
    }
    let host_bits = u32::from(width - len);
    let host = if host_bits == 128 {
        u128::MAX
    } else {
        (1u128 << host_bits) - 1
    };
    Ok(host & version.max_bits())
}

/// Convert a prefix length to a network mask.
///
/// `/0` yields an all-zero mask and `/width` an all-ones mask.
pub fn get_cidr_mask(version: IpVersion, len: u8) -> Result<u128> {
    Ok(version.max_bits() & !host_mask(version, len)?)
}

/// Get the network address for a given address and prefix length.
pub fn cut_addr(addr: IpAddress, len: u8) -> Result<IpAddress> {
    let mask = get_cidr_mask(addr.version, len)?;
    Ok(IpAddress {
        version: addr.version,
        bits: addr.bits & mask,
    })
}

/// Last address of the block of prefix `len` containing `addr`.
pub fn broadcast_addr(addr: IpAddress, len: u8) -> Result<IpAddress> {
    let host = host_mask(addr.version, len)?;
    Ok(IpAddress {
        version: addr.version,
        bits: addr.bits | host,
    })
}

/// Smallest prefix length `addr` is aligned to, from its trailing zeros.
///
/// The all-zero address is aligned to `/0`.
pub fn lo_mask(addr: IpAddress) -> u8 {
    let width = addr.version.width();
    let trailing_zeros = addr.bits.trailing_zeros().min(u32::from(width)) as u8;
    width - trailing_zeros
}

/// An IPv4 or IPv6 address.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct IpAddress {
    /// Address family.
    pub version: IpVersion,
    /// Address value, always within `0..=version.max_bits()`.
    pub bits: u128,
}

impl IpAddress {
    /// Build an address, rejecting values wider than the family allows.
    pub fn new(version: IpVersion, bits: u128) -> Result<IpAddress> {
        if bits > version.max_bits() {
            return Err(CidrError::Parse(format!(
                "value {bits:#x} does not fit in {version}"
            )));
        }
        Ok(IpAddress { version, bits })
    }

    /// Address one above this one, or `None` at the top of the space.
    pub fn checked_next(&self) -> Option<IpAddress> {
        if self.bits == self.version.max_bits() {
            None
        } else {
            Some(IpAddress {
                version: self.version,
                bits: self.bits + 1,
            })
        }
    }

    /// Convert to the standard library representation.
    pub fn to_std(&self) -> IpAddr {
        match self.version {
            IpVersion::V4 => IpAddr::V4(Ipv4Addr::from(self.bits as u32)),
            IpVersion::V6 => IpAddr::V6(Ipv6Addr::from(self.bits)),
        }
    }
}

impl From<IpAddr> for IpAddress {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => IpAddress {
                version: IpVersion::V4,
                bits: u128::from(u32::from(v4)),
            },
            IpAddr::V6(v6) => IpAddress {
                version: IpVersion::V6,
                bits: u128::from(v6),
            },
        }
    }
}

impl From<Ipv4Addr> for IpAddress {
    fn from(addr: Ipv4Addr) -> Self {
        IpAddress::from(IpAddr::V4(addr))
    }
}

impl From<Ipv6Addr> for IpAddress {
    fn from(addr: Ipv6Addr) -> Self {
        IpAddress::from(IpAddr::V6(addr))
    }
}

impl FromStr for IpAddress {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        s.parse::<IpAddr>()
            .map(IpAddress::from)
            .map_err(|_| CidrError::Parse(format!("invalid IP address: {s}")))
    }
}

impl std::fmt::Display for IpAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_std())
    }
}
