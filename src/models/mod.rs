//! Domain models for ASN CIDR summaries.
//!
//! This module contains the core data structures used throughout the application:
//! - [`IpAddress`] and [`IpVersion`] - IPv4/IPv6 address with width-generic mask helpers
//! - [`CidrBlock`] and [`IpRange`] - canonical CIDR block and inclusive range
//! - [`AllocationRecord`] and [`Selector`] - typed dataset row and field matcher

mod cidr;
mod ip;
mod record;

// Re-export public types
pub use cidr::{CidrBlock, IpRange};
pub use ip::{
    broadcast_addr, cut_addr, get_cidr_mask, host_mask, lo_mask, IpAddress, IpVersion,
};
pub use record::{AllocationRecord, Selector, ALL};
