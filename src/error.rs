//! Error types for the CIDR core.

use crate::models::IpVersion;
use thiserror::Error;

/// Result type alias for CIDR operations.
pub type Result<T> = std::result::Result<T, CidrError>;

/// Errors raised while parsing, decomposing or comparing address data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CidrError {
    /// Range start lies above its end.
    #[error("invalid range: start {start} > end {end}")]
    InvalidRange {
        /// First address of the range
        start: String,
        /// Last address of the range
        end: String,
    },

    /// Malformed IP address or CIDR string.
    #[error("parse error: {0}")]
    Parse(String),

    /// Operands of different address families.
    #[error("version mismatch: {left} vs {right}")]
    VersionMismatch {
        /// Version of the left operand
        left: IpVersion,
        /// Version of the right operand
        right: IpVersion,
    },

    /// Prefix length wider than the address.
    #[error("prefix length /{len} is too long for {version}")]
    InvalidPrefix {
        /// Requested prefix length
        len: u8,
        /// Address family it was applied to
        version: IpVersion,
    },

    /// Job line or arguments that cannot be turned into a job.
    #[error("invalid job: {0}")]
    InvalidJob(String),
}
