//! Input collaborators.
//!
//! This module loads the data the core works on:
//! - [`records`] - Allocation datasets (CSV)
//! - [`prefix_list`] - Anycast prefix lists (HTTP with a dated cache)

mod prefix_list;
mod records;

// Re-export public types and functions
pub use prefix_list::{
    default_cache_file, fetch_prefix_lists, parse_prefix_cache, parse_prefix_list,
    read_prefix_cache, PrefixCache,
};
pub use records::{load_country_ranges, load_records, parse_records, prefilter_lines};
