//! CIDR processing logic.
//!
//! This module contains the business logic of the tool:
//! - [`decompose`] - Range to minimal CIDR list
//! - [`filter`] - Subset/overlap tests and exclusion filtering
//! - [`jobs`] - Job parsing and execution
//! - [`anycast`] - Anycast prefix filtering by country

mod anycast;
mod decompose;
mod filter;
mod jobs;

// Re-export public functions
pub use anycast::{anycast_file_name, filter_anycast_by_country, AnycastSplit};
pub use decompose::{decompose, decompose_all, decompose_pair};
pub use filter::{
    filter_cidrs, is_excluded, is_subset_or_equal, overlaps, range_overlaps_any,
    try_is_subset_or_equal, CountryExclusion, ExcludeMode, ExcludeSet,
};
pub use jobs::{parse_job_list, run_job, Area, Exclusions, Job, JobOutput};
