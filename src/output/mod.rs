//! Output of CIDR data.
//!
//! This module handles writing and reporting results:
//! - [`cidr_file`] - CIDR-per-line files
//! - [`terminal`] - Job summary on stdout

mod cidr_file;
mod terminal;

pub use cidr_file::{read_cidr_file, render_cidrs, write_cidr_file};
pub use terminal::{format_field, print_job_summary, summary_row};
