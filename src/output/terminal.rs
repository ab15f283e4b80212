//! Terminal output utilities.
//!
//! Prints a per-job summary after the CIDR files are written.

use crate::processing::JobOutput;
use colored::Colorize;
use itertools::Itertools;

/// Number of CIDRs shown per job in the summary.
const PREVIEW_LEN: usize = 3;

/// Format a value as a quoted, right-aligned field.
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let quoted = format!("\"{}\"", value.to_string());
    format!("{quoted:>width$}")
}

/// One summary line for a finished job.
pub fn summary_row(output: &JobOutput) -> String {
    let mut preview = output.cidrs.iter().take(PREVIEW_LEN).join(",");
    if output.cidrs.len() > PREVIEW_LEN {
        preview.push_str(",...");
    }
    format!(
        "{file},{matched},{skipped},{cidrs},{preview}",
        file = format_field(&output.file_name, 32),
        matched = format_field(output.records_matched, 8),
        skipped = format_field(output.records_skipped, 8),
        cidrs = format_field(output.cidrs.len(), 8),
        preview = format_field(preview, 0),
    )
}

/// Print the summary table for all jobs to stdout.
pub fn print_job_summary(outputs: &[JobOutput]) {
    println!(
        r#"{:>32},{:>8},{:>8},{:>8},"preview""#,
        "\"file\"", "\"rows\"", "\"skipped\"", "\"cidrs\""
    );
    for output in outputs {
        let row = summary_row(output);
        if output.cidrs.is_empty() {
            println!("{}", row.yellow());
        } else {
            println!("{row}");
        }
    }
    let total: usize = outputs.iter().map(|o| o.cidrs.len()).sum();
    println!(
        "#{}# {} job(s), {total} CIDR(s) written",
        "DONE".on_green(),
        outputs.len()
    );
}
