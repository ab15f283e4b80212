//! Command-line argument definitions using clap.

use crate::config::{Settings, ANYCAST_TARGET_COUNTRY};
use crate::processing::{parse_job_list, ExcludeMode, Job};
use clap::{Parser, Subcommand};
use std::error::Error;

/// Turn per-ASN / per-country IP allocations into minimal CIDR lists.
///
/// Results are written below the output directory as
/// `<asn>/IPV<v>.cidr` or `<asn>/<continent>_<country>_IPV<v>.cidr`.
#[derive(Parser, Debug)]
#[command(name = "asn-cidr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output directory (default: output, or OUTPUT_DIR)
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Drop CIDRs matching the anycast prefix lists
    #[arg(long, global = true, value_enum)]
    pub exclude_anycast: Option<ExcludeMode>,

    /// Country codes to drop when scanning all countries (repeatable or comma separated)
    #[arg(long = "exclude-country", global = true, value_delimiter = ',')]
    pub exclude_countries: Vec<String>,

    /// Prefix list cache file (default: prefix_cache_<date>.json)
    #[arg(long, global = true)]
    pub prefix_cache: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// All ranges of one ASN (or ALL) from the ASN dataset
    Asn {
        asn: String,
        /// 4 or 6
        ip_version: String,
    },

    /// Ranges of an ASN restricted to a continent and country (each may be ALL)
    Area {
        asn: String,
        continent: String,
        country: String,
        /// 4 or 6
        ip_version: String,
    },

    /// Run every job listed in a file, one `<asn> [<continent> <country>] <ip_version>` per line
    Jobs { file: String },

    /// Write the anycast prefix lists without the prefixes of one country
    Anycast {
        #[arg(long, default_value = ANYCAST_TARGET_COUNTRY)]
        country: String,
    },
}

impl Cli {
    /// Apply command-line overrides on top of `settings`.
    pub fn settings(&self, mut settings: Settings) -> Settings {
        if let Some(output) = &self.output {
            settings.output_dir = output.clone();
        }
        if !self.exclude_countries.is_empty() {
            settings.exclude_countries = self
                .exclude_countries
                .iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
        }
        settings
    }

    /// Jobs requested by the command; empty for `anycast`.
    pub fn jobs(&self) -> Result<Vec<Job>, Box<dyn Error>> {
        let jobs = match &self.command {
            Commands::Asn { asn, ip_version } => vec![Job::from_args(&[asn, ip_version])?],
            Commands::Area {
                asn,
                continent,
                country,
                ip_version,
            } => vec![Job::from_args(&[asn, continent, country, ip_version])?],
            Commands::Jobs { file } => {
                let text = std::fs::read_to_string(file)
                    .map_err(|e| format!("Error reading job list {file}: {e}"))?;
                parse_job_list(&text)
            }
            Commands::Anycast { .. } => vec![],
        };
        Ok(jobs)
    }
}
