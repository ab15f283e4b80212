//! Turn per-ASN / per-country IP allocation records into minimal CIDR lists.
//!
//! - [`models`] - addresses, CIDR blocks, ranges and dataset records
//! - [`processing`] - range decomposition, exclusion filtering and jobs
//! - [`input`] - CSV datasets and anycast prefix lists
//! - [`output`] - CIDR files and the terminal summary

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod models;
pub mod output;
pub mod processing;

use cli::{Cli, Commands};
use config::{Settings, ANYCAST_OUTPUT_SUBDIR};
use models::{AllocationRecord, IpVersion, Selector};
use processing::{
    anycast_file_name, filter_anycast_by_country, run_job, AnycastSplit, ExcludeMode, ExcludeSet,
    Exclusions, Job, JobOutput,
};
use std::collections::HashMap;
use std::error::Error;
use std::path::Path;

/// Configure log4rs from `log4rs.yml`, or log to stderr at info level.
pub fn init_logging(config_file: &str) -> Result<(), Box<dyn Error>> {
    if Path::new(config_file).exists() {
        log4rs::init_file(config_file, Default::default())
            .map_err(|e| format!("Error initializing log4rs from {config_file}: {e}"))?;
        return Ok(());
    }

    use log4rs::append::console::{ConsoleAppender, Target};
    use log4rs::config::{Appender, Config, Root};
    use log4rs::encode::pattern::PatternEncoder;

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(
            "{d(%H:%M:%S)} {h({l:5})} {M} - {m}{n}",
        )))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(log::LevelFilter::Info))?;
    log4rs::init_config(config)?;
    Ok(())
}

/// Records per (dataset, asn), so jobs sharing an ASN read the file once.
type RecordCache = HashMap<(String, Selector), Vec<AllocationRecord>>;

/// Run jobs and write one CIDR file per job.
pub fn run_jobs(
    jobs: &[Job],
    settings: &Settings,
    prefixes: Option<(ExcludeSet, ExcludeMode)>,
) -> Result<Vec<JobOutput>, Box<dyn Error>> {
    let exclusions = Exclusions {
        countries: settings.exclude_countries.clone(),
        prefixes,
    };
    let mut cache: RecordCache = HashMap::new();
    let mut outputs = Vec::with_capacity(jobs.len());

    for job in jobs {
        let dataset = if job.needs_country_data() {
            &settings.country_asn_csv
        } else {
            &settings.asn_csv
        };
        let key = (dataset.clone(), job.asn.clone());
        if !cache.contains_key(&key) {
            let records = input::load_records(dataset, &job.asn)?;
            cache.insert(key.clone(), records);
        }
        let records = cache.get(&key).map(Vec::as_slice).unwrap_or_default();

        let output = run_job(job, records, &exclusions);
        output::write_cidr_file(&settings.output_dir, &output.file_name, &output.cidrs)?;
        outputs.push(output);
    }
    Ok(outputs)
}

/// Fetch (or read cached) anycast prefixes as an exclude set.
pub async fn load_anycast_exclusions(
    settings: &Settings,
    cache_file: Option<&str>,
) -> Result<ExcludeSet, Box<dyn Error>> {
    let raw = input::read_prefix_cache(cache_file, &settings.anycast_urls).await?;
    let set = ExcludeSet::from_strings(&raw);
    log::info!("Loaded {} anycast prefix(es) for exclusion", set.len());
    Ok(set)
}

/// Write the anycast lists without the prefixes of `country`.
///
/// Returns `None` when the dataset has no ranges for the country.
pub async fn run_anycast_filter(
    settings: &Settings,
    country: &str,
    cache_file: Option<&str>,
) -> Result<Option<AnycastSplit>, Box<dyn Error>> {
    let country_ranges = input::load_country_ranges(&settings.country_asn_csv, country)?;
    if country_ranges.is_empty() {
        log::warn!("No IP ranges found for {country}. Cannot perform filtering.");
        return Ok(None);
    }

    let cidrs = input::read_prefix_cache(cache_file, &settings.anycast_urls).await?;
    log::info!("Filtering out CIDRs belonging to {country}...");
    let split = filter_anycast_by_country(&cidrs, &country_ranges, country);

    let dir = Path::new(&settings.output_dir).join(ANYCAST_OUTPUT_SUBDIR);
    let dir = dir.to_string_lossy();
    output::write_cidr_file(&dir, &anycast_file_name(IpVersion::V4, country), &split.v4)?;
    output::write_cidr_file(&dir, &anycast_file_name(IpVersion::V6, country), &split.v6)?;
    Ok(Some(split))
}

/// Execute the parsed command line.
pub async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let settings = cli.settings(Settings::from_env());

    if let Commands::Anycast { country } = &cli.command {
        run_anycast_filter(&settings, country, cli.prefix_cache.as_deref()).await?;
        return Ok(());
    }

    let jobs = cli.jobs()?;
    if jobs.is_empty() {
        log::warn!("No jobs to run");
        return Ok(());
    }

    let prefixes = match cli.exclude_anycast {
        Some(mode) => Some((
            load_anycast_exclusions(&settings, cli.prefix_cache.as_deref()).await?,
            mode,
        )),
        None => None,
    };

    let outputs = run_jobs(&jobs, &settings, prefixes)?;
    output::print_job_summary(&outputs);
    Ok(())
}
