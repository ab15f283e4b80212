//! Jobs: which records to select and how to turn them into a CIDR file.

use super::decompose::decompose;
use super::filter::{filter_cidrs, CountryExclusion, ExcludeMode, ExcludeSet};
use crate::error::{CidrError, Result};
use crate::models::{AllocationRecord, CidrBlock, IpVersion, Selector};

/// Area part of a job: continent and country selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    pub continent: Selector,
    pub country: Selector,
}

/// One unit of work, e.g. `AS13335 4` or `ALL AS CN 6`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub asn: Selector,
    pub area: Option<Area>,
    pub version: IpVersion,
}

impl Job {
    /// Build a job from its whitespace separated tokens.
    ///
    /// Two tokens are `<asn> <ip_version>`, four are
    /// `<asn> <continent> <country> <ip_version>`.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Job> {
        let args: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();
        match args.as_slice() {
            [asn, version] => Ok(Job {
                asn: Selector::new(asn),
                area: None,
                version: IpVersion::from_number(version)?,
            }),
            [asn, continent, country, version] => Ok(Job {
                asn: Selector::new(asn),
                area: Some(Area {
                    continent: Selector::new(continent),
                    country: Selector::new(country),
                }),
                version: IpVersion::from_number(version)?,
            }),
            other => Err(CidrError::InvalidJob(format!(
                "expected 2 or 4 arguments, got {}: {:?}",
                other.len(),
                other
            ))),
        }
    }

    /// Record matches every selector and the job's IP version.
    pub fn matches(&self, record: &AllocationRecord) -> bool {
        if record.version() != self.version || !self.asn.matches(&record.asn) {
            return false;
        }
        match &self.area {
            Some(area) => {
                area.continent.matches(&record.continent) && area.country.matches(&record.country)
            }
            None => true,
        }
    }

    /// Country exclusion applies when the job does not pick one country.
    pub fn scans_all_countries(&self) -> bool {
        self.area.as_ref().map_or(true, |a| a.country.is_all())
    }

    /// Output path relative to the output directory.
    pub fn file_name(&self) -> String {
        match &self.area {
            None => format!("{}/IPV{}.cidr", self.asn, self.version.number()),
            Some(area) => format!(
                "{}/{}_{}_IPV{}.cidr",
                self.asn,
                area.continent,
                area.country,
                self.version.number()
            ),
        }
    }

    /// Which dataset the job reads: area jobs need the country columns.
    pub fn needs_country_data(&self) -> bool {
        self.area.is_some()
    }
}

impl std::fmt::Display for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.area {
            None => write!(f, "{} {}", self.asn, self.version.number()),
            Some(area) => write!(
                f,
                "{} {} {} {}",
                self.asn,
                area.continent,
                area.country,
                self.version.number()
            ),
        }
    }
}

/// Parse a job list: one job per line, `#` comments and blanks ignored.
///
/// Bad lines are logged and skipped.
pub fn parse_job_list(text: &str) -> Vec<Job> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            match Job::from_args(&tokens) {
                Ok(job) => Some(job),
                Err(e) => {
                    log::warn!("Skipping job list line {}: '{line}': {e}", i + 1);
                    None
                }
            }
        })
        .collect()
}

/// Exclusions applied while running a job.
#[derive(Debug, Default, Clone)]
pub struct Exclusions {
    /// Country codes dropped when scanning all countries.
    pub countries: Vec<String>,
    /// Anycast (or other) prefixes with their comparison mode.
    pub prefixes: Option<(ExcludeSet, ExcludeMode)>,
}

/// Result of a job, ready to be written out.
#[derive(Debug, Clone)]
pub struct JobOutput {
    pub file_name: String,
    pub records_matched: usize,
    pub records_skipped: usize,
    pub cidrs: Vec<CidrBlock>,
}

/// Select the job's records, decompose them and apply exclusions.
pub fn run_job(job: &Job, records: &[AllocationRecord], exclusions: &Exclusions) -> JobOutput {
    log::info!("#Start run_job({job})");
    let country_exclusion = CountryExclusion::new(&exclusions.countries, job.scans_all_countries());

    let mut records_matched = 0;
    let mut records_skipped = 0;
    let mut cidrs = Vec::new();
    for record in records.iter().filter(|r| job.matches(r)) {
        if country_exclusion.skips(record) {
            log::debug!(
                "Skipping {} ({}): country {} is excluded",
                record.range,
                record.asn,
                record.country
            );
            records_skipped += 1;
            continue;
        }
        records_matched += 1;
        cidrs.extend(decompose(record.range));
    }

    if let Some((set, mode)) = &exclusions.prefixes {
        cidrs = filter_cidrs(cidrs, set, *mode);
    }

    log::info!(
        "# job '{job}' matched {records_matched} record(s), skipped {records_skipped}, {} CIDR(s)",
        cidrs.len()
    );
    JobOutput {
        file_name: job.file_name(),
        records_matched,
        records_skipped,
        cidrs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IpRange;

    fn record(start: &str, end: &str, asn: &str, continent: &str, country: &str) -> AllocationRecord {
        AllocationRecord {
            range: IpRange::parse(start, end).unwrap(),
            country: country.to_string(),
            continent: continent.to_string(),
            asn: asn.to_string(),
            as_name: None,
        }
    }

    fn sample_records() -> Vec<AllocationRecord> {
        vec![
            record("1.0.0.0", "1.0.0.255", "AS13335", "OC", "AU"),
            record("1.0.1.0", "1.0.3.255", "AS4134", "AS", "CN"),
            record("1.1.1.0", "1.1.1.255", "AS13335", "OC", "AU"),
            record("104.16.0.0", "104.16.0.6", "AS13335", "NA", "US"),
            record("2606:4700::", "2606:4700::ffff", "AS13335", "NA", "US"),
        ]
    }

    fn strings(blocks: &[CidrBlock]) -> Vec<String> {
        blocks.iter().map(|b| b.to_string()).collect()
    }

    #[test]
    fn test_from_args() {
        let job = Job::from_args(&["AS13335", "4"]).unwrap();
        assert_eq!(job.asn, Selector::Value("AS13335".to_string()));
        assert_eq!(job.area, None);
        assert_eq!(job.file_name(), "AS13335/IPV4.cidr");

        let job = Job::from_args(&["ALL", "AS", "CN", "6"]).unwrap();
        assert!(job.asn.is_all());
        assert_eq!(job.file_name(), "ALL/AS_CN_IPV6.cidr");
        assert_eq!(job.to_string(), "ALL AS CN 6");

        assert!(Job::from_args(&["AS1", "5"]).is_err());
        assert!(Job::from_args(&["AS1", "AS", "4"]).is_err());
        assert!(Job::from_args::<&str>(&[]).is_err());
    }

    #[test]
    fn test_parse_job_list() {
        let text = "# comment\n\nAS13335 4\n  ALL OC AU 6  \nAS1 7\nbroken line here\n";
        let jobs = parse_job_list(text);
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].to_string(), "AS13335 4");
        assert_eq!(jobs[1].to_string(), "ALL OC AU 6");
    }

    #[test]
    fn test_job_matches() {
        let records = sample_records();
        let job = Job::from_args(&["AS13335", "4"]).unwrap();
        let matched: Vec<_> = records.iter().filter(|r| job.matches(r)).collect();
        assert_eq!(matched.len(), 3);

        let job = Job::from_args(&["AS13335", "NA", "ALL", "6"]).unwrap();
        assert_eq!(records.iter().filter(|r| job.matches(r)).count(), 1);

        let job = Job::from_args(&["ALL", "ALL", "CN", "4"]).unwrap();
        assert_eq!(records.iter().filter(|r| job.matches(r)).count(), 1);
    }

    #[test]
    fn test_run_job_asn() {
        let job = Job::from_args(&["AS13335", "4"]).unwrap();
        let out = run_job(&job, &sample_records(), &Exclusions::default());
        assert_eq!(
            strings(&out.cidrs),
            vec![
                "1.0.0.0/24",
                "1.1.1.0/24",
                "104.16.0.0/30",
                "104.16.0.4/31",
                "104.16.0.6/32"
            ]
        );
        assert_eq!(out.records_matched, 3);
        assert_eq!(out.file_name, "AS13335/IPV4.cidr");
    }

    #[test]
    fn test_run_job_country_exclusion_only_for_all() {
        let exclusions = Exclusions {
            countries: vec!["CN".to_string()],
            prefixes: None,
        };
        let job = Job::from_args(&["ALL", "ALL", "ALL", "4"]).unwrap();
        let out = run_job(&job, &sample_records(), &exclusions);
        assert_eq!(out.records_skipped, 1);
        assert!(!strings(&out.cidrs).contains(&"1.0.1.0/24".to_string()));

        // asking for CN explicitly ignores the exclusion
        let job = Job::from_args(&["ALL", "AS", "CN", "4"]).unwrap();
        let out = run_job(&job, &sample_records(), &exclusions);
        assert_eq!(out.records_skipped, 0);
        assert_eq!(strings(&out.cidrs), vec!["1.0.1.0/24", "1.0.2.0/23"]);

        // plain ASN jobs scan every country
        let job = Job::from_args(&["AS4134", "4"]).unwrap();
        let out = run_job(&job, &sample_records(), &exclusions);
        assert!(out.cidrs.is_empty());
    }

    #[test]
    fn test_run_job_anycast_exclusion() {
        let set = ExcludeSet::from_strings(&["1.1.1.0/24", "104.16.0.4/30"]);
        let job = Job::from_args(&["AS13335", "4"]).unwrap();

        let exclusions = Exclusions {
            countries: vec![],
            prefixes: Some((set.clone(), ExcludeMode::Subset)),
        };
        let out = run_job(&job, &sample_records(), &exclusions);
        assert_eq!(strings(&out.cidrs), vec!["1.0.0.0/24", "104.16.0.0/30"]);

        let set = ExcludeSet::from_strings(&["104.16.0.0/29"]);
        let exclusions = Exclusions {
            countries: vec![],
            prefixes: Some((set, ExcludeMode::Overlap)),
        };
        let out = run_job(&job, &sample_records(), &exclusions);
        assert_eq!(strings(&out.cidrs), vec!["1.0.0.0/24", "1.1.1.0/24"]);
    }
}
