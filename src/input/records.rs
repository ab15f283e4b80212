//! Allocation dataset loading.
//!
//! Reads `asn.csv` (`start_ip,end_ip,asn,name,domain`) or `country_asn.csv`
//! (`start_ip,end_ip,country,country_name,continent,continent_name,asn,as_name,as_domain`)
//! into typed [`AllocationRecord`]s.

use crate::models::{AllocationRecord, IpRange, Selector};
use regex::Regex;
use serde::Deserialize;
use std::error::Error;
use std::path::Path;

/// One CSV row as found in either dataset.
#[derive(Deserialize, Debug)]
struct CsvRow {
    start_ip: String,
    end_ip: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    continent: String,
    #[serde(default)]
    asn: String,
    #[serde(default, alias = "name")]
    as_name: Option<String>,
}

impl CsvRow {
    fn into_record(self) -> Result<AllocationRecord, Box<dyn Error>> {
        let range = IpRange::parse(&self.start_ip, &self.end_ip)?;
        Ok(AllocationRecord {
            range,
            country: self.country.trim().to_string(),
            continent: self.continent.trim().to_string(),
            asn: self.asn.trim().to_string(),
            as_name: self.as_name.filter(|n| !n.is_empty()),
        })
    }
}

/// Keep the header plus the lines that mention `asn` as a whole field.
///
/// The CSV reader checks the `asn` column afterwards; this only avoids
/// parsing the whole dataset for a single ASN.
pub fn prefilter_lines(text: &str, asn: &Selector) -> Result<String, Box<dyn Error>> {
    let asn = match asn {
        Selector::All => return Ok(text.to_string()),
        Selector::Value(v) => v,
    };
    let re = Regex::new(&format!(r"(^|,){}(,|\r?$)", regex::escape(asn)))?;

    let mut lines = text.lines();
    let mut out = String::new();
    if let Some(header) = lines.next() {
        out.push_str(header);
        out.push('\n');
    }
    let mut kept = 0;
    for line in lines.filter(|l| re.is_match(l)) {
        out.push_str(line);
        out.push('\n');
        kept += 1;
    }
    log::debug!("prefilter_lines({asn}) kept {kept} line(s)");
    Ok(out)
}

/// Parse CSV text into records, skipping rows that fail validation.
pub fn parse_records(text: &str) -> Result<Vec<AllocationRecord>, Box<dyn Error>> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let mut records = Vec::new();
    let mut skipped = 0;

    for (i, row) in reader.deserialize::<CsvRow>().enumerate() {
        let record = row
            .map_err(|e| Box::new(e) as Box<dyn Error>)
            .and_then(CsvRow::into_record);
        match record {
            Ok(record) => records.push(record),
            Err(e) => {
                log::warn!("Skipping CSV row {}: {e}", i + 1);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} invalid CSV row(s)");
    }
    Ok(records)
}

/// Load the records of `asn` (or every record for `ALL`) from a dataset file.
pub fn load_records(path: &str, asn: &Selector) -> Result<Vec<AllocationRecord>, Box<dyn Error>> {
    if !Path::new(path).exists() {
        return Err(format!(
            "Dataset file does not exist: {path}. Please download the necessary data files."
        )
        .into());
    }
    log::info!("Reading records for asn={asn} from {path}");
    let text = std::fs::read_to_string(path).map_err(|e| format!("Error reading {path}: {e}"))?;
    let text = prefilter_lines(&text, asn)?;
    let records = parse_records(&text)?;
    log::info!("Loaded {} record(s) from {path}", records.len());
    Ok(records)
}

/// Load every range allocated to `country`, both IP versions.
pub fn load_country_ranges(path: &str, country: &str) -> Result<Vec<IpRange>, Box<dyn Error>> {
    log::info!("Loading IP ranges for country: {country} from {path}...");
    let ranges: Vec<IpRange> = load_records(path, &Selector::All)?
        .into_iter()
        .filter(|r| r.country == country)
        .map(|r| r.range)
        .collect();
    log::info!("Loaded {} range(s) for {country}", ranges.len());
    Ok(ranges)
}
