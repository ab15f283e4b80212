//! Default settings, overridable from the environment (or a `.env` file).

use std::env;

/// Dataset with `start_ip,end_ip,asn,name,domain`.
pub const ASN_CSV: &str = "asn.csv";
/// Dataset with country and continent columns.
pub const COUNTRY_ASN_CSV: &str = "country_asn.csv";
/// Root of all generated CIDR files.
pub const OUTPUT_DIR: &str = "output";
/// Sub directory of [`OUTPUT_DIR`] for the anycast filter.
pub const ANYCAST_OUTPUT_SUBDIR: &str = "filtered_anycast";
/// Country whose prefixes are removed from the anycast lists.
pub const ANYCAST_TARGET_COUNTRY: &str = "CN";
/// Published anycast prefix lists.
pub const ANYCAST_URLS: [&str; 2] = [
    "https://raw.githubusercontent.com/bgptools/anycast-prefixes/master/anycatch-v4-prefixes.txt",
    "https://raw.githubusercontent.com/bgptools/anycast-prefixes/master/anycatch-v6-prefixes.txt",
];

/// Runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub asn_csv: String,
    pub country_asn_csv: String,
    pub output_dir: String,
    pub anycast_urls: Vec<String>,
    /// Countries dropped from jobs that scan all countries.
    pub exclude_countries: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            asn_csv: ASN_CSV.to_string(),
            country_asn_csv: COUNTRY_ASN_CSV.to_string(),
            output_dir: OUTPUT_DIR.to_string(),
            anycast_urls: ANYCAST_URLS.iter().map(|u| u.to_string()).collect(),
            exclude_countries: vec![],
        }
    }
}

impl Settings {
    /// Defaults overridden by `ASN_CSV`, `COUNTRY_ASN_CSV`, `OUTPUT_DIR`,
    /// `ANYCAST_URLS` and `EXCLUDE_COUNTRIES` (comma separated lists).
    pub fn from_env() -> Settings {
        let mut settings = Settings::default();
        if let Ok(v) = env::var("ASN_CSV") {
            settings.asn_csv = v;
        }
        if let Ok(v) = env::var("COUNTRY_ASN_CSV") {
            settings.country_asn_csv = v;
        }
        if let Ok(v) = env::var("OUTPUT_DIR") {
            settings.output_dir = v;
        }
        if let Ok(v) = env::var("ANYCAST_URLS") {
            settings.anycast_urls = split_list(&v);
        }
        if let Ok(v) = env::var("EXCLUDE_COUNTRIES") {
            settings.exclude_countries = split_list(&v);
        }
        log::debug!("settings: {settings:?}");
        settings
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("CN, RU,,IR "), vec!["CN", "RU", "IR"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.asn_csv, "asn.csv");
        assert_eq!(settings.anycast_urls.len(), 2);
        assert!(settings.exclude_countries.is_empty());
    }
}
