//! Prefix list retrieval and caching.
//!
//! Fetches plain-text CIDR lists (one per line, `#` comments) over HTTP and
//! keeps a dated JSON cache so repeated runs on the same day stay offline.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;

/// Cached prefix lists.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct PrefixCache {
    /// Source URLs in fetch order.
    pub urls: Vec<String>,
    /// Raw CIDR strings, comments and blanks removed.
    pub cidrs: Vec<String>,
    /// RFC 3339 fetch time.
    pub fetched_at: String,
}

/// Split a prefix list into entries, dropping blanks and `#` comments.
pub fn parse_prefix_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

async fn fetch_one(client: &reqwest::Client, url: &str) -> Result<Vec<String>, Box<dyn Error>> {
    log::info!("Fetching CIDRs from {url}...");
    let response = client.get(url).send().await?.error_for_status()?;
    let text = response.text().await?;
    Ok(parse_prefix_list(&text))
}

/// Fetch every URL; a failing URL is logged and contributes nothing.
pub async fn fetch_prefix_lists(urls: &[String]) -> Vec<String> {
    let client = reqwest::Client::new();
    let results = join_all(urls.iter().map(|url| fetch_one(&client, url))).await;

    let mut cidrs = Vec::new();
    for (url, result) in urls.iter().zip(results) {
        match result {
            Ok(list) => {
                log::info!("Got {} CIDR(s) from {url}", list.len());
                cidrs.extend(list);
            }
            Err(e) => log::error!("Error fetching CIDR list from {url}: {e}"),
        }
    }
    log::info!("Total CIDRs fetched: {}", cidrs.len());
    cidrs
}

/// Default cache file name for today.
pub fn default_cache_file() -> String {
    format!("prefix_cache_{}.json", chrono::Utc::now().format("%Y-%m-%d"))
}

/// Parse cache JSON, reporting the failing path on error.
pub fn parse_prefix_cache(json: &str) -> Result<PrefixCache, Box<dyn Error>> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    let cache: PrefixCache = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| format!("Error parsing cache JSON: path={} error={}", e.path(), e))?;
    Ok(cache)
}

/// Read prefix lists from the cache file, or fetch them and write the cache.
///
/// A cache built from a different URL set is ignored.
pub async fn read_prefix_cache(
    cache_file: Option<&str>,
    urls: &[String],
) -> Result<Vec<String>, Box<dyn Error>> {
    let cache_file = match cache_file {
        Some(file) => file.to_string(),
        None => default_cache_file(),
    };

    if Path::new(&cache_file).exists() {
        let json = std::fs::read_to_string(&cache_file)
            .map_err(|e| format!("Error reading cache file {cache_file}: {e}"))?;
        let cache = parse_prefix_cache(&json)?;
        if cache.urls == urls {
            log::info!("Reading prefix lists from cache file: {cache_file}");
            return Ok(cache.cidrs);
        }
        log::warn!("Cache file {cache_file} was built from other URLs, fetching again");
    } else {
        log::warn!("Cache file not found: {cache_file}");
    }

    let cidrs = fetch_prefix_lists(urls).await;
    if cidrs.is_empty() {
        return Err("No prefixes fetched from any URL".into());
    }

    let cache = PrefixCache {
        urls: urls.to_vec(),
        cidrs,
        fetched_at: chrono::Utc::now().to_rfc3339(),
    };
    let json = serde_json::to_string(&cache).map_err(|e| format!("Error serializing JSON: {e}"))?;
    log::warn!("Writing prefix lists to cache file: {cache_file}");
    std::fs::write(&cache_file, json)
        .map_err(|e| format!("Error writing cache file {cache_file}: {e}"))?;
    Ok(cache.cidrs)
}
