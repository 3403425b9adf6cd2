//! Utility functions for assembling domain lists and parsing durations.

use crate::error::DnsQueryError;
use crate::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

/// Parse newline-delimited domain list content.
///
/// Lines are trimmed. Empty lines and lines starting with `#` are skipped,
/// and a trailing `# comment` after a domain is dropped.
pub fn parse_domain_list(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return None;
            }
            let domain = trimmed.split('#').next().unwrap_or("").trim();
            if domain.is_empty() {
                None
            } else {
                Some(domain.to_string())
            }
        })
        .collect()
}

/// Read domains from a file, one per line.
///
/// # Errors
///
/// Returns `DnsQueryError::FileNotFound` if the path does not exist and
/// `DnsQueryError::File` if it cannot be read.
pub fn read_domains_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            DnsQueryError::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            DnsQueryError::file_error(path.display().to_string(), e.to_string())
        }
    })?;

    let domains = parse_domain_list(&content);
    tracing::debug!(path = %path.display(), count = domains.len(), "read domain list");
    Ok(domains)
}

/// Trim every domain and drop the blank ones, keeping order.
pub fn normalize_domains(domains: &[String]) -> Vec<String> {
    domains
        .iter()
        .map(|d| d.trim())
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a timeout like "500ms", "2s", "1.5", "1m".
///
/// A bare number is seconds. Negative, non-finite, unparseable and
/// out-of-range values return `None`.
pub fn parse_timeout_string(timeout_str: &str) -> Option<Duration> {
    let timeout_str = timeout_str.trim().to_lowercase();

    let (number, unit_ms) = if let Some(ms) = timeout_str.strip_suffix("ms") {
        (ms, 1.0)
    } else if let Some(s) = timeout_str.strip_suffix('s') {
        (s, 1_000.0)
    } else if let Some(m) = timeout_str.strip_suffix('m') {
        (m, 60_000.0)
    } else {
        (timeout_str.as_str(), 1_000.0)
    };

    let value = number.trim().parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(value * unit_ms / 1_000.0).ok()
}
