//! Core data types for DNS lookups.
//!
//! This module defines the per-domain result record, the query configuration
//! shared by every lookup in a batch, and the batch summary.

use crate::error::QueryError;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

/// Result of resolving one domain.
///
/// Created once per domain per run and never modified afterwards. When
/// `error` is set, `answers` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// The domain name that was queried (e.g., "example.com")
    pub domain: String,

    /// Requested record type, upper-case (e.g., "A", "MX")
    pub record_type: String,

    /// Record data in presentation format, in the order the resolver returned it
    pub answers: Vec<String>,

    /// Wall-clock time spent on this lookup, in milliseconds
    pub query_time_ms: f64,

    /// Why the lookup produced no answers, if it failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<QueryError>,
}

impl QueryResult {
    /// Build a successful result.
    pub fn answered(domain: &str, record_type: &str, answers: Vec<String>, elapsed: Duration) -> Self {
        Self {
            domain: domain.to_string(),
            record_type: record_type.to_string(),
            answers,
            query_time_ms: duration_to_ms(elapsed),
            error: None,
        }
    }

    /// Build a failed result; answers are always empty.
    pub fn failed(domain: &str, record_type: &str, error: QueryError, elapsed: Duration) -> Self {
        Self {
            domain: domain.to_string(),
            record_type: record_type.to_string(),
            answers: Vec::new(),
            query_time_ms: duration_to_ms(elapsed),
            error: Some(error),
        }
    }

    /// Whether the lookup completed without an error tag.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

fn duration_to_ms(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}

/// Configuration shared by every lookup in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Record type to request
    /// Default: "A"
    pub record_type: String,

    /// Nameserver to query instead of the system resolvers
    /// Default: None (system configuration)
    pub nameserver: Option<IpAddr>,

    /// Nameserver port
    /// Default: 53
    pub port: u16,

    /// Upper bound on a single lookup, including retries inside the resolver
    /// Default: 2 seconds
    #[serde(skip)]
    pub timeout: Duration,

    /// Maximum number of lookups in flight at once
    /// Default: 100, Minimum: 1
    pub concurrency: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            record_type: "A".to_string(),
            nameserver: None,
            port: 53,
            timeout: Duration::from_secs(2),
            concurrency: 100,
        }
    }
}

impl QueryConfig {
    /// Set the record type; stored upper-case.
    pub fn with_record_type<S: AsRef<str>>(mut self, record_type: S) -> Self {
        self.record_type = record_type.as_ref().trim().to_uppercase();
        self
    }

    /// Query a specific nameserver instead of the system ones.
    pub fn with_nameserver(mut self, nameserver: IpAddr) -> Self {
        self.nameserver = Some(nameserver);
        self
    }

    /// Set the nameserver port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the per-query timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the concurrency cap. Values below 1 are raised to 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

/// Aggregate counts for a finished batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl BatchSummary {
    /// Tally a result set.
    pub fn from_results(results: &[QueryResult], elapsed: Duration) -> Self {
        let successful = results.iter().filter(|r| r.is_success()).count();
        Self {
            total: results.len(),
            successful,
            failed: results.len() - successful,
            elapsed,
        }
    }

    /// Throughput over the whole batch; zero when no time elapsed.
    pub fn queries_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total as f64 / secs
        } else {
            0.0
        }
    }
}
