//! Main DNS querier implementation.
//!
//! This module provides the `DnsQuerier` struct, which owns one resolver built
//! from a [`QueryConfig`] and runs single lookups or bounded batches of them.

use crate::error::{DnsQueryError, QueryError};
use crate::Result;
use crate::types::{QueryConfig, QueryResult};
use crate::utils::normalize_domains;
use futures::stream::{self, Stream, StreamExt};
use hickory_resolver::config::{NameServerConfig, NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::proto::rr::rdata::TXT;
use hickory_resolver::proto::rr::{RData, RecordType};
use hickory_resolver::system_conf::read_system_conf;
use hickory_resolver::TokioAsyncResolver;
use std::pin::Pin;
use std::str::FromStr;
use std::time::Instant;

/// Resolves DNS records for one or many domains.
///
/// Every lookup returns a [`QueryResult`]; failures are recorded in the
/// result's `error` field instead of being returned as `Err`.
///
/// # Example
///
/// ```rust,no_run
/// use dns_query_lib::{DnsQuerier, QueryConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let querier = DnsQuerier::with_config(QueryConfig::default().with_record_type("MX"))?;
///     let result = querier.query("example.com").await;
///     println!("{}: {:?}", result.domain, result.answers);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct DnsQuerier {
    config: QueryConfig,
    resolver: TokioAsyncResolver,
}

impl DnsQuerier {
    /// Create a querier with the default configuration (system resolver, A records).
    pub fn new() -> Result<Self> {
        Self::with_config(QueryConfig::default())
    }

    /// Create a querier with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `DnsQueryError::InvalidInput` for a zero concurrency or timeout,
    /// and `DnsQueryError::Resolver` when no nameserver was given and the
    /// system configuration cannot be read.
    pub fn with_config(config: QueryConfig) -> Result<Self> {
        if config.concurrency == 0 {
            return Err(DnsQueryError::invalid_input("Concurrency must be at least 1"));
        }
        if config.timeout.is_zero() {
            return Err(DnsQueryError::invalid_input(
                "Timeout must be greater than zero",
            ));
        }

        let resolver = build_resolver(&config)?;
        Ok(Self { config, resolver })
    }

    /// Get the configuration this querier was built with.
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Resolve the configured record type for one domain.
    pub async fn query(&self, domain: &str) -> QueryResult {
        self.query_type(domain, &self.config.record_type).await
    }

    /// Resolve an explicit record type for one domain.
    ///
    /// The lookup is bounded by the configured timeout as a whole, not per
    /// attempt. Only records of the requested type are kept as answers, so a
    /// CNAME chain leading to A records yields just the addresses.
    pub async fn query_type(&self, domain: &str, record_type: &str) -> QueryResult {
        let record_type = record_type.trim().to_uppercase();
        let start = Instant::now();

        let rtype = match RecordType::from_str(&record_type) {
            Ok(rtype) => rtype,
            Err(e) => {
                return QueryResult::failed(
                    domain,
                    &record_type,
                    QueryError::other(format!("Unknown record type '{}': {}", record_type, e)),
                    start.elapsed(),
                );
            }
        };

        let outcome =
            tokio::time::timeout(self.config.timeout, self.resolver.lookup(domain, rtype)).await;
        let elapsed = start.elapsed();

        let result = match outcome {
            Ok(Ok(lookup)) => {
                let answers: Vec<String> = lookup
                    .iter()
                    .filter(|rdata| rdata.record_type() == rtype)
                    .map(presentation)
                    .collect();
                if answers.is_empty() {
                    QueryResult::failed(domain, &record_type, QueryError::NoAnswer, elapsed)
                } else {
                    QueryResult::answered(domain, &record_type, answers, elapsed)
                }
            }
            Ok(Err(e)) => QueryResult::failed(domain, &record_type, QueryError::from(&e), elapsed),
            Err(_) => QueryResult::failed(domain, &record_type, QueryError::Timeout, elapsed),
        };

        match &result.error {
            None => tracing::debug!(
                domain,
                record_type = %record_type,
                answers = result.answers.len(),
                elapsed_ms = result.query_time_ms,
                "query answered"
            ),
            Some(error) => tracing::debug!(
                domain,
                record_type = %record_type,
                %error,
                elapsed_ms = result.query_time_ms,
                "query failed"
            ),
        }

        result
    }

    /// Resolve many domains with at most `concurrency` lookups in flight.
    ///
    /// Domains are trimmed and blank entries skipped. The returned vector is
    /// index-aligned with the remaining domains regardless of completion order.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use dns_query_lib::DnsQuerier;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let querier = DnsQuerier::new()?;
    ///     let domains = vec!["example.com".to_string(), "example.org".to_string()];
    ///     for result in querier.query_many(&domains).await {
    ///         println!("{}: {:?}", result.domain, result.answers);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn query_many(&self, domains: &[String]) -> Vec<QueryResult> {
        let domains = normalize_domains(domains);
        tracing::debug!(
            count = domains.len(),
            concurrency = self.config.concurrency,
            "starting batch"
        );

        stream::iter(domains.iter().map(|domain| self.query(domain)))
            .buffered(self.config.concurrency)
            .collect()
            .await
    }

    /// Resolve many domains, yielding results as they complete.
    ///
    /// Uses the same concurrency bound as [`query_many`](Self::query_many)
    /// but makes no ordering guarantee.
    pub fn query_stream(
        &self,
        domains: &[String],
    ) -> Pin<Box<dyn Stream<Item = QueryResult> + Send + '_>> {
        let domains = normalize_domains(domains);
        let stream = stream::iter(domains)
            .map(move |domain| async move { self.query(&domain).await })
            .buffer_unordered(self.config.concurrency);

        Box::pin(stream)
    }
}

/// Record data in zone-file presentation format.
fn presentation(rdata: &RData) -> String {
    match rdata {
        RData::TXT(txt) => quoted_txt(txt),
        other => other.to_string(),
    }
}

/// Each character-string quoted and space separated: `"v=spf1" "-all"`.
fn quoted_txt(txt: &TXT) -> String {
    txt.txt_data()
        .iter()
        .map(|chunk| {
            let mut quoted = String::with_capacity(chunk.len() + 2);
            quoted.push('"');
            for &byte in chunk.iter() {
                match byte {
                    b'"' | b'\\' => {
                        quoted.push('\\');
                        quoted.push(byte as char);
                    }
                    0x20..=0x7e => quoted.push(byte as char),
                    _ => quoted.push_str(&format!("\\{:03}", byte)),
                }
            }
            quoted.push('"');
            quoted
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the resolver for a configuration.
///
/// An explicit nameserver replaces the system list entirely. Otherwise the
/// system nameservers are used, moved to the configured port when it is not 53.
fn build_resolver(config: &QueryConfig) -> Result<TokioAsyncResolver> {
    let (resolver_config, mut opts) = match config.nameserver {
        Some(ip) => {
            let group = NameServerConfigGroup::from_ips_clear(&[ip], config.port, true);
            (
                ResolverConfig::from_parts(None, vec![], group),
                ResolverOpts::default(),
            )
        }
        None => {
            let (system_config, system_opts) = read_system_conf().map_err(|e| {
                DnsQueryError::resolver(format!("cannot read system DNS configuration: {}", e))
            })?;
            (with_port(system_config, config.port), system_opts)
        }
    };

    opts.timeout = config.timeout;
    opts.attempts = 1;

    tracing::debug!(
        nameservers = resolver_config.name_servers().len(),
        timeout_ms = config.timeout.as_millis() as u64,
        "resolver configured"
    );

    Ok(TokioAsyncResolver::tokio(resolver_config, opts))
}

fn with_port(config: ResolverConfig, port: u16) -> ResolverConfig {
    if port == 53 {
        return config;
    }

    let name_servers: Vec<NameServerConfig> = config
        .name_servers()
        .iter()
        .cloned()
        .map(|mut ns| {
            ns.socket_addr.set_port(port);
            ns
        })
        .collect();

    ResolverConfig::from_parts(
        config.domain().cloned(),
        config.search().to_vec(),
        NameServerConfigGroup::from(name_servers),
    )
}
