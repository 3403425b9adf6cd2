//! # DNS Query Library
//!
//! Resolve DNS records for one or many domain names with a per-query timeout
//! and a cap on how many lookups are in flight at once.
//!
//! Every lookup produces a [`QueryResult`]. A failed lookup is not an `Err`:
//! its [`QueryError`] tag (NXDOMAIN, no answer, timeout or other) is stored in
//! the result, so one bad domain never aborts a batch.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dns_query_lib::{DnsQuerier, QueryConfig};
//! use std::time::Duration;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = QueryConfig::default()
//!         .with_record_type("A")
//!         .with_timeout(Duration::from_secs(2))
//!         .with_concurrency(50);
//!     let querier = DnsQuerier::with_config(config)?;
//!
//!     let domains = vec!["example.com".to_string(), "example.org".to_string()];
//!     for result in querier.query_many(&domains).await {
//!         match &result.error {
//!             None => println!("{}: {}", result.domain, result.answers.join(", ")),
//!             Some(error) => println!("{}: {}", result.domain, error),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub use config::{
    load_env_config, load_env_config_from, ConfigManager, DefaultsConfig, EnvConfig, FileConfig,
};
pub use error::{DnsQueryError, QueryError};
pub use querier::DnsQuerier;
pub use types::{BatchSummary, QueryConfig, QueryResult};
pub use utils::{
    normalize_domains, parse_domain_list, parse_timeout_string, read_domains_from_file,
};

mod config;
mod error;
mod querier;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DnsQueryError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
