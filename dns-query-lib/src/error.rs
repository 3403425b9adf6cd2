//! Error handling for DNS query operations.
//!
//! Two kinds of failure live here. [`QueryError`] describes why a single lookup
//! did not produce answers; it is carried inside a
//! [`QueryResult`](crate::QueryResult) and never aborts a batch.
//! [`DnsQueryError`] covers the few conditions that stop a run entirely:
//! resolver setup, unreadable input files and invalid configuration.

use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::error::ProtoErrorKind;
use hickory_resolver::proto::op::ResponseCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome tag for a lookup that returned no answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum QueryError {
    /// The name does not exist (NXDOMAIN)
    #[error("NXDOMAIN")]
    DomainNotFound,

    /// The name exists but has no records of the requested type
    #[error("No answer")]
    NoAnswer,

    /// The lookup did not complete within the configured timeout
    #[error("Timeout")]
    Timeout,

    /// Anything else, with the resolver's message
    #[error("{0}")]
    Other(String),
}

impl QueryError {
    /// Create an uncategorised error from any message.
    pub fn other<M: Into<String>>(message: M) -> Self {
        Self::Other(message.into())
    }
}

impl From<&ResolveError> for QueryError {
    fn from(err: &ResolveError) -> Self {
        match err.kind() {
            ResolveErrorKind::NoRecordsFound { response_code, .. } => {
                if *response_code == ResponseCode::NXDomain {
                    Self::DomainNotFound
                } else {
                    Self::NoAnswer
                }
            }
            ResolveErrorKind::Timeout => Self::Timeout,
            ResolveErrorKind::Proto(proto) if matches!(proto.kind(), ProtoErrorKind::Timeout) => {
                Self::Timeout
            }
            _ => Self::Other(err.to_string()),
        }
    }
}

/// Fatal error type for library operations.
#[derive(Debug, Error)]
pub enum DnsQueryError {
    /// The resolver could not be constructed (e.g. unreadable system config)
    #[error("Failed to initialise DNS resolver: {message}")]
    Resolver { message: String },

    /// An input file does not exist
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// An input file exists but could not be read
    #[error("File error at '{path}': {message}")]
    File { path: String, message: String },

    /// Invalid configuration values or unparseable config file
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid caller input (bad nameserver, zero concurrency, ...)
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl DnsQueryError {
    /// Create a new resolver setup error.
    pub fn resolver<M: Into<String>>(message: M) -> Self {
        Self::Resolver {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::File {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new invalid input error.
    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
