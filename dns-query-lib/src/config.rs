//! Configuration file parsing and management.
//!
//! This module handles loading defaults from TOML files and `DQ_*`
//! environment variables, and merging them with proper precedence rules.
//! Applying the result on top of built-in defaults is done with
//! [`FileConfig::apply_to`] and [`EnvConfig::apply_to`].

use crate::error::DnsQueryError;
use crate::Result;
use crate::types::QueryConfig;
use crate::utils::parse_timeout_string;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// Configuration loaded from TOML files.
///
/// ```toml
/// [defaults]
/// record_type = "AAAA"
/// nameserver = "1.1.1.1"
/// port = 53
/// concurrency = 50
/// timeout = "1500ms"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DefaultsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nameserver: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Timeout as a string, e.g. "2s", "500ms", "1.5"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Always print timings and the summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
}

impl FileConfig {
    /// Overlay the file's defaults onto a query configuration.
    ///
    /// Values are validated when the file is loaded, so anything that fails
    /// to parse here is skipped.
    pub fn apply_to(&self, mut config: QueryConfig) -> QueryConfig {
        let Some(defaults) = &self.defaults else {
            return config;
        };

        if let Some(record_type) = &defaults.record_type {
            config = config.with_record_type(record_type);
        }
        if let Some(ns) = defaults.nameserver.as_deref().and_then(|s| s.parse().ok()) {
            config = config.with_nameserver(ns);
        }
        if let Some(port) = defaults.port {
            config = config.with_port(port);
        }
        if let Some(concurrency) = defaults.concurrency {
            config = config.with_concurrency(concurrency);
        }
        if let Some(timeout) = defaults.timeout.as_deref().and_then(parse_timeout_string) {
            config = config.with_timeout(timeout);
        }

        config
    }

    /// Whether the file asks for verbose output.
    pub fn verbose(&self) -> bool {
        self.defaults
            .as_ref()
            .and_then(|d| d.verbose)
            .unwrap_or(false)
    }
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to log which files were picked up
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// `FileNotFound` when the path does not exist, `File` when it cannot be
    /// read, and `Config` when it is not valid TOML or fails validation.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DnsQueryError::FileNotFound {
                path: path.to_string_lossy().into_owned(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DnsQueryError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            DnsQueryError::config(format!("Failed to parse TOML configuration: {}", e))
        })?;

        self.validate_config(&config)?;

        if self.verbose {
            tracing::info!(path = %path.display(), "loaded config file");
        }

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config is lowest, then `~/.dns-query.toml`, then a file in the
    /// current directory. Missing files are skipped; a file that exists but
    /// is invalid is reported and skipped.
    pub fn discover_and_load(&self) -> FileConfig {
        let mut merged_config = FileConfig::default();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => merged_config = self.merge_configs(merged_config, config),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "ignoring config file"),
            }
        }

        merged_config
    }

    /// Get the local configuration file path.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./dns-query.toml", "./.dns-query.toml"];

        candidates
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    /// Get the global configuration file path in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        let candidates = [".dns-query.toml", "dns-query.toml"];

        candidates
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// Get the XDG configuration file path.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("dns-query").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations; values from `higher` win.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        let defaults = match (lower.defaults, higher.defaults) {
            (Some(lower), Some(higher)) => Some(DefaultsConfig {
                record_type: higher.record_type.or(lower.record_type),
                nameserver: higher.nameserver.or(lower.nameserver),
                port: higher.port.or(lower.port),
                concurrency: higher.concurrency.or(lower.concurrency),
                timeout: higher.timeout.or(lower.timeout),
                verbose: higher.verbose.or(lower.verbose),
            }),
            (lower, higher) => higher.or(lower),
        };

        FileConfig { defaults }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<()> {
        let Some(defaults) = &config.defaults else {
            return Ok(());
        };

        if defaults.concurrency == Some(0) {
            return Err(DnsQueryError::config("Concurrency must be at least 1"));
        }

        if let Some(timeout_str) = &defaults.timeout {
            match parse_timeout_string(timeout_str) {
                Some(timeout) if !timeout.is_zero() => {}
                _ => {
                    return Err(DnsQueryError::config(format!(
                        "Invalid timeout format '{}'. Use format like '2s', '500ms', '1.5'",
                        timeout_str
                    )));
                }
            }
        }

        if let Some(ns) = &defaults.nameserver {
            if ns.parse::<IpAddr>().is_err() {
                return Err(DnsQueryError::config(format!(
                    "Invalid nameserver '{}', expected an IP address",
                    ns
                )));
            }
        }

        if let Some(record_type) = &defaults.record_type {
            if record_type.trim().is_empty() {
                return Err(DnsQueryError::config("Record type cannot be empty"));
            }
        }

        Ok(())
    }
}

/// Environment variable configuration that mirrors CLI options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub record_type: Option<String>,
    pub nameserver: Option<IpAddr>,
    pub port: Option<u16>,
    pub concurrency: Option<usize>,
    pub timeout: Option<std::time::Duration>,
    pub file: Option<String>,
    pub config: Option<String>,
}

impl EnvConfig {
    /// Overlay environment values onto a query configuration.
    pub fn apply_to(&self, mut config: QueryConfig) -> QueryConfig {
        if let Some(record_type) = &self.record_type {
            config = config.with_record_type(record_type);
        }
        if let Some(ns) = self.nameserver {
            config = config.with_nameserver(ns);
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(concurrency) = self.concurrency {
            config = config.with_concurrency(concurrency);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        config
    }
}

/// Load configuration from the process environment.
///
/// Reads `DQ_TYPE`, `DQ_NAMESERVER`, `DQ_PORT`, `DQ_CONCURRENCY`,
/// `DQ_TIMEOUT`, `DQ_FILE` and `DQ_CONFIG`. Invalid values are logged as
/// warnings and ignored.
pub fn load_env_config() -> EnvConfig {
    load_env_config_from(|key| env::var(key).ok())
}

/// Same as [`load_env_config`] but reads variables through `lookup`.
pub fn load_env_config_from<F>(lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(val) = non_empty("DQ_TYPE") {
        env_config.record_type = Some(val.trim().to_uppercase());
    }

    if let Some(val) = non_empty("DQ_NAMESERVER") {
        match val.trim().parse::<IpAddr>() {
            Ok(ns) => env_config.nameserver = Some(ns),
            Err(_) => tracing::warn!("Invalid DQ_NAMESERVER='{}', expected an IP address", val),
        }
    }

    if let Some(val) = non_empty("DQ_PORT") {
        match val.trim().parse::<u16>() {
            Ok(port) => env_config.port = Some(port),
            Err(_) => tracing::warn!("Invalid DQ_PORT='{}', must be 0-65535", val),
        }
    }

    if let Some(val) = non_empty("DQ_CONCURRENCY") {
        match val.trim().parse::<usize>() {
            Ok(concurrency) if concurrency > 0 => env_config.concurrency = Some(concurrency),
            _ => tracing::warn!("Invalid DQ_CONCURRENCY='{}', must be at least 1", val),
        }
    }

    if let Some(val) = non_empty("DQ_TIMEOUT") {
        match parse_timeout_string(&val) {
            Some(timeout) if !timeout.is_zero() => env_config.timeout = Some(timeout),
            _ => tracing::warn!(
                "Invalid DQ_TIMEOUT='{}', use format like '2s', '500ms', '1.5'",
                val
            ),
        }
    }

    env_config.file = non_empty("DQ_FILE");
    env_config.config = non_empty("DQ_CONFIG");

    env_config
}
