//! DNS Query CLI Application
//!
//! A command-line interface for bulk DNS lookups built on dns-query-lib.
//! Domains come from arguments and/or a file; results are printed, written
//! as TSV, or emitted as JSON.

mod ui;

use anyhow::Context;
use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{CommandFactory, Parser};
use dns_query_lib::{
    load_env_config, normalize_domains, read_domains_from_file, BatchSummary, ConfigManager,
    DnsQuerier, EnvConfig, FileConfig, QueryConfig, QueryResult,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::net::IpAddr;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

const EXAMPLES: &str = "Examples:
  dns-query example.com                      # Query A record
  dns-query example.com -t MX                # Query MX records
  dns-query -f domains.txt                   # Bulk query from file
  dns-query -f domains.txt -c 200            # 200 concurrent queries
  dns-query example.com -n 8.8.8.8           # Use specific nameserver
  dns-query example.com -n 8.8.8.8 -p 5353   # Use custom port";

/// CLI arguments for dns-query
///
/// Options left unset fall back to `DQ_*` environment variables, then the
/// config file, then built-in defaults.
#[derive(Parser, Debug)]
#[command(name = "dns-query")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fast DNS query tool")]
#[command(after_help = EXAMPLES)]
#[command(styles = STYLES)]
pub struct Args {
    /// Domain(s) to query
    #[arg(value_name = "DOMAINS")]
    pub domains: Vec<String>,

    /// Record type (A, AAAA, MX, TXT, NS, CNAME, etc.) [default: A]
    #[arg(short = 't', long = "type", value_name = "TYPE", help_heading = "Query")]
    pub record_type: Option<String>,

    /// DNS server to query (e.g., 8.8.8.8) [default: system resolver]
    #[arg(short = 'n', long = "nameserver", value_name = "IP", help_heading = "Query")]
    pub nameserver: Option<IpAddr>,

    /// DNS server port [default: 53]
    #[arg(short = 'p', long = "port", value_name = "PORT", help_heading = "Query")]
    pub port: Option<u16>,

    /// Query timeout in seconds [default: 2.0]
    #[arg(long = "timeout", value_name = "SECONDS", help_heading = "Query")]
    pub timeout: Option<f64>,

    /// File containing domains (one per line, '#' comments allowed)
    #[arg(short = 'f', long = "file", value_name = "FILE", help_heading = "Input")]
    pub file: Option<String>,

    /// Max concurrent queries [default: 100]
    #[arg(short = 'c', long = "concurrency", value_name = "N", help_heading = "Performance")]
    pub concurrency: Option<usize>,

    /// Show query times and always print the summary
    #[arg(short = 'v', long = "verbose", help_heading = "Output")]
    pub verbose: bool,

    /// Write tab-separated results to FILE instead of the console
    #[arg(short = 'o', long = "output", value_name = "FILE", help_heading = "Output")]
    pub output: Option<String>,

    /// Print results as JSON (ignored with --output)
    #[arg(short = 'j', long = "json", help_heading = "Output")]
    pub json: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Show debug logging on stderr
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(args.debug);

    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--debug`.
fn init_logging(debug: bool) {
    let default_directives = if debug {
        "dns_query=debug,dns_query_lib=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if args.concurrency == Some(0) {
        return Err("Concurrency must be at least 1".to_string());
    }

    if let Some(timeout) = args.timeout {
        if !timeout.is_finite() || timeout <= 0.0 {
            return Err("Timeout must be a positive number of seconds".to_string());
        }
        if Duration::try_from_secs_f64(timeout).is_err() {
            return Err(format!("Timeout of {} seconds is too large", timeout));
        }
    }

    if let Some(record_type) = &args.record_type {
        if record_type.trim().is_empty() {
            return Err("Record type cannot be empty".to_string());
        }
    }

    Ok(())
}

/// Main query flow
async fn run(args: Args) -> anyhow::Result<ExitCode> {
    let env_config = load_env_config();
    let file_config = load_file_config(&args, &env_config)?;

    let config = build_config(&args, &env_config, &file_config);
    let verbose = args.verbose || file_config.verbose();

    let domains = get_domains_to_query(&args, &env_config)?;
    if domains.is_empty() {
        Args::command().print_help()?;
        println!();
        return Ok(ExitCode::FAILURE);
    }

    tracing::debug!(
        domains = domains.len(),
        record_type = %config.record_type,
        concurrency = config.concurrency,
        "starting run"
    );

    let querier = DnsQuerier::with_config(config)?;

    let spinner = if args.output.is_none() && !args.json && domains.len() > 1 {
        ui::Spinner::start(format!("Querying {} domains...", domains.len()))
    } else {
        None
    };

    let start = Instant::now();
    let results = querier.query_many(&domains).await;
    let summary = BatchSummary::from_results(&results, start.elapsed());

    if let Some(s) = spinner {
        s.stop().await;
    }

    if let Some(path) = &args.output {
        write_tsv(path, &results)?;
        println!("Results written to {}", path);
    } else if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        ui::print_results(&results, verbose);
    }

    // The summary always goes to the console, even with --output
    let json_output = args.json && args.output.is_none();
    if !json_output && (verbose || summary.total > 1) {
        ui::print_summary(&summary);
    }

    Ok(ExitCode::SUCCESS)
}

/// Pick the config file: `--config`, then `DQ_CONFIG`, then discovery.
///
/// An explicitly named file must load; discovered files are best-effort.
fn load_file_config(args: &Args, env_config: &EnvConfig) -> anyhow::Result<FileConfig> {
    let config_manager = ConfigManager::new(args.debug);

    let explicit = args.config.as_ref().or(env_config.config.as_ref());
    match explicit {
        Some(path) => config_manager
            .load_file(path)
            .with_context(|| format!("Failed to load config file '{}'", path)),
        None => Ok(config_manager.discover_and_load()),
    }
}

/// Build the query configuration.
///
/// Precedence order (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables (DQ_*)
/// 3. Config file
/// 4. Built-in defaults
fn build_config(args: &Args, env_config: &EnvConfig, file_config: &FileConfig) -> QueryConfig {
    let config = file_config.apply_to(QueryConfig::default());
    let config = env_config.apply_to(config);
    apply_cli_args_to_config(config, args)
}

/// Apply CLI arguments to config (highest precedence).
///
/// Only options the user actually passed override lower layers.
fn apply_cli_args_to_config(mut config: QueryConfig, args: &Args) -> QueryConfig {
    if let Some(record_type) = &args.record_type {
        config = config.with_record_type(record_type);
    }
    if let Some(ns) = args.nameserver {
        config = config.with_nameserver(ns);
    }
    if let Some(port) = args.port {
        config = config.with_port(port);
    }
    if let Some(concurrency) = args.concurrency {
        config = config.with_concurrency(concurrency);
    }
    // Out-of-range values are rejected by validate_args
    if let Some(timeout) = args.timeout.and_then(|t| Duration::try_from_secs_f64(t).ok()) {
        config = config.with_timeout(timeout);
    }
    config
}

/// Collect domains from the arguments, then the file (`--file` or `DQ_FILE`).
fn get_domains_to_query(args: &Args, env_config: &EnvConfig) -> anyhow::Result<Vec<String>> {
    let mut domains = args.domains.clone();

    if let Some(path) = args.file.as_ref().or(env_config.file.as_ref()) {
        tracing::debug!(path = %path, "reading domains from file");
        domains.extend(read_domains_from_file(path)?);
    }

    Ok(normalize_domains(&domains))
}

/// Write `domain<TAB>answers` lines to `path`.
fn write_tsv(path: &str, results: &[QueryResult]) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file '{}'", path))?;
    let mut writer = BufWriter::new(file);

    for result in results {
        writeln!(writer, "{}", ui::format_tsv_line(result))?;
    }
    writer.flush()?;

    Ok(())
}
