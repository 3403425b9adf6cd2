// dns-query/tests/cli_integration.rs

mod common;

use assert_cmd::Command;
use common::MockDns;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// A `dns-query` command isolated from the user's environment and config files.
fn dns_query(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dns-query").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("RUST_LOG");
    for var in [
        "DQ_TYPE",
        "DQ_NAMESERVER",
        "DQ_PORT",
        "DQ_CONCURRENCY",
        "DQ_TIMEOUT",
        "DQ_FILE",
        "DQ_CONFIG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Helper to create a test domains file inside `dir`
fn create_test_domains_file(dir: &TempDir, content: &str) -> String {
    let path = dir.path().join("domains.txt");
    fs::write(&path, content).expect("Failed to write domains file");
    path.to_string_lossy().into_owned()
}

#[test]
fn test_help_lists_flags() {
    let home = TempDir::new().unwrap();
    dns_query(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--type"))
        .stdout(predicate::str::contains("--nameserver"))
        .stdout(predicate::str::contains("--concurrency"))
        .stdout(predicate::str::contains("--timeout"))
        .stdout(predicate::str::contains("--output"));
}

#[test]
fn test_no_domains_prints_usage_and_fails() {
    let home = TempDir::new().unwrap();
    dns_query(&home)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_missing_file_fails() {
    let home = TempDir::new().unwrap();
    dns_query(&home)
        .args(["-f", "does-not-exist.txt"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Error: File not found: does-not-exist.txt",
        ));
}

#[test]
fn test_invalid_nameserver_rejected() {
    let home = TempDir::new().unwrap();
    dns_query(&home)
        .args(["example.com", "-n", "not-an-ip"])
        .assert()
        .failure();
}

#[test]
fn test_zero_concurrency_rejected() {
    let home = TempDir::new().unwrap();
    dns_query(&home)
        .args(["example.com", "-c", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Concurrency must be at least 1"));
}

#[test]
fn test_huge_timeout_rejected() {
    let home = TempDir::new().unwrap();
    dns_query(&home)
        .args(["example.com", "--timeout", "1e30", "-n", "127.0.0.1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: Timeout of"));
}

#[test]
fn test_huge_env_timeout_ignored() {
    let dns = MockDns::start();
    let home = TempDir::new().unwrap();
    dns_query(&home)
        .env("DQ_TIMEOUT", "1e300")
        .args(["host.test", "--timeout", "1", "-n", "127.0.0.1", "-p", &dns.port()])
        .assert()
        .success()
        .stdout(predicate::eq("host.test: 192.0.2.10, 192.0.2.11\n"));
}

#[test]
fn test_single_domain_has_no_summary() {
    let dns = MockDns::start();
    let home = TempDir::new().unwrap();
    dns_query(&home)
        .args(["host.test", "-n", "127.0.0.1", "-p", &dns.port()])
        .assert()
        .success()
        .stdout(predicate::eq("host.test: 192.0.2.10, 192.0.2.11\n"));
}

#[test]
fn test_file_input_with_comments() {
    let dns = MockDns::start();
    let home = TempDir::new().unwrap();
    let file = create_test_domains_file(
        &home,
        "# test domains\nhost.test\n\nmissing.test  # not there\n   \nother.test\n",
    );

    dns_query(&home)
        .args(["-f", &file, "-n", "127.0.0.1", "-p", &dns.port()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "host.test: 192.0.2.10, 192.0.2.11\nmissing.test: NXDOMAIN\nother.test: 192.0.2.20\n",
        ))
        .stdout(predicate::str::contains("--- 3 queries in"))
        .stdout(predicate::str::contains("Success: 2, Failed: 1"));
}

#[test]
fn test_args_come_before_file_domains() {
    let dns = MockDns::start();
    let home = TempDir::new().unwrap();
    let file = create_test_domains_file(&home, "host.test\n");

    dns_query(&home)
        .args(["other.test", "-f", &file, "-n", "127.0.0.1", "-p", &dns.port()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "other.test: 192.0.2.20\nhost.test: 192.0.2.10, 192.0.2.11\n",
        ));
}

#[test]
fn test_verbose_shows_type_timing_and_summary() {
    let dns = MockDns::start();
    let home = TempDir::new().unwrap();

    dns_query(&home)
        .args(["other.test", "-v", "-n", "127.0.0.1", "-p", &dns.port()])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"other\.test \[A\] -> 192\.0\.2\.20 \(\d+\.\d{2}ms\)").unwrap())
        .stdout(predicate::str::contains("--- 1 queries in"))
        .stdout(predicate::str::contains("Success: 1, Failed: 0"));
}

#[test]
fn test_output_writes_tsv() {
    let dns = MockDns::start();
    let home = TempDir::new().unwrap();
    let out = home.path().join("results.tsv");
    let out_str = out.to_string_lossy().into_owned();

    dns_query(&home)
        .args([
            "host.test",
            "missing.test",
            "-o",
            &out_str,
            "-n",
            "127.0.0.1",
            "-p",
            &dns.port(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Results written to {}",
            out_str
        )))
        .stdout(predicate::str::contains("Success: 1, Failed: 1"))
        .stdout(predicate::str::contains("host.test: ").not());

    let written = fs::read_to_string(&out).unwrap();
    assert_eq!(
        written,
        "host.test\t192.0.2.10,192.0.2.11\nmissing.test\tNXDOMAIN\n"
    );
}

#[test]
fn test_json_output() {
    let dns = MockDns::start();
    let home = TempDir::new().unwrap();

    let output = dns_query(&home)
        .args([
            "host.test",
            "missing.test",
            "--json",
            "-n",
            "127.0.0.1",
            "-p",
            &dns.port(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["domain"], "host.test");
    assert_eq!(json[0]["record_type"], "A");
    assert_eq!(json[0]["answers"][1], "192.0.2.11");
    assert_eq!(json[1]["error"], "domain_not_found");
}

#[test]
fn test_env_supplies_nameserver_and_port() {
    let dns = MockDns::start();
    let home = TempDir::new().unwrap();

    dns_query(&home)
        .env("DQ_NAMESERVER", "127.0.0.1")
        .env("DQ_PORT", dns.port())
        .arg("other.test")
        .assert()
        .success()
        .stdout(predicate::eq("other.test: 192.0.2.20\n"));
}

#[test]
fn test_config_file_supplies_defaults() {
    let dns = MockDns::start();
    let home = TempDir::new().unwrap();
    let config = home.path().join("custom.toml");
    fs::write(
        &config,
        format!(
            "[defaults]\nnameserver = \"127.0.0.1\"\nport = {}\ntimeout = \"1s\"\n",
            dns.port()
        ),
    )
    .unwrap();

    dns_query(&home)
        .args(["host.test", "--config", &config.to_string_lossy()])
        .assert()
        .success()
        .stdout(predicate::eq("host.test: 192.0.2.10, 192.0.2.11\n"));
}

#[test]
fn test_missing_config_file_fails() {
    let home = TempDir::new().unwrap();
    dns_query(&home)
        .args(["host.test", "--config", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config file"));
}
