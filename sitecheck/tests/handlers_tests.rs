use sitecheck::commands::command_argument_builder;
use sitecheck::handlers::*;
use sitecheck_core::report::ReportFormat;
use sitecheck_scanner::config::{DEFAULT_MAX_SITEMAP_DEPTH, DEFAULT_USER_AGENT};
use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;

fn matches_for(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["sitecheck"];
    argv.extend_from_slice(args);
    command_argument_builder()
        .try_get_matches_from(argv)
        .expect("arguments should parse")
}

#[test]
fn test_read_domain_trims_input() {
    colored::control::set_override(false);
    let mut input = Cursor::new("  example.com  \n");
    let mut output = Vec::new();

    let domain = read_domain(&mut input, &mut output).unwrap();

    assert_eq!(domain, "example.com");
    assert_eq!(
        String::from_utf8(output).unwrap(),
        "Enter the domain (e.g., example.com): "
    );
}

#[test]
fn test_read_domain_rejects_empty_line() {
    let mut input = Cursor::new("\n");
    let mut output = Vec::new();
    assert!(read_domain(&mut input, &mut output).is_err());
}

#[test]
fn test_read_domain_rejects_closed_stdin() {
    let mut input = Cursor::new("");
    let mut output = Vec::new();
    assert!(read_domain(&mut input, &mut output).is_err());
}

#[test]
fn test_default_arguments() {
    let matches = matches_for(&["example.com"]);
    let config = scan_config_from_args(&matches);

    assert_eq!(
        matches.get_one::<String>("DOMAIN").map(String::as_str),
        Some("example.com")
    );
    assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(config.discovery_timeout, Duration::from_secs(10));
    assert_eq!(config.status_timeout, Duration::from_secs(2));
    assert_eq!(config.max_sitemap_depth, DEFAULT_MAX_SITEMAP_DEPTH);
    assert_eq!(config.pause, Duration::ZERO);
    assert_eq!(config.concurrency, 1);
    assert_eq!(report_format_from_args(&matches), ReportFormat::Xlsx);
}

#[test]
fn test_domain_is_optional() {
    let matches = matches_for(&[]);
    assert!(matches.get_one::<String>("DOMAIN").is_none());
}

#[test]
fn test_flags_feed_scan_config() {
    let matches = matches_for(&[
        "example.com",
        "--user-agent",
        "sitecheck-test/1.0",
        "--timeout",
        "5",
        "--status-timeout",
        "3",
        "--max-depth",
        "2",
        "--pause-ms",
        "250",
        "--concurrency",
        "4",
        "--format",
        "csv",
    ]);
    let config = scan_config_from_args(&matches);

    assert_eq!(config.user_agent, "sitecheck-test/1.0");
    assert_eq!(config.discovery_timeout, Duration::from_secs(5));
    assert_eq!(config.status_timeout, Duration::from_secs(3));
    assert_eq!(config.max_sitemap_depth, 2);
    assert_eq!(config.pause, Duration::from_millis(250));
    assert_eq!(config.concurrency, 4);
    assert_eq!(report_format_from_args(&matches), ReportFormat::Csv);
}

#[test]
fn test_unknown_format_rejected() {
    let result = command_argument_builder().try_get_matches_from([
        "sitecheck",
        "example.com",
        "--format",
        "html",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_zero_timeout_rejected() {
    let result = command_argument_builder().try_get_matches_from([
        "sitecheck",
        "example.com",
        "--status-timeout",
        "0",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_resolve_output_path_default() {
    assert_eq!(
        resolve_output_path(None, ReportFormat::Xlsx),
        PathBuf::from("url_status_codes.xlsx")
    );
    assert_eq!(
        resolve_output_path(None, ReportFormat::Json),
        PathBuf::from("url_status_codes.json")
    );
}

#[test]
fn test_resolve_output_path_explicit() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("audit.xlsx");
    let given = target.display().to_string();

    assert_eq!(resolve_output_path(Some(&given), ReportFormat::Xlsx), target);
}

#[test]
fn test_resolve_output_path_expands_tilde() {
    let resolved = resolve_output_path(Some(&"~/audit.csv".to_string()), ReportFormat::Csv);
    assert!(!resolved.starts_with("~"));
    assert!(resolved.ends_with("audit.csv"));
}
