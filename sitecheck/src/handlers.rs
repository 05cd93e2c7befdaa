use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use sitecheck_core::audit::{
    AuditOptions, AuditOutcome, AuditProgressCallback, execute_audit,
};
use sitecheck_core::report::{
    ReportFormat, default_output_path, export_report, generate_text_report,
};
use sitecheck_scanner::{Domain, ScanConfig};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DOMAIN_PROMPT: &str = "Enter the domain (e.g., example.com):";

/// Install the fmt subscriber. `RUST_LOG` wins when set.
pub fn init_logging(verbose: bool) {
    let default_directives = if verbose {
        "warn,sitecheck=debug,sitecheck_core=debug,sitecheck_scanner=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    // A subscriber may already be installed (tests); keep it
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Ask for a domain on `output` and read one line from `input`.
pub fn read_domain<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    write!(output, "{} ", DOMAIN_PROMPT.bright_cyan().bold())?;
    output.flush()?;

    let mut response = String::new();
    input
        .read_line(&mut response)
        .context("Failed to read the domain from stdin")?;

    let domain = response.trim();
    if domain.is_empty() {
        bail!("No domain entered");
    }
    Ok(domain.to_string())
}

fn prompt_for_domain() -> Result<String> {
    let stdin = io::stdin();
    read_domain(&mut stdin.lock(), &mut io::stdout())
}

pub fn scan_config_from_args(args: &ArgMatches) -> ScanConfig {
    let mut config = ScanConfig::default();

    if let Some(user_agent) = args.get_one::<String>("user-agent") {
        config = config.with_user_agent(user_agent.as_str());
    }
    if let Some(secs) = args.get_one::<u64>("timeout") {
        config = config.with_discovery_timeout(Duration::from_secs(*secs));
    }
    if let Some(secs) = args.get_one::<u64>("status-timeout") {
        config = config.with_status_timeout(Duration::from_secs(*secs));
    }
    if let Some(depth) = args.get_one::<usize>("max-depth") {
        config = config.with_max_sitemap_depth(*depth);
    }
    if let Some(ms) = args.get_one::<u64>("pause-ms") {
        config = config.with_pause(Duration::from_millis(*ms));
    }
    if let Some(concurrency) = args.get_one::<usize>("concurrency") {
        config = config.with_concurrency(*concurrency);
    }

    config
}

pub fn report_format_from_args(args: &ArgMatches) -> ReportFormat {
    args.get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Xlsx)
}

/// Tilde-expanded `--output`, or the default file name for `format`.
pub fn resolve_output_path(output: Option<&String>, format: ReportFormat) -> PathBuf {
    match output {
        Some(path) => PathBuf::from(shellexpand::tilde(path).as_ref()),
        None => default_output_path(format),
    }
}

pub async fn handle_audit(args: &ArgMatches) -> Result<()> {
    let quiet = args.get_flag("quiet");

    let raw_domain = match args.get_one::<String>("DOMAIN") {
        Some(domain) => domain.clone(),
        None => prompt_for_domain()?,
    };
    let domain = Domain::parse(&raw_domain)
        .with_context(|| format!("'{}' is not a usable domain", raw_domain))?;

    let config = scan_config_from_args(args);
    let format = report_format_from_args(args);
    let output = resolve_output_path(args.get_one::<String>("output"), format);
    debug!("Configuration: {:?}, writing {:?} to {}", config, format, output.display());

    if !quiet {
        println!(
            "{} Auditing {}",
            "→".blue(),
            domain.to_string().bright_white()
        );
    }

    let options = AuditOptions {
        domain,
        config,
        show_progress_bars: !quiet && !args.get_flag("no-progress"),
    };

    let progress_callback = if quiet {
        None
    } else {
        let print_line: AuditProgressCallback = Arc::new(|msg: String| {
            println!("{}", msg);
        });
        Some(print_line)
    };

    match execute_audit(options, progress_callback).await? {
        AuditOutcome::NoSitemaps {
            all_attempts_failed,
        } => {
            if all_attempts_failed {
                println!(
                    "{} Could not reach the site; every request failed.",
                    "⚠".yellow().bold()
                );
            }
            println!("No sitemaps found. Exiting.");
        }
        AuditOutcome::NoUrls {
            sitemaps,
            failed_references,
        } => {
            println!(
                "No URLs found in {} sitemap(s). Exiting.",
                sitemaps.len()
            );
            for failure in failed_references {
                println!("  {} {}: {}", "•".yellow(), failure.url, failure.reason);
            }
        }
        AuditOutcome::Completed(report) => {
            if !quiet {
                println!();
                print!("{}", generate_text_report(&report));
            }

            export_report(&report, format, &output)
                .with_context(|| format!("Failed to write {}", output.display()))?;

            println!(
                "{} Results saved to {}",
                "✓".green().bold(),
                output.display().to_string().bright_white()
            );
        }
    }

    Ok(())
}
