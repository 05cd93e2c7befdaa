use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use sitecheck_scanner::{
    Discovery, DiscoverySource, Domain, EventCallback, Expansion, Result, ScanConfig, ScanEvent,
    SitemapExpander, SitemapFailure, StatusChecker, StatusResult, discover_sitemaps,
};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

/// Options for configuring an audit run
pub struct AuditOptions {
    pub domain: Domain,
    pub config: ScanConfig,
    pub show_progress_bars: bool,
}

/// Callback for human-readable progress lines
pub type AuditProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Everything a finished audit produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub domain: String,
    pub discovery: Discovery,
    pub expansion: Expansion,
    pub results: Vec<StatusResult>,
}

impl AuditReport {
    pub fn summary(&self) -> StatusSummary {
        StatusSummary::from_results(&self.results)
    }
}

/// Result counts per status class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub informational: usize,
    pub success: usize,
    pub redirect: usize,
    pub client_error: usize,
    pub server_error: usize,
    pub other: usize,
    pub errors: usize,
}

impl StatusSummary {
    pub fn from_results(results: &[StatusResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            match result.status_code {
                Some(100..=199) => summary.informational += 1,
                Some(200..=299) => summary.success += 1,
                Some(300..=399) => summary.redirect += 1,
                Some(400..=499) => summary.client_error += 1,
                Some(500..=599) => summary.server_error += 1,
                Some(_) => summary.other += 1,
                None => summary.errors += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.informational
            + self.success
            + self.redirect
            + self.client_error
            + self.server_error
            + self.other
            + self.errors
    }
}

/// How an audit ended. Only `Completed` has rows worth exporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditOutcome {
    Completed(AuditReport),
    /// Neither robots.txt nor the conventional paths yielded a sitemap.
    NoSitemaps { all_attempts_failed: bool },
    /// Sitemaps were found but expanded to zero page URLs.
    NoUrls {
        sitemaps: Vec<String>,
        failed_references: Vec<SitemapFailure>,
    },
}

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// One console line per scanner event, or `None` for events the progress
/// bar already covers.
pub fn describe_event(event: &ScanEvent) -> Option<String> {
    let line = match event {
        ScanEvent::RobotsRequested { url } => format!("Checking robots.txt at {}", url),
        ScanEvent::RobotsParsed { sitemaps, .. } if sitemaps.is_empty() => {
            "No sitemaps declared in robots.txt".to_string()
        }
        ScanEvent::RobotsParsed { sitemaps, .. } => {
            format!("Found {} sitemap(s) in robots.txt", sitemaps.len())
        }
        ScanEvent::RobotsUnavailable { url, reason } => {
            format!("[!] Could not read {}: {}", url, reason)
        }
        ScanEvent::FallbackStarted { paths } => {
            format!("No sitemaps in robots.txt, trying {} common paths", paths)
        }
        ScanEvent::FallbackProbed { .. } => return None,
        ScanEvent::FallbackFound { url } => format!("Sitemap found at {}", url),
        ScanEvent::SitemapIndex { url, children } => {
            format!("Sitemap index {} lists {} sitemap(s)", url, children)
        }
        ScanEvent::SitemapUrlset { url, urls } => {
            format!("Extracted {} URL(s) from {}", urls, url)
        }
        ScanEvent::SitemapUnrecognised { url, root } => {
            format!("[!] Skipping {}: unrecognised root element <{}>", url, root)
        }
        ScanEvent::SitemapFailed { url, reason } => {
            format!("[!] Failed to process sitemap {}: {}", url, reason)
        }
        ScanEvent::UrlChecked { .. } => return None,
    };
    Some(line)
}

fn status_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    pb.set_style(style);
    pb
}

/// Discover, expand and check a domain's sitemaps.
///
/// Only invalid configuration (an HTTP client that cannot be built) is an
/// error. Network and parse failures along the way are absorbed and show up
/// as empty outcomes, sitemap failures or `Error` rows.
pub async fn execute_audit(
    options: AuditOptions,
    progress_callback: Option<AuditProgressCallback>,
) -> Result<AuditOutcome> {
    let AuditOptions {
        domain,
        config,
        show_progress_bars,
    } = options;

    let discovery_events: EventCallback = {
        let progress_callback = progress_callback.clone();
        Arc::new(move |event: ScanEvent| {
            if let (Some(callback), Some(line)) = (&progress_callback, describe_event(&event)) {
                callback(line);
            }
        })
    };

    info!("Auditing {}", domain);
    let discovery = discover_sitemaps(&domain, &config, Some(discovery_events.clone())).await?;

    if let DiscoverySource::Nothing {
        all_attempts_failed,
    } = discovery.source
    {
        warn!("No sitemaps found for {}", domain);
        return Ok(AuditOutcome::NoSitemaps {
            all_attempts_failed,
        });
    }

    let expansion = SitemapExpander::new(&config)?
        .with_event_callback(discovery_events)
        .expand_all(&discovery.sitemaps)
        .await;

    if expansion.urls.is_empty() {
        warn!("No URLs found in the sitemaps of {}", domain);
        return Ok(AuditOutcome::NoUrls {
            sitemaps: discovery.sitemaps,
            failed_references: expansion.failures,
        });
    }

    let total = expansion.urls.len();
    if let Some(ref callback) = progress_callback {
        callback(format!("Total URLs extracted: {}", total));
    }

    let progress_bar = show_progress_bars.then(|| status_bar(total));

    let check_events: EventCallback = {
        let progress_bar = progress_bar.clone();
        let progress_callback = progress_callback.clone();
        Arc::new(move |event: ScanEvent| {
            let ScanEvent::UrlChecked {
                index, total, url, ..
            } = event
            else {
                return;
            };
            match (&progress_bar, &progress_callback) {
                (Some(pb), _) => {
                    pb.set_message(extract_url_path(&url));
                    pb.inc(1);
                }
                (None, Some(callback)) => {
                    callback(format!("Checking URL {}/{}: {}", index, total, url));
                }
                (None, None) => {}
            }
        })
    };

    let results = StatusChecker::new(&config)?
        .with_event_callback(check_events)
        .check_all(&expansion.urls)
        .await;

    if let Some(pb) = progress_bar {
        pb.finish_with_message(format!("Checked {} URLs", results.len()));
    }

    Ok(AuditOutcome::Completed(AuditReport {
        domain: domain.to_string(),
        discovery,
        expansion,
        results,
    }))
}
