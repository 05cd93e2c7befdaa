use crate::error::Result;
use reqwest::Client;
use std::time::Duration;

/// Browser-like identification sent with every request. Some hosts refuse
/// robots.txt and sitemaps to unknown agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 10; Mobile) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/90.0.4430.91 Mobile Safari/537.36";

pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_MAX_SITEMAP_DEPTH: usize = 10;

/// Request policy shared by every scanner component.
///
/// Each component receives its own copy at construction time; there is no
/// process-wide header table.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub user_agent: String,
    /// Timeout for robots.txt, fallback probes and sitemap documents.
    pub discovery_timeout: Duration,
    /// Timeout for each HEAD request issued by the status checker.
    pub status_timeout: Duration,
    /// How many sitemap indexes may be nested below a top-level reference.
    pub max_sitemap_depth: usize,
    /// Delay slept between consecutive status checks.
    pub pause: Duration,
    /// Number of status checks allowed in flight. Results keep input order
    /// regardless.
    pub concurrency: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            discovery_timeout: DEFAULT_DISCOVERY_TIMEOUT,
            status_timeout: DEFAULT_STATUS_TIMEOUT,
            max_sitemap_depth: DEFAULT_MAX_SITEMAP_DEPTH,
            pause: Duration::ZERO,
            concurrency: 1,
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_discovery_timeout(mut self, timeout: Duration) -> Self {
        self.discovery_timeout = timeout;
        self
    }

    pub fn with_status_timeout(mut self, timeout: Duration) -> Self {
        self.status_timeout = timeout;
        self
    }

    pub fn with_max_sitemap_depth(mut self, depth: usize) -> Self {
        self.max_sitemap_depth = depth;
        self
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Client for robots.txt, fallback probes and sitemap documents.
    /// Redirects are followed, as a browser would.
    pub fn discovery_client(&self) -> Result<Client> {
        let client = Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(self.discovery_timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(client)
    }

    /// Client for the status checks. Redirects are never followed so a 3xx
    /// is reported as-is.
    pub fn status_client(&self) -> Result<Client> {
        let client = Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(self.status_timeout)
            .pool_max_idle_per_host(self.concurrency.max(1))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(client)
    }
}
