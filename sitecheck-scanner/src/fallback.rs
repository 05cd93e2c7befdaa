use crate::config::ScanConfig;
use crate::domain::Domain;
use crate::error::Result;
use crate::events::{EventCallback, ScanEvent, emit};
use reqwest::{Client, StatusCode};
use tracing::{debug, info};

/// Conventional sitemap locations, probed in this order.
pub const COMMON_SITEMAP_PATHS: [&str; 11] = [
    "/sitemap.xml",
    "/sitemap-index.xml",
    "/sitemap_index.xml",
    "/sitemapindex.xml",
    "/sitemap/sitemap.xml",
    "/sitemaps/sitemap.xml",
    "/sitemap/sitemap-index.xml",
    "/sitemaps/sitemap-index.xml",
    "/sitemap/sitemap_index.xml",
    "/sitemaps/sitemap_index.xml",
    "/sitemap/sitemapindex.xml",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Found(String),
    /// At least one probe got an answer, none of them a 200.
    NotFound,
    /// Every probe failed at the transport level.
    AllFailed,
}

impl ProbeOutcome {
    pub fn into_sitemaps(self) -> Vec<String> {
        match self {
            ProbeOutcome::Found(url) => vec![url],
            ProbeOutcome::NotFound | ProbeOutcome::AllFailed => Vec::new(),
        }
    }
}

/// Guesses a sitemap location when robots.txt did not declare one.
pub struct FallbackProber {
    client: Client,
    event_callback: Option<EventCallback>,
}

impl FallbackProber {
    pub fn new(config: &ScanConfig) -> Result<Self> {
        Ok(Self::with_client(config.discovery_client()?))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            event_callback: None,
        }
    }

    pub fn with_event_callback(mut self, callback: EventCallback) -> Self {
        self.event_callback = Some(callback);
        self
    }

    /// Zero or one sitemap URL: the first conventional path answering 200.
    pub async fn find(&self, domain: &Domain) -> Vec<String> {
        self.probe(domain).await.into_sitemaps()
    }

    pub async fn probe(&self, domain: &Domain) -> ProbeOutcome {
        info!("No sitemaps found in robots.txt, trying common paths");
        emit(
            &self.event_callback,
            ScanEvent::FallbackStarted {
                paths: COMMON_SITEMAP_PATHS.len(),
            },
        );

        let mut answered = false;

        for candidate in COMMON_SITEMAP_PATHS {
            let Ok(url) = domain.join(candidate) else {
                continue;
            };

            let status = match self.client.get(&url).send().await {
                Ok(response) => Some(response.status()),
                Err(e) => {
                    debug!("Probe of {} failed: {}", url, e);
                    None
                }
            };

            emit(
                &self.event_callback,
                ScanEvent::FallbackProbed {
                    url: url.clone(),
                    status: status.map(|s| s.as_u16()),
                },
            );

            match status {
                Some(StatusCode::OK) => {
                    info!("Sitemap found at {}", url);
                    emit(
                        &self.event_callback,
                        ScanEvent::FallbackFound { url: url.clone() },
                    );
                    return ProbeOutcome::Found(url);
                }
                Some(_) => answered = true,
                None => {}
            }
        }

        if answered {
            ProbeOutcome::NotFound
        } else {
            ProbeOutcome::AllFailed
        }
    }
}
