use crate::config::ScanConfig;
use crate::domain::Domain;
use crate::error::{Result, ScanError};
use crate::events::{EventCallback, ScanEvent, emit};
use reqwest::Client;
use tracing::{debug, info, warn};

/// What a robots.txt fetch told us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RobotsOutcome {
    Declared(Vec<String>),
    NoneDeclared,
    /// The file could not be fetched (network failure or non-2xx).
    Unavailable(String),
}

impl RobotsOutcome {
    pub fn into_sitemaps(self) -> Vec<String> {
        match self {
            RobotsOutcome::Declared(sitemaps) => sitemaps,
            RobotsOutcome::NoneDeclared | RobotsOutcome::Unavailable(_) => Vec::new(),
        }
    }
}

/// Reads `Sitemap:` directives out of a site's robots.txt.
pub struct RobotsFinder {
    client: Client,
    event_callback: Option<EventCallback>,
}

impl RobotsFinder {
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

    /// Declared sitemap URLs in file order. Any failure yields an empty list.
    pub async fn find(&self, domain: &Domain) -> Vec<String> {
        self.fetch(domain).await.into_sitemaps()
    }

    pub async fn fetch(&self, domain: &Domain) -> RobotsOutcome {
        let robots_url = match domain.join("/robots.txt") {
            Ok(url) => url,
            Err(e) => return RobotsOutcome::Unavailable(e.to_string()),
        };

        info!("Checking robots.txt at {}", robots_url);
        emit(
            &self.event_callback,
            ScanEvent::RobotsRequested {
                url: robots_url.clone(),
            },
        );

        match self.fetch_body(&robots_url).await {
            Ok(body) => {
                let sitemaps = parse_sitemap_directives(&body);
                debug!("robots.txt declares {} sitemap(s)", sitemaps.len());
                emit(
                    &self.event_callback,
                    ScanEvent::RobotsParsed {
                        url: robots_url,
                        sitemaps: sitemaps.clone(),
                    },
                );
                if sitemaps.is_empty() {
                    RobotsOutcome::NoneDeclared
                } else {
                    RobotsOutcome::Declared(sitemaps)
                }
            }
            Err(e) => {
                warn!("Error fetching robots.txt at {}: {}", robots_url, e);
                emit(
                    &self.event_callback,
                    ScanEvent::RobotsUnavailable {
                        url: robots_url,
                        reason: e.to_string(),
                    },
                );
                RobotsOutcome::Unavailable(e.to_string())
            }
        }
    }

    async fn fetch_body(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Extracts the value of every line starting with `sitemap:` (any case),
/// trimmed, in line order. Lines may end in LF, CRLF or a bare CR.
pub fn parse_sitemap_directives(robots_txt: &str) -> Vec<String> {
    robots_txt
        .split(['\r', '\n'])
        .filter(|line| {
            line.get(..8)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("sitemap:"))
        })
        .filter_map(|line| line.split_once(':'))
        .map(|(_, value)| value.trim().to_string())
        .collect()
}
