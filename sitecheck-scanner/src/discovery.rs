use crate::config::ScanConfig;
use crate::domain::Domain;
use crate::error::Result;
use crate::events::EventCallback;
use crate::fallback::{FallbackProber, ProbeOutcome};
use crate::robots::{RobotsFinder, RobotsOutcome};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscoverySource {
    Robots,
    Fallback,
    /// Nothing was found. `all_attempts_failed` is true when neither
    /// robots.txt nor any probe got an HTTP answer at all.
    Nothing { all_attempts_failed: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discovery {
    pub sitemaps: Vec<String>,
    pub source: DiscoverySource,
}

/// robots.txt first; the conventional paths only when it declared nothing.
pub async fn discover_sitemaps(
    domain: &Domain,
    config: &ScanConfig,
    event_callback: Option<EventCallback>,
) -> Result<Discovery> {
    let client = config.discovery_client()?;

    let mut robots = RobotsFinder::with_client(client.clone());
    if let Some(ref callback) = event_callback {
        robots = robots.with_event_callback(callback.clone());
    }

    let robots_outcome = robots.fetch(domain).await;
    let robots_failed = matches!(robots_outcome, RobotsOutcome::Unavailable(_));
    let declared = robots_outcome.into_sitemaps();
    if !declared.is_empty() {
        return Ok(Discovery {
            sitemaps: declared,
            source: DiscoverySource::Robots,
        });
    }

    let mut prober = FallbackProber::with_client(client);
    if let Some(callback) = event_callback {
        prober = prober.with_event_callback(callback);
    }

    let discovery = match prober.probe(domain).await {
        ProbeOutcome::Found(url) => Discovery {
            sitemaps: vec![url],
            source: DiscoverySource::Fallback,
        },
        ProbeOutcome::NotFound => Discovery {
            sitemaps: Vec::new(),
            source: DiscoverySource::Nothing {
                all_attempts_failed: false,
            },
        },
        ProbeOutcome::AllFailed => Discovery {
            sitemaps: Vec::new(),
            source: DiscoverySource::Nothing {
                all_attempts_failed: robots_failed,
            },
        },
    };

    Ok(discovery)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    #[tokio::test]
    async fn test_robots_declaration_skips_fallback() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!("Sitemap: {}/custom.xml\n", mock_server.uri())),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let domain = Domain::parse(&mock_server.uri()).unwrap();
        let discovery = discover_sitemaps(&domain, &ScanConfig::default(), None)
            .await
            .unwrap();

        assert_eq!(discovery.source, DiscoverySource::Robots);
        assert_eq!(
            discovery.sitemaps,
            vec![format!("{}/custom.xml", mock_server.uri())]
        );
    }

    #[tokio::test]
    async fn test_falls_back_when_robots_missing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<urlset/>"))
            .mount(&mock_server)
            .await;

        let domain = Domain::parse(&mock_server.uri()).unwrap();
        let discovery = discover_sitemaps(&domain, &ScanConfig::default(), None)
            .await
            .unwrap();

        assert_eq!(discovery.source, DiscoverySource::Fallback);
        assert_eq!(
            discovery.sitemaps,
            vec![format!("{}/sitemap.xml", mock_server.uri())]
        );
    }

    #[tokio::test]
    async fn test_nothing_found_on_live_host() {
        let mock_server = MockServer::start().await;

        let domain = Domain::parse(&mock_server.uri()).unwrap();
        let discovery = discover_sitemaps(&domain, &ScanConfig::default(), None)
            .await
            .unwrap();

        assert!(discovery.sitemaps.is_empty());
        assert_eq!(
            discovery.source,
            DiscoverySource::Nothing {
                all_attempts_failed: false
            }
        );
    }

    #[tokio::test]
    async fn test_nothing_found_on_dead_host() {
        let domain = Domain::parse("http://127.0.0.1:1").unwrap();
        let config = ScanConfig::default().with_discovery_timeout(Duration::from_millis(500));
        let discovery = discover_sitemaps(&domain, &config, None).await.unwrap();

        assert_eq!(
            discovery.source,
            DiscoverySource::Nothing {
                all_attempts_failed: true
            }
        );
    }
}
