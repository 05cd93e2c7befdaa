use crate::config::ScanConfig;
use crate::error::Result;
use crate::events::{EventCallback, ScanEvent, emit};
use crate::result::StatusResult;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

/// Issues one HEAD request per URL and records the literal status code.
pub struct StatusChecker {
    client: Client,
    pause: Duration,
    concurrency: usize,
    event_callback: Option<EventCallback>,
}

impl StatusChecker {
    pub fn new(config: &ScanConfig) -> Result<Self> {
        Ok(Self {
            client: config.status_client()?,
            pause: config.pause,
            concurrency: config.concurrency.max(1),
            event_callback: None,
        })
    }

    pub fn with_event_callback(mut self, callback: EventCallback) -> Self {
        self.event_callback = Some(callback);
        self
    }

    /// One result per input URL, in input order, duplicates included. A URL
    /// whose request fails gets the error marker; the batch carries on.
    pub async fn check_all(&self, urls: &[String]) -> Vec<StatusResult> {
        let total = urls.len();
        info!(
            "Checking status codes for {} URL(s), {} at a time",
            total, self.concurrency
        );

        let pause = self.pause;
        let sequential = self.concurrency == 1;
        // Earliest start of the next check. Starts are spaced `pause` apart;
        // sequential checks also wait `pause` after the previous one ends.
        let next_start = Mutex::new(Instant::now());
        let next_start = &next_start;

        let checks = urls.iter().map(|url| async move {
            if !pause.is_zero() {
                let slot = {
                    let mut next = next_start.lock().await;
                    let slot = (*next).max(Instant::now());
                    *next = slot + pause;
                    slot
                };
                tokio::time::sleep_until(slot).await;
            }
            let result = self.check_one(url).await;
            if sequential && !pause.is_zero() {
                *next_start.lock().await = Instant::now() + pause;
            }
            result
        });

        // `buffered` yields in submission order, so results and progress
        // indices line up with the input even when checks overlap.
        stream::iter(checks)
            .buffered(self.concurrency)
            .enumerate()
            .map(|(idx, result)| {
                emit(
                    &self.event_callback,
                    ScanEvent::UrlChecked {
                        index: idx + 1,
                        total,
                        url: result.url.clone(),
                        status: result.status_code,
                    },
                );
                result
            })
            .collect()
            .await
    }

    pub async fn check_one(&self, url: &str) -> StatusResult {
        let start = Instant::now();
        match self.client.head(url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                debug!("{} -> {}", url, status);
                StatusResult::new(url.to_string(), status, start.elapsed())
            }
            Err(e) => {
                debug!("Error checking {}: {}", url, e);
                StatusResult::with_error(url.to_string(), describe_error(&e))
            }
        }
    }
}

fn describe_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timed out".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else if error.is_builder() {
        format!("Invalid URL: {}", error)
    } else {
        error.to_string()
    }
}
