use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Marker written in place of a status code when the request never completed.
pub const ERROR_MARKER: &str = "Error";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResult {
    pub url: String,
    pub status_code: Option<u16>,
    pub response_time: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusResult {
    pub fn new(url: String, status_code: u16, response_time: Duration) -> Self {
        Self {
            url,
            status_code: Some(status_code),
            response_time,
            error: None,
        }
    }

    pub fn with_error(url: String, error: String) -> Self {
        Self {
            url,
            status_code: None,
            response_time: Duration::from_secs(0),
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status_code.is_none()
    }

    /// The status code, or [`ERROR_MARKER`].
    pub fn status_label(&self) -> String {
        match self.status_code {
            Some(code) => code.to_string(),
            None => ERROR_MARKER.to_string(),
        }
    }
}
