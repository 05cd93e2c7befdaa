use std::sync::Arc;

/// Diagnostics the scanner reports while it works. The scanner never prints;
/// whoever owns the callback decides how (or whether) to show them.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    RobotsRequested { url: String },
    RobotsParsed { url: String, sitemaps: Vec<String> },
    RobotsUnavailable { url: String, reason: String },
    FallbackStarted { paths: usize },
    FallbackProbed { url: String, status: Option<u16> },
    FallbackFound { url: String },
    SitemapIndex { url: String, children: usize },
    SitemapUrlset { url: String, urls: usize },
    SitemapUnrecognised { url: String, root: String },
    SitemapFailed { url: String, reason: String },
    UrlChecked {
        index: usize,
        total: usize,
        url: String,
        status: Option<u16>,
    },
}

pub type EventCallback = Arc<dyn Fn(ScanEvent) + Send + Sync>;

pub(crate) fn emit(callback: &Option<EventCallback>, event: ScanEvent) {
    if let Some(callback) = callback {
        callback(event);
    }
}
