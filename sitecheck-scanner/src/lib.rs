pub mod config;
pub mod discovery;
pub mod domain;
pub mod error;
pub mod events;
pub mod fallback;
pub mod result;
pub mod robots;
pub mod sitemap;
pub mod status;

pub use config::ScanConfig;
pub use discovery::{Discovery, DiscoverySource, discover_sitemaps};
pub use domain::Domain;
pub use error::{Result, ScanError};
pub use events::{EventCallback, ScanEvent};
pub use fallback::{FallbackProber, ProbeOutcome};
pub use result::{ERROR_MARKER, StatusResult};
pub use robots::{RobotsFinder, RobotsOutcome};
pub use sitemap::{Expansion, SitemapDocument, SitemapExpander, SitemapFailure};
pub use status::StatusChecker;
