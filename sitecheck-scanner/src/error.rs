use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("{url} answered HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("XML parse error: {0}")]
    XmlError(String),

    #[error("Sitemap {0} references itself through its own ancestors")]
    SitemapCycle(String),

    #[error("Sitemap {url} is nested deeper than the limit of {max_depth}")]
    DepthExceeded { url: String, max_depth: usize },
}

pub type Result<T> = std::result::Result<T, ScanError>;
