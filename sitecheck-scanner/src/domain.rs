use crate::error::{Result, ScanError};
use std::fmt;
use url::Url;

/// A site root everything else is resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    base: Url,
}

impl Domain {
    /// Normalises user input into a base URL. Inputs without an `http://` or
    /// `https://` prefix are assumed to be https.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ScanError::InvalidUrl("empty domain".to_string()));
        }

        let lowered = trimmed.to_ascii_lowercase();
        let with_scheme = if lowered.starts_with("http://") || lowered.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };

        let base = Url::parse(&with_scheme)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", trimmed, e)))?;

        if base.host_str().is_none_or(str::is_empty) {
            return Err(ScanError::InvalidUrl(format!("{}: missing host", trimmed)));
        }

        Ok(Self { base })
    }

    /// Resolves `path` against the site. Absolute paths replace whatever path
    /// the domain was given with.
    pub fn join(&self, path: &str) -> Result<String> {
        self.base
            .join(path)
            .map(|url| url.to_string())
            .map_err(|e| ScanError::InvalidUrl(format!("{} + {}: {}", self.base, path, e)))
    }

    pub fn host(&self) -> &str {
        self.base.host_str().unwrap_or_default()
    }

    pub fn as_url(&self) -> &Url {
        &self.base
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_domain_gets_https() {
        let domain = Domain::parse("example.com").unwrap();
        assert_eq!(domain.as_url().scheme(), "https");
        assert_eq!(domain.host(), "example.com");
    }

    #[test]
    fn test_explicit_http_is_kept() {
        let domain = Domain::parse("http://example.com").unwrap();
        assert_eq!(domain.as_url().scheme(), "http");
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let domain = Domain::parse("  example.com \n").unwrap();
        assert_eq!(domain.host(), "example.com");
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(Domain::parse("   "), Err(ScanError::InvalidUrl(_))));
    }

    #[test]
    fn test_join_absolute_path_replaces_existing_path() {
        let domain = Domain::parse("https://example.com/blog/post").unwrap();
        assert_eq!(
            domain.join("/robots.txt").unwrap(),
            "https://example.com/robots.txt"
        );
    }

    #[test]
    fn test_join_keeps_port() {
        let domain = Domain::parse("http://127.0.0.1:8080").unwrap();
        assert_eq!(
            domain.join("/sitemap.xml").unwrap(),
            "http://127.0.0.1:8080/sitemap.xml"
        );
    }
}
