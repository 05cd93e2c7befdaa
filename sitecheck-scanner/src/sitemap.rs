//! Sitemap fetching and expansion.
//!
//! A reference either points at a `<sitemapindex>`, whose `<sitemap><loc>`
//! children are expanded in turn, or at a `<urlset>`, whose `<url><loc>`
//! entries are the page URLs we are after. Elements are matched by local name
//! so any namespace prefix works.
//!
//! Every reference is isolated: a broken child contributes nothing and is
//! recorded in [`Expansion::failures`], its siblings carry on.

use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::events::{EventCallback, ScanEvent, emit};
use quick_xml::Reader;
use quick_xml::events::Event;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, info, warn};

/// A parsed sitemap document, classified by its root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<sitemapindex>`: locations of further sitemaps.
    Index(Vec<String>),
    /// `<urlset>`: page URLs.
    Urlset(Vec<String>),
    /// Anything else, carrying the root's local name.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapFailure {
    pub url: String,
    pub reason: String,
}

/// Result of expanding one or more sitemap references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expansion {
    /// Page URLs in traversal order, duplicates kept.
    pub urls: Vec<String>,
    /// Documents fetched and parsed successfully.
    pub documents: usize,
    pub failures: Vec<SitemapFailure>,
}

impl Expansion {
    fn merge(&mut self, other: Expansion) {
        self.urls.extend(other.urls);
        self.documents += other.documents;
        self.failures.extend(other.failures);
    }
}

pub struct SitemapExpander {
    client: Client,
    max_depth: usize,
    event_callback: Option<EventCallback>,
}

type ExpandFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

impl SitemapExpander {
    pub fn new(config: &ScanConfig) -> Result<Self> {
        Ok(Self::with_client(
            config.discovery_client()?,
            config.max_sitemap_depth,
        ))
    }

    pub fn with_client(client: Client, max_depth: usize) -> Self {
        Self {
            client,
            max_depth,
            event_callback: None,
        }
    }

    pub fn with_event_callback(mut self, callback: EventCallback) -> Self {
        self.event_callback = Some(callback);
        self
    }

    /// Expands a single reference into the page URLs it ultimately lists.
    pub async fn expand(&self, sitemap_url: &str) -> Expansion {
        let mut expansion = Expansion::default();
        let mut ancestors = Vec::new();
        self.expand_into(sitemap_url.to_string(), 0, &mut ancestors, &mut expansion)
            .await;
        expansion
    }

    /// Expands each reference in order and concatenates the results.
    pub async fn expand_all(&self, sitemap_urls: &[String]) -> Expansion {
        let mut expansion = Expansion::default();
        for sitemap_url in sitemap_urls {
            expansion.merge(self.expand(sitemap_url).await);
        }
        expansion
    }

    // Boxed so the future can recurse. `ancestors` is the chain of indexes
    // leading here; meeting one of them again means a cycle.
    fn expand_into<'a>(
        &'a self,
        url: String,
        depth: usize,
        ancestors: &'a mut Vec<String>,
        out: &'a mut Expansion,
    ) -> ExpandFuture<'a> {
        Box::pin(async move {
            if ancestors.contains(&url) {
                let error = ScanError::SitemapCycle(url.clone());
                self.record_failure(out, url, error);
                return;
            }
            if depth > self.max_depth {
                let error = ScanError::DepthExceeded {
                    url: url.clone(),
                    max_depth: self.max_depth,
                };
                self.record_failure(out, url, error);
                return;
            }

            debug!(url = %url, depth = depth, "Fetching sitemap");

            let document = match self.fetch_document(&url).await {
                Ok(document) => document,
                Err(e) => {
                    self.record_failure(out, url, e);
                    return;
                }
            };
            out.documents += 1;

            match document {
                SitemapDocument::Index(children) => {
                    info!("Sitemap index found at {} ({} children)", url, children.len());
                    emit(
                        &self.event_callback,
                        ScanEvent::SitemapIndex {
                            url: url.clone(),
                            children: children.len(),
                        },
                    );

                    ancestors.push(url);
                    for child in children {
                        self.expand_into(child, depth + 1, ancestors, out).await;
                    }
                    ancestors.pop();
                }
                SitemapDocument::Urlset(urls) => {
                    info!("Sitemap child found at {} ({} URLs)", url, urls.len());
                    emit(
                        &self.event_callback,
                        ScanEvent::SitemapUrlset {
                            url,
                            urls: urls.len(),
                        },
                    );
                    out.urls.extend(urls);
                }
                SitemapDocument::Other(root) => {
                    debug!("Ignoring {}: root element <{}> is not a sitemap", url, root);
                    emit(
                        &self.event_callback,
                        ScanEvent::SitemapUnrecognised { url, root },
                    );
                }
            }
        })
    }

    async fn fetch_document(&self, url: &str) -> Result<SitemapDocument> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_sitemap_document(&body)
    }

    fn record_failure(&self, out: &mut Expansion, url: String, error: ScanError) {
        warn!("Skipping sitemap {}: {}", url, error);
        let reason = error.to_string();
        emit(
            &self.event_callback,
            ScanEvent::SitemapFailed {
                url: url.clone(),
                reason: reason.clone(),
            },
        );
        out.failures.push(SitemapFailure { url, reason });
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum RootKind {
    Index,
    Urlset,
    Other,
}

impl RootKind {
    fn entry_tag(self) -> Option<&'static [u8]> {
        match self {
            RootKind::Index => Some(b"sitemap".as_slice()),
            RootKind::Urlset => Some(b"url".as_slice()),
            RootKind::Other => None,
        }
    }
}

/// Parses a sitemap document and collects the first `<loc>` of every entry.
///
/// The whole document must be well formed, even when the root turns out not
/// to be a sitemap. Entries without a non-empty `<loc>` are skipped.
pub fn parse_sitemap_document(xml: &str) -> Result<SitemapDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut root: Option<(RootKind, String)> = None;
    let mut root_closed = false;
    let mut depth = 0usize;
    let mut entry_depth: Option<usize> = None;
    let mut loc_depth: Option<usize> = None;
    let mut loc_text = String::new();
    let mut entry_loc: Option<String> = None;
    let mut locs = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            ScanError::XmlError(format!("at byte {}: {}", reader.buffer_position(), e))
        })?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                let local_name = e.local_name();
                let name = local_name.as_ref();

                if root_closed {
                    return Err(ScanError::XmlError(
                        "junk after document element".to_string(),
                    ));
                }

                match root.as_ref().map(|(kind, _)| *kind) {
                    None => {
                        let kind = match name {
                            b"sitemapindex" => RootKind::Index,
                            b"urlset" => RootKind::Urlset,
                            _ => RootKind::Other,
                        };
                        root = Some((kind, String::from_utf8_lossy(name).into_owned()));
                    }
                    Some(kind) => {
                        if entry_depth.is_none() && kind.entry_tag() == Some(name) {
                            entry_depth = Some(depth + 1);
                            entry_loc = None;
                        } else if entry_depth.is_some()
                            && entry_loc.is_none()
                            && loc_depth.is_none()
                            && name == b"loc"
                        {
                            loc_depth = Some(depth + 1);
                            loc_text.clear();
                        }
                    }
                }

                if is_empty {
                    // An empty root closes the document; an empty entry or
                    // loc carries no URL.
                    if depth == 0 {
                        root_closed = true;
                    }
                    if entry_depth == Some(depth + 1) {
                        entry_depth = None;
                    }
                    if loc_depth == Some(depth + 1) {
                        loc_depth = None;
                    }
                } else {
                    depth += 1;
                }
            }
            Event::End(_) => {
                if loc_depth == Some(depth) {
                    loc_depth = None;
                    entry_loc = Some(loc_text.trim().to_string());
                }
                if entry_depth == Some(depth) {
                    entry_depth = None;
                    if let Some(loc) = entry_loc.take()
                        && !loc.is_empty()
                    {
                        locs.push(loc);
                    }
                }
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    root_closed = true;
                }
            }
            Event::Text(ref text) if root_closed => {
                if !text.iter().all(u8::is_ascii_whitespace) {
                    return Err(ScanError::XmlError(
                        "junk after document element".to_string(),
                    ));
                }
            }
            Event::CData(_) if root_closed => {
                return Err(ScanError::XmlError(
                    "junk after document element".to_string(),
                ));
            }
            Event::Text(ref text) if loc_depth.is_some() => {
                let text = text
                    .unescape()
                    .map_err(|e| ScanError::XmlError(e.to_string()))?;
                loc_text.push_str(&text);
            }
            Event::CData(ref data) if loc_depth.is_some() => {
                loc_text.push_str(&String::from_utf8_lossy(data));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let Some((kind, root_name)) = root else {
        return Err(ScanError::XmlError("no element found".to_string()));
    };
    if !root_closed {
        return Err(ScanError::XmlError(format!(
            "document ended inside <{}>",
            root_name
        )));
    }

    Ok(match kind {
        RootKind::Index => SitemapDocument::Index(locs),
        RootKind::Urlset => SitemapDocument::Urlset(locs),
        RootKind::Other => SitemapDocument::Other(root_name),
    })
}
