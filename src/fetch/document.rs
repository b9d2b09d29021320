// src/fetch/document.rs
// =============================================================================
// A parsed page, ready to be queried by the analyzer.
//
// A Document keeps three things together:
// - the raw markup exactly as it arrived (version sniffing reads this)
// - the effective host of the URL it came from (link classification needs it)
// - a navigable tree built by `scraper`, queried by tag name
//
// The analyzer never cares whether the markup came from the network or from
// a string in a test - it only talks to this type.
// =============================================================================

use scraper::{ElementRef, Html, Selector};
use url::Url;

#[derive(Debug)]
pub struct Document {
    source: String,
    host: String,
    tree: Html,
}

impl Document {
    /// Parses `source` into a document that belongs to `host`.
    ///
    /// `host` is the bare authority (`example.com` or `127.0.0.1:8080`),
    /// without scheme or path.
    pub fn parse(source: impl Into<String>, host: impl Into<String>) -> Self {
        let source = source.into();
        let tree = Html::parse_document(&source);
        Self {
            source,
            host: host.into(),
            tree,
        }
    }

    /// Parses `source` as the page served at `url`.
    pub fn from_url(source: impl Into<String>, url: &Url) -> Self {
        Self::parse(source, effective_host(url))
    }

    /// The markup as received.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns every element with the given tag name, in document order.
    ///
    /// An unparseable tag name matches nothing.
    pub fn select(&self, tag: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(tag) {
            Ok(selector) => self.tree.select(&selector).collect(),
            Err(_) => Vec::new(),
        }
    }
}

// Builds "host" or "host:port" the way a browser's location.host does.
// Url::port() already hides default ports (80 for http, 443 for https).
pub fn effective_host(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}
