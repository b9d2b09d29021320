// src/fetch/mod.rs
// =============================================================================
// This module obtains the page under analysis.
//
// Submodules:
// - document: the parsed page (raw markup, host, tag queries)
// - http: the DocumentFetcher seam and its reqwest implementation
// =============================================================================

mod document;
mod http;

pub use document::Document;
pub use http::{build_http_client, parse_target, DocumentFetcher, FetchError, HttpFetcher};
