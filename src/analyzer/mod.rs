// src/analyzer/mod.rs
// =============================================================================
// This module contains all page analysis logic.
//
// Submodules:
// - model: Link, PageReport and friends
// - links: splits anchors into internal and external links
// - access: probes links concurrently and records which are reachable
// - features: HTML version, title, headings, login form detection
// - page: the orchestrator running all of the above for one URL
// =============================================================================

mod access;
mod features;
mod links;
mod model;
mod page;

#[cfg(test)]
pub(crate) mod testing;

pub use model::{Link, PageReport, ReportSummary};
pub use page::PageAnalyzer;
