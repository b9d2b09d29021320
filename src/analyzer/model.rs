// src/analyzer/model.rs
// =============================================================================
// The data produced by one analysis run.
//
// Everything here is created fresh for each analyzed page and thrown away
// once the report has been returned - nothing is cached or shared.
//
// The JSON field names (versionHtml, listH1, internalLinks, ...) are part of
// the HTTP API contract, hence the serde renames.
// =============================================================================

use serde::{Deserialize, Serialize};

/// One anchor found on the page.
///
/// A link is identified by its position in the list that owns it, not by its
/// URL: two anchors pointing to the same place are two links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub url: String,
    /// False until the accessibility checker has probed the link
    pub accessible: bool,
}

impl Link {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            accessible: false,
        }
    }
}

/// Heading texts per level; index 0 holds the <h1> texts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headings([Vec<String>; 6]);

impl Headings {
    pub fn set_level(&mut self, level: usize, texts: Vec<String>) {
        if let 1..=6 = level {
            self.0[level - 1] = texts;
        }
    }

    fn into_levels(self) -> [Vec<String>; 6] {
        self.0
    }
}

/// Everything the feature extractor learns from the markup alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFeatures {
    pub version: String,
    pub title: String,
    pub headings: Headings,
    pub login: bool,
}

/// The final result of analyzing one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReport {
    #[serde(rename = "versionHtml")]
    pub version: String,
    pub title: String,
    #[serde(rename = "listH1", default, skip_serializing_if = "Vec::is_empty")]
    pub list_h1: Vec<String>,
    #[serde(rename = "listH2", default, skip_serializing_if = "Vec::is_empty")]
    pub list_h2: Vec<String>,
    #[serde(rename = "listH3", default, skip_serializing_if = "Vec::is_empty")]
    pub list_h3: Vec<String>,
    #[serde(rename = "listH4", default, skip_serializing_if = "Vec::is_empty")]
    pub list_h4: Vec<String>,
    #[serde(rename = "listH5", default, skip_serializing_if = "Vec::is_empty")]
    pub list_h5: Vec<String>,
    #[serde(rename = "listH6", default, skip_serializing_if = "Vec::is_empty")]
    pub list_h6: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub internal_links: Vec<Link>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_links: Vec<Link>,
    pub login: bool,
}

impl PageReport {
    pub fn assemble(features: PageFeatures, internal_links: Vec<Link>, external_links: Vec<Link>) -> Self {
        let [list_h1, list_h2, list_h3, list_h4, list_h5, list_h6] = features.headings.into_levels();
        Self {
            version: features.version,
            title: features.title,
            list_h1,
            list_h2,
            list_h3,
            list_h4,
            list_h5,
            list_h6,
            internal_links,
            external_links,
            login: features.login,
        }
    }

    /// Texts for heading `level` (1..=6).
    pub fn headings(&self, level: usize) -> &[String] {
        match level {
            1 => &self.list_h1,
            2 => &self.list_h2,
            3 => &self.list_h3,
            4 => &self.list_h4,
            5 => &self.list_h5,
            6 => &self.list_h6,
            _ => &[],
        }
    }

    pub fn inaccessible_links(&self) -> impl Iterator<Item = &Link> {
        self.internal_links
            .iter()
            .chain(self.external_links.iter())
            .filter(|link| !link.accessible)
    }
}

/// Counts-only view of a report, for dashboards and the terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub html_version: String,
    pub title: String,
    /// Number of headings per level, index 0 = <h1>
    pub headings: [usize; 6],
    pub internal: usize,
    pub internal_inaccessible: usize,
    pub external: usize,
    pub external_inaccessible: usize,
    pub login: bool,
}

impl From<&PageReport> for ReportSummary {
    fn from(report: &PageReport) -> Self {
        let inaccessible = |links: &[Link]| links.iter().filter(|l| !l.accessible).count();
        let mut headings = [0; 6];
        for (slot, level) in headings.iter_mut().zip(1..=6) {
            *slot = report.headings(level).len();
        }

        Self {
            html_version: report.version.clone(),
            title: report.title.clone(),
            headings,
            internal: report.internal_links.len(),
            internal_inaccessible: inaccessible(&report.internal_links),
            external: report.external_links.len(),
            external_inaccessible: inaccessible(&report.external_links),
            login: report.login,
        }
    }
}
