// src/analyzer/page.rs
// =============================================================================
// The page analyzer ties the pieces together:
//
//   fetch -> classify links -> extract features -> check internal links
//         -> check external links -> PageReport
//
// Only a fetch failure aborts the analysis. Probe failures end up as
// `accessible: false` inside the report.
//
// The parsed Document is dropped before the first probe is awaited: the
// scraper tree is not Send, and the report only needs the owned links and
// features taken from it.
// =============================================================================

use std::sync::Arc;

use reqwest::Client;

use crate::config::AnalyzerConfig;
use crate::fetch::{DocumentFetcher, FetchError, HttpFetcher};

use super::access::{AccessibilityChecker, HttpProber, TracingErrorSink};
use super::features::extract_features;
use super::links::{classify_links, ClassifiedLinks};
use super::model::PageReport;

pub struct PageAnalyzer {
    fetcher: Arc<dyn DocumentFetcher>,
    checker: AccessibilityChecker,
}

impl PageAnalyzer {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, checker: AccessibilityChecker) -> Self {
        Self { fetcher, checker }
    }

    /// Production wiring: fetcher and prober share one HTTP client.
    pub fn over_http(client: Client, config: &AnalyzerConfig) -> Self {
        let fetcher = Arc::new(HttpFetcher::new(client.clone()));
        let checker = AccessibilityChecker::new(Arc::new(HttpProber::new(client)), config.worker_count)
            .with_pacing(config.pacing)
            .with_probe_timeout(config.probe_timeout)
            .with_error_sink(Arc::new(TracingErrorSink));
        Self::new(fetcher, checker)
    }

    pub async fn analyze(&self, url: &str) -> Result<PageReport, FetchError> {
        let (links, features) = {
            let document = self.fetcher.fetch(url).await?;
            (classify_links(&document), extract_features(&document))
        };
        let ClassifiedLinks {
            mut internal,
            mut external,
        } = links;

        let internal_stats = self.checker.check_all(&mut internal).await;
        let external_stats = self.checker.check_all(&mut external).await;

        tracing::info!(
            url,
            probes = internal_stats.dispatched + external_stats.dispatched,
            internal = internal.len(),
            internal_unreachable = internal_stats.unreachable,
            external = external.len(),
            external_unreachable = external_stats.unreachable,
            login = features.login,
            "page analyzed"
        );

        Ok(PageReport::assemble(features, internal, external))
    }
}
