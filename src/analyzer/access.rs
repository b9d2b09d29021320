// src/analyzer/access.rs
// =============================================================================
// Decides, for every link on the page, whether it is reachable right now.
//
// How it works:
// 1. Each link becomes a ProbeTask { index, url } - the task owns a copy of
//    the URL and remembers the slot its answer belongs to
// 2. A semaphore caps how many probes are in flight at once
// 3. Dispatches are paced: we wait a little between starting two probes
// 4. Every probe runs on a JoinSet; once all have finished, each ProbeResult
//    is written back to links[index]
//
// One task per index, fixed at dispatch time, means no two tasks ever answer
// for the same link and the list keeps its original order no matter which
// probe finishes first.
//
// "Reachable" means the request completed and the body was drained. The status
// code is NOT inspected: a 404 or 500 still counts as reachable. Only
// transport errors and timeouts make a link inaccessible.
//
// Rust concepts:
// - Arc<Semaphore> + OwnedSemaphorePermit: a permit travels into the task
//   and is released when the task drops it
// - JoinSet: owns the spawned tasks; dropping it aborts whatever is still
//   running, so cancelling the caller cancels the probes
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::model::Link;

pub const DEFAULT_PACING: Duration = Duration::from_millis(50);
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// The unit of concurrent work: which slot, and what to request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTask {
    pub index: usize,
    pub url: String,
}

/// The answer for one slot. Errors never travel this far; they end at the
/// error sink and the link simply stays inaccessible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub index: usize,
    pub reachable: bool,
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("request failed: {source}")]
    Request {
        #[source]
        source: reqwest::Error,
    },
    #[error("reading body failed: {source}")]
    Body {
        #[source]
        source: reqwest::Error,
    },
    #[error("no response within {after:?}")]
    Timeout { after: Duration },
}

/// Performs a single reachability check.
#[async_trait]
pub trait LinkProber: Send + Sync {
    /// Ok(()) when a response was received and fully read, whatever its status.
    async fn probe(&self, url: &str) -> Result<(), ProbeError>;
}

/// Where absorbed probe failures are reported.
pub trait ProbeErrorSink: Send + Sync {
    fn probe_failed(&self, task: &ProbeTask, error: &ProbeError);
}

/// Default sink: one structured warning per failed probe.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorSink;

impl ProbeErrorSink for TracingErrorSink {
    fn probe_failed(&self, task: &ProbeTask, error: &ProbeError) {
        tracing::warn!(index = task.index, url = %task.url, error = %error, "link probe failed");
    }
}

/// Probes with a plain HTTP GET on the shared client.
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LinkProber for HttpProber {
    async fn probe(&self, url: &str) -> Result<(), ProbeError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ProbeError::Request { source })?;

        let status = response.status();
        // Drain the body chunk by chunk; only its length is kept
        let mut drained = 0usize;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|source| ProbeError::Body { source })?
        {
            drained += chunk.len();
        }

        tracing::debug!(url, status = status.as_u16(), bytes = drained, "probe completed");
        Ok(())
    }
}

/// Tally of one check_all call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CheckStats {
    pub dispatched: usize,
    pub reachable: usize,
    pub unreachable: usize,
}

impl CheckStats {
    fn record(&mut self, result: &ProbeResult) {
        if result.reachable {
            self.reachable += 1;
        } else {
            self.unreachable += 1;
        }
    }
}

pub struct AccessibilityChecker {
    prober: Arc<dyn LinkProber>,
    sink: Arc<dyn ProbeErrorSink>,
    concurrency: usize,
    pacing: Duration,
    probe_timeout: Duration,
}

impl AccessibilityChecker {
    /// A checker running at most `concurrency` probes at once (at least one),
    /// 50ms apart, each limited to 10 seconds.
    pub fn new(prober: Arc<dyn LinkProber>, concurrency: usize) -> Self {
        Self {
            prober,
            sink: Arc::new(TracingErrorSink),
            concurrency: concurrency.max(1),
            pacing: DEFAULT_PACING,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    pub fn with_error_sink(mut self, sink: Arc<dyn ProbeErrorSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Probes every link once and stores the outcome in `accessible`.
    ///
    /// Returns only after all probes have finished. Never fails: a probe
    /// that errors leaves its link at `accessible = false`.
    pub async fn check_all(&self, links: &mut [Link]) -> CheckStats {
        let mut stats = CheckStats::default();
        if links.is_empty() {
            return stats;
        }

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut probes = JoinSet::new();

        for (index, link) in links.iter().enumerate() {
            if index > 0 && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }

            // The semaphore is never closed, so this only waits for a free slot
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break;
            };

            let task = ProbeTask {
                index,
                url: link.url.clone(),
            };
            let prober = Arc::clone(&self.prober);
            let sink = Arc::clone(&self.sink);
            let timeout = self.probe_timeout;

            probes.spawn(async move {
                let _permit = permit;
                run_probe(prober.as_ref(), sink.as_ref(), task, timeout).await
            });
            stats.dispatched += 1;
        }

        while let Some(joined) = probes.join_next().await {
            match joined {
                Ok(result) => {
                    stats.record(&result);
                    if let Some(link) = links.get_mut(result.index) {
                        link.accessible = result.reachable;
                    }
                }
                Err(err) => {
                    // A panicking prober; the link keeps its default
                    stats.unreachable += 1;
                    tracing::error!(error = %err, "probe task did not complete");
                }
            }
        }

        stats
    }
}

async fn run_probe(
    prober: &dyn LinkProber,
    sink: &dyn ProbeErrorSink,
    task: ProbeTask,
    timeout: Duration,
) -> ProbeResult {
    let outcome = match tokio::time::timeout(timeout, prober.probe(&task.url)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(ProbeError::Timeout { after: timeout }),
    };

    match outcome {
        Ok(()) => ProbeResult {
            index: task.index,
            reachable: true,
        },
        Err(error) => {
            sink.probe_failed(&task, &error);
            ProbeResult {
                index: task.index,
                reachable: false,
            }
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why not share &mut Link with the tasks?
//    - tokio::spawn needs 'static data, and a borrowed slice is not 'static
//    - Each task gets an owned ProbeTask instead and returns a ProbeResult
//    - Only the caller touches the slice, after the task has been joined
//
// 2. What happens if the caller is cancelled?
//    - The future of check_all is dropped, which drops the JoinSet
//    - Dropping a JoinSet aborts every task still in it
// -----------------------------------------------------------------------------
