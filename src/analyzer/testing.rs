// src/analyzer/testing.rs
// =============================================================================
// In-memory stand-ins for the network, shared by the unit tests.
// =============================================================================

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::fetch::{parse_target, Document, DocumentFetcher, FetchError};

use super::access::{AccessibilityChecker, LinkProber, ProbeError, ProbeErrorSink, ProbeTask};
use super::page::PageAnalyzer;

pub const W3SCHOOLS_HOST: &str = "www.w3schools.com";

pub const W3SCHOOLS_PAGE: &str = r#"<!DOCTYPE HTML>
<html lang="en-US">
    <head>
        <title>W3Schools Online Web Tutorials</title>
    </head>
<body>

<h1>Header Level 1</h1>
<h2>Header Level 2</h2>
<h3>Header Level 3</h3>
<h4>Header Level 4</h4>
<h5>Header Level 5</h5>
<h6>Header Level 6</h6>
<div>
    <a href="/html/tryit.asp?filename=tryhtml_default">EXERCISES</a>
    <a href="/cert/default.asp" id="cert_navbtn">CERTIFICATES</a>
    <div>
        <a href="https://www.linkedin.com/company/w3schools.com/" title="W3Schools on LinkedIn">LinkedIn</a>
        <a href="https://www.instagram.com/w3schools.com_official/" title="W3Schools on Instagram">Instagram</a>
        <a href="https://www.facebook.com/w3schoolscom/" title="W3Schools on Facebook">Facebook</a>
    </div>
    <form>
        <label>Login</label>
        <label>Username</label>
        <input>Name</input>
        <label>Password</label>
        <input>Password</input>
        <button>Sign In</button>
    </form>
</div>

</body>
</html>"#;

/// Serves the same markup for every URL, as if it lived on `host`.
pub struct FakeFetcher {
    markup: String,
    host: String,
    fetches: AtomicUsize,
}

impl FakeFetcher {
    pub fn new(markup: &str, host: &str) -> Self {
        Self {
            markup: markup.to_string(),
            host: host.to_string(),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn w3schools() -> Self {
        Self::new(W3SCHOOLS_PAGE, W3SCHOOLS_HOST)
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Document, FetchError> {
        parse_target(url)?;
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(Document::parse(self.markup.clone(), self.host.clone()))
    }
}

/// Answers probes from a script: everything is reachable unless listed as
/// failing, optionally after a delay.
#[derive(Default)]
pub struct FakeProber {
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    default_delay: Duration,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    completed: AtomicUsize,
}

impl FakeProber {
    pub fn reachable() -> Self {
        Self::default()
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn with_delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Probes that ran to the end of their delay.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LinkProber for FakeProber {
    async fn probe(&self, url: &str) -> Result<(), ProbeError> {
        self.calls.lock().unwrap().push(url.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.get(url).copied().unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(url) {
            Err(ProbeError::Timeout { after: delay })
        } else {
            Ok(())
        }
    }
}

/// Keeps every absorbed failure as (task, rendered error).
#[derive(Default)]
pub struct RecordingSink {
    failures: Mutex<Vec<(ProbeTask, String)>>,
}

impl RecordingSink {
    pub fn failures(&self) -> Vec<(ProbeTask, String)> {
        self.failures.lock().unwrap().clone()
    }
}

impl ProbeErrorSink for RecordingSink {
    fn probe_failed(&self, task: &ProbeTask, error: &ProbeError) {
        self.failures
            .lock()
            .unwrap()
            .push((task.clone(), error.to_string()));
    }
}

/// An analyzer over the fakes, with one worker and almost no pacing.
pub fn fake_analyzer(fetcher: FakeFetcher, prober: FakeProber) -> PageAnalyzer {
    let checker = AccessibilityChecker::new(Arc::new(prober), 1).with_pacing(Duration::from_millis(1));
    PageAnalyzer::new(Arc::new(fetcher), checker)
}
