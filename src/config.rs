// src/config.rs
// =============================================================================
// Runtime settings for an analysis, built from the command line (or the
// environment variables clap falls back to) and checked before use.
// =============================================================================

use std::time::Duration;

use anyhow::{ensure, Result};

use crate::cli::AnalyzerArgs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Maximum number of link probes in flight at once
    pub worker_count: usize,
    /// Delay between starting two consecutive probes
    pub pacing: Duration,
    /// Upper bound for a single probe
    pub probe_timeout: Duration,
    /// Upper bound for any request on the shared client, including the page fetch
    pub fetch_timeout: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            worker_count: 10,
            pacing: Duration::from_millis(50),
            probe_timeout: Duration::from_secs(10),
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

impl AnalyzerConfig {
    pub fn from_args(args: &AnalyzerArgs) -> Result<Self> {
        let config = Self {
            worker_count: args.workers,
            pacing: Duration::from_millis(args.pacing_ms),
            probe_timeout: Duration::from_secs(args.probe_timeout_secs),
            fetch_timeout: Duration::from_secs(args.fetch_timeout_secs),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.worker_count > 0, "worker count must be at least 1");
        ensure!(!self.probe_timeout.is_zero(), "probe timeout must be greater than zero");
        ensure!(!self.fetch_timeout.is_zero(), "fetch timeout must be greater than zero");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(workers: usize, probe_timeout_secs: u64) -> AnalyzerArgs {
        AnalyzerArgs {
            workers,
            pacing_ms: 0,
            probe_timeout_secs,
            fetch_timeout_secs: 30,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalyzerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pacing, Duration::from_millis(50));
    }

    #[test]
    fn test_from_args_converts_units() {
        let config = AnalyzerConfig::from_args(&args(4, 3)).unwrap();
        assert_eq!(config.worker_count, 4);
        assert_eq!(config.pacing, Duration::ZERO);
        assert_eq!(config.probe_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let err = AnalyzerConfig::from_args(&args(0, 10)).unwrap_err();
        assert!(err.to_string().contains("worker count"));
    }

    #[test]
    fn test_zero_probe_timeout_rejected() {
        assert!(AnalyzerConfig::from_args(&args(2, 0)).is_err());
    }
}
