// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - analyze: analyze one page and print the report
// - serve:   run the HTTP API
//
// Options shared by both live in AnalyzerArgs and are flattened into each
// subcommand. Some of them can also be set through environment variables,
// which is how the service is usually configured in a container.
// =============================================================================

use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "page-analyzer",
    version,
    about = "Analyze a web page: HTML version, title, headings, login forms and link reachability",
    long_about = "page-analyzer fetches a single page, reports its HTML version, title, headings and \
                  whether it contains a login form, and checks every link on it for reachability."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a single page
    ///
    /// Example: page-analyzer analyze https://www.w3schools.com/ --workers 5
    Analyze {
        /// Absolute http(s) URL of the page
        url: String,

        /// Output the full report as JSON instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        analyzer: AnalyzerArgs,
    },

    /// Serve the analysis HTTP API
    ///
    /// Example: page-analyzer serve --listen 0.0.0.0:8080
    Serve {
        /// Address to listen on
        #[arg(long, env = "API_LISTENER", default_value = "127.0.0.1:8080")]
        listen: SocketAddr,

        #[command(flatten)]
        analyzer: AnalyzerArgs,
    },
}

/// Knobs for the link checker and the shared HTTP client.
#[derive(Args, Debug, Clone)]
pub struct AnalyzerArgs {
    /// Maximum number of links probed at the same time
    #[arg(long, env = "API_WORKER_COUNT", default_value_t = 10)]
    pub workers: usize,

    /// Delay between starting two link probes, in milliseconds
    #[arg(long, default_value_t = 50)]
    pub pacing_ms: u64,

    /// Timeout for a single link probe, in seconds
    #[arg(long, default_value_t = 10)]
    pub probe_timeout_secs: u64,

    /// Timeout for fetching the analyzed page, in seconds
    #[arg(long, default_value_t = 30)]
    pub fetch_timeout_secs: u64,
}
