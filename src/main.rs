// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging and build the shared HTTP client
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = all links reachable, 1 = unreachable links,
//    2 = error)
// =============================================================================

mod analyzer; // src/analyzer/ - link classification, link checking, page features
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - validated runtime settings
mod fetch; // src/fetch/ - getting the page and parsing it
mod logging; // src/logging.rs - tracing setup
mod server; // src/server.rs - HTTP API

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use analyzer::{Link, PageAnalyzer, PageReport, ReportSummary};
use cli::{AnalyzerArgs, Cli, Commands};
use config::AnalyzerConfig;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every link reachable (or server stopped cleanly)
//   Ok(1) = at least one unreachable link
//   Err   = anything else
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init()?;

    match cli.command {
        Commands::Analyze { url, json, analyzer } => handle_analyze(&url, json, &analyzer).await,
        Commands::Serve { listen, analyzer } => handle_serve(listen, &analyzer).await,
    }
}

fn build_analyzer(args: &AnalyzerArgs) -> Result<PageAnalyzer> {
    let config = AnalyzerConfig::from_args(args).context("invalid analyzer settings")?;
    let client = fetch::build_http_client(config.fetch_timeout).context("build HTTP client")?;
    tracing::debug!(?config, "analyzer configured");
    Ok(PageAnalyzer::over_http(client, &config))
}

async fn handle_analyze(url: &str, json: bool, args: &AnalyzerArgs) -> Result<i32> {
    let analyzer = build_analyzer(args)?;
    tracing::info!(url, workers = args.workers, "analyzing page");

    let report = analyzer
        .analyze(url)
        .await
        .with_context(|| format!("analyze {}", url))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.inaccessible_links().next().is_some() {
        Ok(1)
    } else {
        Ok(0)
    }
}

async fn handle_serve(listen: SocketAddr, args: &AnalyzerArgs) -> Result<i32> {
    let analyzer = Arc::new(build_analyzer(args)?);
    server::serve(listen, analyzer).await?;
    Ok(0)
}

// Human-readable output: summary first, then every link
fn print_report(report: &PageReport) {
    let summary = ReportSummary::from(report);

    println!("📄 {}", if report.title.is_empty() { "(no title)" } else { report.title.as_str() });
    println!("   HTML version: {}", summary.html_version);
    for (level, count) in (1..=6).zip(summary.headings) {
        if count > 0 {
            println!("   h{}: {}", level, count);
        }
    }
    println!("   Login form: {}", if summary.login { "yes" } else { "no" });
    println!();

    println!("{:<70} {:<10} {:<10}", "URL", "KIND", "ACCESSIBLE");
    println!("{}", "=".repeat(92));
    print_links(&report.internal_links, "internal");
    print_links(&report.external_links, "external");
    println!();

    println!("📊 Summary:");
    println!(
        "   Internal: {} ({} inaccessible)",
        summary.internal, summary.internal_inaccessible
    );
    println!(
        "   External: {} ({} inaccessible)",
        summary.external, summary.external_inaccessible
    );
}

fn print_links(links: &[Link], kind: &str) {
    for link in links {
        // Truncate on a char boundary; URLs may contain non-ASCII text
        let url_display = if link.url.chars().count() > 67 {
            format!("{}...", link.url.chars().take(67).collect::<String>())
        } else {
            link.url.clone()
        };
        let accessible = if link.accessible { "✅ yes" } else { "❌ no" };
        println!("{:<70} {:<10} {:<10}", url_display, kind, accessible);
    }
}
