// src/server.rs
// =============================================================================
// The HTTP API around the page analyzer.
//
// Routes:
//   GET  /health                         -> {"message":"health","status":"OK"}
//   POST /api/v1/parsing/page/analyze    -> full PageReport for {"url": "..."}
//   GET  /api/v1/analyzer?url=...        -> ReportSummary (counts only)
//
// A request whose client goes away drops its handler future, and with it
// every link probe still running for that request.
// =============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context as _;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::analyzer::{PageAnalyzer, PageReport, ReportSummary};
use crate::fetch::FetchError;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
    pub status: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        let status = if err.is_invalid_target() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        tracing::error!(error = %err, "page analysis failed");
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

pub fn router(analyzer: Arc<PageAnalyzer>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/parsing/page/analyze", post(analyze_page))
        .route("/api/v1/analyzer", get(summarize_page))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(analyzer)
}

pub async fn serve(listen: SocketAddr, analyzer: Arc<PageAnalyzer>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .with_context(|| format!("bind {listen}"))?;
    tracing::info!(addr = %listen, "listening");

    axum::serve(listener, router(analyzer))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve HTTP API")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn health() -> Json<StatusMessage> {
    Json(StatusMessage {
        message: "health".to_string(),
        status: "OK".to_string(),
    })
}

async fn analyze_page(
    State(analyzer): State<Arc<PageAnalyzer>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<PageReport>, ApiError> {
    let report = run_analysis(&analyzer, &request.url).await?;
    Ok(Json(report))
}

async fn summarize_page(
    State(analyzer): State<Arc<PageAnalyzer>>,
    Query(request): Query<AnalyzeRequest>,
) -> Result<Json<ReportSummary>, ApiError> {
    let report = run_analysis(&analyzer, &request.url).await?;
    Ok(Json(ReportSummary::from(&report)))
}

async fn run_analysis(analyzer: &PageAnalyzer, url: &str) -> Result<PageReport, ApiError> {
    if url.trim().is_empty() {
        return Err(ApiError::bad_request("empty url"));
    }
    Ok(analyzer.analyze(url).await?)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::warn!("shutdown signal received, draining connections");
}
