//! verilens-ma library interface
//!
//! Exposes the pipeline and API surface for integration testing.

pub mod api;
pub mod artifacts;
pub mod classifier;
pub mod config;
pub mod dsp;
pub mod error;
pub mod extract;
pub mod fusion;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod types;

pub use crate::error::{ApiError, ApiResult};

use axum::{extract::DefaultBodyLimit, Router};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::config::AnalysisSettings;
use crate::pipeline::Analyzer;

/// Largest accepted upload in bytes
pub const MAX_UPLOAD_BYTES: usize = 256 * 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Resolved pipeline settings
    pub settings: Arc<AnalysisSettings>,
    /// Analysis orchestrator
    pub analyzer: Arc<Analyzer>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(settings: AnalysisSettings, analyzer: Analyzer) -> Self {
        Self {
            settings: Arc::new(settings),
            analyzer: Arc::new(analyzer),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// Artifacts are static files under the scratch directory, served from
/// `/artifacts/{request_id}/...`.
pub fn build_router(state: AppState) -> Router {
    let artifacts = ServeDir::new(&state.settings.scratch_dir);

    Router::new()
        .merge(api::analyze_routes())
        .merge(api::health_routes())
        .nest_service("/artifacts", artifacts)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
