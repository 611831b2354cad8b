//! Dashboard endpoints.

use axum::{Router, extract::State, routing::get};
use chrono::Utc;
use schooldesk_common::AppResult;
use schooldesk_core::{DashboardStats, DashboardSummary};

use crate::{middleware::AppState, response::ApiResponse};

/// Create dashboard router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(summary))
        .route("/stats", get(stats))
}

async fn summary(State(state): State<AppState>) -> AppResult<ApiResponse<DashboardSummary>> {
    let summary = state.dashboard_service.summary(Utc::now().into()).await?;
    Ok(ApiResponse::ok(summary))
}

async fn stats(State(state): State<AppState>) -> AppResult<ApiResponse<DashboardStats>> {
    Ok(ApiResponse::ok(state.dashboard_service.stats().await?))
}
