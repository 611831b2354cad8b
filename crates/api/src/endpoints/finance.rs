//! Finance endpoints.

use axum::{Router, extract::State, routing::get};
use schooldesk_common::AppResult;
use schooldesk_core::FinanceSummary;

use crate::{middleware::AppState, response::ApiResponse};

/// Create finance router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(summary))
}

async fn summary(State(state): State<AppState>) -> AppResult<ApiResponse<FinanceSummary>> {
    Ok(ApiResponse::ok(state.finance_service.summary().await?))
}
