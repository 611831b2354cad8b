//! Payment endpoints.
//!
//! Payments are recorded and listed under `/students/{id}/payments`.

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::delete,
};
use schooldesk_common::AppResult;

use crate::{middleware::AppState, response::no_content};

/// Create payment router.
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", delete(delete_payment))
}

async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.finance_service.delete_payment(&id).await?;
    Ok(no_content())
}
