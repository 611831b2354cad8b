//! Event endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use schooldesk_common::AppResult;
use schooldesk_core::{CreateEventInput, DASHBOARD_LIST_LIMIT, EventDetails, UpdateEventInput};
use schooldesk_db::entities::event;
use serde::Deserialize;

use crate::{
    extractors::ValidatedJson,
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Create event router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/upcoming", get(upcoming_events))
        .route(
            "/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
}

/// Upcoming events query.
#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
}

const fn default_limit() -> u64 {
    DASHBOARD_LIST_LIMIT
}

/// All events by start date.
async fn list_events(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<event::Model>>> {
    Ok(ApiResponse::ok(state.event_service.list().await?))
}

async fn upcoming_events(
    State(state): State<AppState>,
    Query(query): Query<UpcomingQuery>,
) -> AppResult<ApiResponse<Vec<event::Model>>> {
    let events = state
        .event_service
        .upcoming(Utc::now().into(), query.limit)
        .await?;
    Ok(ApiResponse::ok(events))
}

async fn create_event(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateEventInput>,
) -> AppResult<ApiResponse<EventDetails>> {
    let event = state.event_service.create(input).await?;
    Ok(ApiResponse::created(
        state.event_service.details(&event.id).await?,
    ))
}

async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<EventDetails>> {
    Ok(ApiResponse::ok(state.event_service.details(&id).await?))
}

async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateEventInput>,
) -> AppResult<ApiResponse<EventDetails>> {
    state.event_service.update(&id, input).await?;
    Ok(ApiResponse::ok(state.event_service.details(&id).await?))
}

async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.event_service.delete(&id).await?;
    Ok(no_content())
}
