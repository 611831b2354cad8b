//! Notification endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use schooldesk_common::AppResult;
use schooldesk_core::{CreateNotificationInput, UpdateNotificationInput};
use schooldesk_db::entities::notification;
use serde::Deserialize;

use crate::{
    extractors::ValidatedJson,
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Create notification router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications).post(create_notification))
        .route(
            "/{id}",
            get(get_notification)
                .put(update_notification)
                .delete(delete_notification),
        )
}

/// List notifications query.
#[derive(Debug, Default, Deserialize)]
pub struct ListNotificationsQuery {
    /// Only notifications still shown to readers.
    #[serde(default)]
    pub active: bool,
    /// Newest `limit` notifications.
    pub limit: Option<u64>,
}

async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<ListNotificationsQuery>,
) -> AppResult<ApiResponse<Vec<notification::Model>>> {
    let notifications = match (query.active, query.limit) {
        (true, _) => state.notification_service.active().await?,
        (false, Some(limit)) => state.notification_service.recent(limit).await?,
        (false, None) => state.notification_service.list().await?,
    };
    Ok(ApiResponse::ok(notifications))
}

async fn create_notification(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateNotificationInput>,
) -> AppResult<ApiResponse<notification::Model>> {
    Ok(ApiResponse::created(
        state.notification_service.create(input).await?,
    ))
}

async fn get_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<notification::Model>> {
    Ok(ApiResponse::ok(state.notification_service.get(&id).await?))
}

async fn update_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateNotificationInput>,
) -> AppResult<ApiResponse<notification::Model>> {
    Ok(ApiResponse::ok(
        state.notification_service.update(&id, input).await?,
    ))
}

async fn delete_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.notification_service.delete(&id).await?;
    Ok(no_content())
}
