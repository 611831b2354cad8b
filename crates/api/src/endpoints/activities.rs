//! Activity and participant endpoints.

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, put},
};
use schooldesk_common::AppResult;
use schooldesk_core::{
    ActivityDetails, ActivitySummary, CreateActivityInput, JoinActivityInput, ParticipantView,
    UpdateActivityInput,
};
use schooldesk_db::entities::{activity, activity_participant};
use serde::Deserialize;
use validator::Validate;

use crate::{
    extractors::ValidatedJson,
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Create activity router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_activities).post(create_activity))
        .route(
            "/{id}",
            get(get_activity).put(update_activity).delete(delete_activity),
        )
        .route(
            "/{id}/participants",
            get(list_participants).post(join_activity),
        )
        .route(
            "/{id}/participants/{student_id}",
            put(set_participant_active).delete(leave_activity),
        )
}

/// Participant flag update.
#[derive(Debug, Deserialize, Validate)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

async fn list_activities(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ActivitySummary>>> {
    Ok(ApiResponse::ok(state.activity_service.list().await?))
}

async fn create_activity(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateActivityInput>,
) -> AppResult<ApiResponse<activity::Model>> {
    Ok(ApiResponse::created(state.activity_service.create(input).await?))
}

async fn get_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ActivityDetails>> {
    Ok(ApiResponse::ok(state.activity_service.details(&id).await?))
}

async fn update_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateActivityInput>,
) -> AppResult<ApiResponse<activity::Model>> {
    Ok(ApiResponse::ok(state.activity_service.update(&id, input).await?))
}

async fn delete_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.activity_service.delete(&id).await?;
    Ok(no_content())
}

async fn list_participants(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<ParticipantView>>> {
    state.activity_service.get(&id).await?;
    Ok(ApiResponse::ok(state.activity_service.participants(&id).await?))
}

async fn join_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<JoinActivityInput>,
) -> AppResult<ApiResponse<activity_participant::Model>> {
    Ok(ApiResponse::created(state.activity_service.join(&id, input).await?))
}

async fn set_participant_active(
    State(state): State<AppState>,
    Path((id, student_id)): Path<(String, String)>,
    ValidatedJson(request): ValidatedJson<SetActiveRequest>,
) -> AppResult<ApiResponse<activity_participant::Model>> {
    let participant = state
        .activity_service
        .set_participant_active(&id, &student_id, request.is_active)
        .await?;
    Ok(ApiResponse::ok(participant))
}

async fn leave_activity(
    State(state): State<AppState>,
    Path((id, student_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    state.activity_service.leave(&id, &student_id).await?;
    Ok(no_content())
}
