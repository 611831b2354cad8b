//! Grade endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::get,
};
use schooldesk_common::AppResult;
use schooldesk_core::{
    CreateGradeInput, GradeDetails, GradeSummary, StudentView, UpdateGradeInput,
};
use schooldesk_db::entities::grade;
use schooldesk_db::entities::student::RecordStatus;
use schooldesk_db::relations::DeleteSummary;
use serde::Deserialize;

use crate::{extractors::ValidatedJson, middleware::AppState, response::ApiResponse};

/// Create grade router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_grades).post(create_grade))
        .route(
            "/{id}",
            get(get_grade).put(update_grade).delete(delete_grade),
        )
        .route("/{id}/details", get(grade_details))
        .route("/{id}/students", get(grade_students))
}

/// Students-in-grade query.
#[derive(Debug, Deserialize)]
pub struct GradeStudentsQuery {
    pub status: Option<RecordStatus>,
}

/// Every grade with its enrollment figures, by name.
async fn list_grades(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<GradeSummary>>> {
    Ok(ApiResponse::ok(state.grade_service.stats().await?))
}

async fn create_grade(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateGradeInput>,
) -> AppResult<ApiResponse<grade::Model>> {
    Ok(ApiResponse::created(state.grade_service.create(input).await?))
}

async fn get_grade(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<GradeSummary>> {
    Ok(ApiResponse::ok(state.grade_service.summary(&id).await?))
}

async fn update_grade(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateGradeInput>,
) -> AppResult<ApiResponse<grade::Model>> {
    Ok(ApiResponse::ok(state.grade_service.update(&id, input).await?))
}

async fn delete_grade(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DeleteSummary>> {
    Ok(ApiResponse::ok(state.grade_service.delete(&id).await?))
}

async fn grade_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<GradeDetails>> {
    Ok(ApiResponse::ok(state.grade_service.details(&id).await?))
}

async fn grade_students(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<GradeStudentsQuery>,
) -> AppResult<ApiResponse<Vec<StudentView>>> {
    let students = state.student_service.in_grade(&id, query.status).await?;
    Ok(ApiResponse::ok(state.student_service.to_views(students).await?))
}
