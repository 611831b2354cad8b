//! Student endpoints, fee updates and payment history.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use schooldesk_common::AppResult;
use schooldesk_core::{
    CreateStudentInput, PaymentHistory, RecordPaymentInput, StudentFilter, StudentView,
    UpdateFeesInput, UpdateStudentInput,
};
use schooldesk_db::entities::fee_payment;
use schooldesk_db::relations::DeleteSummary;
use serde::Deserialize;

use crate::{extractors::ValidatedJson, middleware::AppState, response::ApiResponse};

/// Create student router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route(
            "/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/{id}/fees", put(update_fees))
        .route("/{id}/payments", get(payment_history).post(record_payment))
}

/// List students query. A search term takes precedence over the filter.
#[derive(Debug, Default, Deserialize)]
pub struct ListStudentsQuery {
    pub filter: Option<String>,
    pub q: Option<String>,
}

async fn list_students(
    State(state): State<AppState>,
    Query(query): Query<ListStudentsQuery>,
) -> AppResult<ApiResponse<Vec<StudentView>>> {
    let students = match (query.q, query.filter) {
        (Some(q), _) => state.student_service.search(&q).await?,
        (None, Some(filter)) => {
            let filter: StudentFilter = filter.parse()?;
            state.student_service.filter(filter).await?
        }
        (None, None) => state.student_service.list().await?,
    };

    Ok(ApiResponse::ok(state.student_service.to_views(students).await?))
}

async fn create_student(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateStudentInput>,
) -> AppResult<ApiResponse<StudentView>> {
    let student = state.student_service.create(input).await?;
    Ok(ApiResponse::created(state.student_service.view(&student.id).await?))
}

async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<StudentView>> {
    Ok(ApiResponse::ok(state.student_service.view(&id).await?))
}

async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateStudentInput>,
) -> AppResult<ApiResponse<StudentView>> {
    state.student_service.update(&id, input).await?;
    Ok(ApiResponse::ok(state.student_service.view(&id).await?))
}

async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DeleteSummary>> {
    Ok(ApiResponse::ok(state.student_service.delete(&id).await?))
}

async fn update_fees(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateFeesInput>,
) -> AppResult<ApiResponse<StudentView>> {
    state.student_service.update_fees(&id, input).await?;
    Ok(ApiResponse::ok(state.student_service.view(&id).await?))
}

async fn payment_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PaymentHistory>> {
    Ok(ApiResponse::ok(state.finance_service.payment_history(&id).await?))
}

async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<RecordPaymentInput>,
) -> AppResult<ApiResponse<fee_payment::Model>> {
    Ok(ApiResponse::created(
        state.finance_service.record_payment(&id, input).await?,
    ))
}
