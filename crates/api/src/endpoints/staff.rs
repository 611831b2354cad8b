//! Staff endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::get,
};
use schooldesk_common::AppResult;
use schooldesk_core::{CreateStaffInput, StaffFilter, UpdateStaffInput};
use schooldesk_db::entities::staff;
use schooldesk_db::relations::DeleteSummary;
use serde::Deserialize;

use crate::{extractors::ValidatedJson, middleware::AppState, response::ApiResponse};

/// Create staff router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_staff).post(create_staff))
        .route(
            "/{id}",
            get(get_staff).put(update_staff).delete(delete_staff),
        )
}

/// List staff query. A search term takes precedence over the filter.
#[derive(Debug, Default, Deserialize)]
pub struct ListStaffQuery {
    pub filter: Option<String>,
    pub q: Option<String>,
}

async fn list_staff(
    State(state): State<AppState>,
    Query(query): Query<ListStaffQuery>,
) -> AppResult<ApiResponse<Vec<staff::Model>>> {
    let staff = if let Some(q) = query.q {
        state.staff_service.search(&q).await?
    } else {
        let filter: StaffFilter = query.filter.as_deref().unwrap_or_default().parse()?;
        state.staff_service.filter(filter).await?
    };

    Ok(ApiResponse::ok(staff))
}

async fn create_staff(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateStaffInput>,
) -> AppResult<ApiResponse<staff::Model>> {
    Ok(ApiResponse::created(state.staff_service.create(input).await?))
}

async fn get_staff(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<staff::Model>> {
    Ok(ApiResponse::ok(state.staff_service.get(&id).await?))
}

async fn update_staff(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateStaffInput>,
) -> AppResult<ApiResponse<staff::Model>> {
    Ok(ApiResponse::ok(state.staff_service.update(&id, input).await?))
}

async fn delete_staff(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DeleteSummary>> {
    Ok(ApiResponse::ok(state.staff_service.delete(&id).await?))
}
