//! API endpoints.

mod activities;
mod dashboard;
mod events;
mod finance;
mod grades;
mod notifications;
mod payments;
mod staff;
mod students;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/dashboard", dashboard::router())
        .nest("/grades", grades::router())
        .nest("/students", students::router())
        .nest("/payments", payments::router())
        .nest("/staff", staff::router())
        .nest("/notifications", notifications::router())
        .nest("/events", events::router())
        .nest("/activities", activities::router())
        .nest("/finance", finance::router())
}
