//! HTTP API layer for schooldesk.
//!
//! This crate exposes the domain services as a JSON API:
//!
//! - **Endpoints**: grades, students, staff, notifications, events,
//!   activities, payments, finance and the dashboard
//! - **Extractors**: validated JSON bodies
//! - **State**: the services shared by every handler
//!
//! Built on Axum 0.8. Successful bodies are wrapped as `{"data": ...}`;
//! errors render as `{"error": {"code", "message"}}`.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
