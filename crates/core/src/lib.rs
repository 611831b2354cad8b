//! Core business logic for schooldesk.

pub mod derived;
pub mod services;

pub use derived::{OVERDUE_THRESHOLD, PaymentStatus, StudentView};
pub use services::*;
