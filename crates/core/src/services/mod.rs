//! Business logic services.

#![allow(missing_docs)]

pub mod activity;
pub mod dashboard;
pub mod event;
pub mod finance;
pub mod grade;
pub mod notification;
pub mod seed;
pub mod staff;
pub mod student;

pub use activity::{
    ActivityDetails, ActivityService, ActivitySummary, CreateActivityInput, JoinActivityInput,
    ParticipantView, UpdateActivityInput,
};
pub use dashboard::{DashboardService, DashboardStats, DashboardSummary};
pub use event::{CreateEventInput, EventDetails, EventService, UpdateEventInput, targets_grade};
pub use finance::{FinanceService, FinanceSummary, PaymentHistory, RecordPaymentInput};
pub use grade::{CreateGradeInput, GradeDetails, GradeService, GradeSummary, UpdateGradeInput};
pub use notification::{CreateNotificationInput, NotificationService, UpdateNotificationInput};
pub use seed::{SeedOptions, SeedReport, SeedService};
pub use staff::{CreateStaffInput, StaffFilter, StaffService, UpdateStaffInput};
pub use student::{
    CreateStudentInput, StudentFilter, StudentService, UpdateFeesInput, UpdateStudentInput,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use validator::ValidationError;

/// Number of students the `recent` filter returns.
pub const RECENT_STUDENTS: u64 = 10;

/// Number of notifications and events shown on the dashboard.
pub const DASHBOARD_LIST_LIMIT: u64 = 5;

/// Keeps an explicit `null` apart from an absent field: absent stays `None`,
/// `null` becomes `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("non_negative"));
    }
    Ok(())
}

fn positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::new(1, 2) {
        return Err(ValidationError::new("min_amount"));
    }
    Ok(())
}
