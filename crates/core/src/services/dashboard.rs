//! Dashboard service.

use rust_decimal::Decimal;
use schooldesk_common::AppResult;
use schooldesk_db::entities::{event, notification};
use schooldesk_db::repositories::{
    EventRepository, FeeTotals, GradeRepository, NotificationRepository, StaffRepository,
    StudentRepository,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;

use super::DASHBOARD_LIST_LIMIT;
use crate::derived::{collection_percentage, outstanding_fees};

/// Everything the dashboard page shows.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_students: u64,
    pub total_staff: u64,
    pub total_grades: u64,
    pub total_fees_due: Decimal,
    pub total_fees_paid: Decimal,
    pub outstanding_fees: Decimal,
    pub collection_percentage: Decimal,
    pub recent_notifications: Vec<notification::Model>,
    pub upcoming_events: Vec<event::Model>,
}

/// Headline counts only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_students: u64,
    pub total_staff: u64,
    pub total_grades: u64,
    pub outstanding_fees: Decimal,
    pub total_notifications: u64,
}

/// Read-only aggregate views over every record type.
#[derive(Clone)]
pub struct DashboardService {
    student_repo: StudentRepository,
    staff_repo: StaffRepository,
    grade_repo: GradeRepository,
    notification_repo: NotificationRepository,
    event_repo: EventRepository,
}

impl DashboardService {
    /// Create a new dashboard service.
    #[must_use]
    pub const fn new(
        student_repo: StudentRepository,
        staff_repo: StaffRepository,
        grade_repo: GradeRepository,
        notification_repo: NotificationRepository,
        event_repo: EventRepository,
    ) -> Self {
        Self {
            student_repo,
            staff_repo,
            grade_repo,
            notification_repo,
            event_repo,
        }
    }

    /// Counts, fee totals, recent notifications and upcoming events as of `now`.
    pub async fn summary(&self, now: DateTimeWithTimeZone) -> AppResult<DashboardSummary> {
        let total_students = self.student_repo.count().await?;
        let total_staff = self.staff_repo.count().await?;
        let total_grades = self.grade_repo.count().await?;

        let rows = self.student_repo.fee_rows().await?;
        let totals = FeeTotals::sum(&rows);

        let recent_notifications = self
            .notification_repo
            .find_recent(DASHBOARD_LIST_LIMIT)
            .await?;
        let upcoming_events = self
            .event_repo
            .find_upcoming(now, DASHBOARD_LIST_LIMIT)
            .await?;

        Ok(DashboardSummary {
            total_students,
            total_staff,
            total_grades,
            total_fees_due: totals.due,
            total_fees_paid: totals.paid,
            outstanding_fees: outstanding_fees(&rows),
            collection_percentage: collection_percentage(&totals),
            recent_notifications,
            upcoming_events,
        })
    }

    /// Headline counts.
    pub async fn stats(&self) -> AppResult<DashboardStats> {
        Ok(DashboardStats {
            total_students: self.student_repo.count().await?,
            total_staff: self.staff_repo.count().await?,
            total_grades: self.grade_repo.count().await?,
            outstanding_fees: outstanding_fees(&self.student_repo.fee_rows().await?),
            total_notifications: self.notification_repo.count().await?,
        })
    }
}
