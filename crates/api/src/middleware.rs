//! Application state shared by every handler.

#![allow(missing_docs)]

use std::sync::Arc;

use schooldesk_core::{
    ActivityService, DashboardService, EventService, FinanceService, GradeService,
    NotificationService, StaffService, StudentService,
};
use schooldesk_db::repositories::{
    ActivityRepository, EventRepository, FeePaymentRepository, GradeRepository,
    NotificationRepository, StaffRepository, StudentRepository,
};
use sea_orm::DatabaseConnection;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub grade_service: GradeService,
    pub student_service: StudentService,
    pub staff_service: StaffService,
    pub notification_service: NotificationService,
    pub event_service: EventService,
    pub activity_service: ActivityService,
    pub finance_service: FinanceService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    /// Build every service over one shared connection.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        let grade_repo = GradeRepository::new(Arc::clone(&db));
        let student_repo = StudentRepository::new(Arc::clone(&db));
        let staff_repo = StaffRepository::new(Arc::clone(&db));
        let notification_repo = NotificationRepository::new(Arc::clone(&db));
        let event_repo = EventRepository::new(Arc::clone(&db));
        let activity_repo = ActivityRepository::new(Arc::clone(&db));
        let payment_repo = FeePaymentRepository::new(db);

        Self {
            grade_service: GradeService::new(grade_repo.clone(), student_repo.clone()),
            student_service: StudentService::new(student_repo.clone(), grade_repo.clone()),
            staff_service: StaffService::new(staff_repo.clone()),
            notification_service: NotificationService::new(
                notification_repo.clone(),
                grade_repo.clone(),
            ),
            event_service: EventService::new(event_repo.clone(), grade_repo.clone()),
            activity_service: ActivityService::new(activity_repo, student_repo.clone()),
            finance_service: FinanceService::new(
                student_repo.clone(),
                grade_repo.clone(),
                payment_repo,
            ),
            dashboard_service: DashboardService::new(
                student_repo,
                staff_repo,
                grade_repo,
                notification_repo,
                event_repo,
            ),
        }
    }
}
