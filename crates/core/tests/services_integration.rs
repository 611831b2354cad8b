//! Service integration tests against a migrated in-memory SQLite database.

#![allow(clippy::unwrap_used)]

use std::str::FromStr;
use std::sync::Arc;

use chrono::{Duration, FixedOffset, TimeZone, Utc};
use rust_decimal::Decimal;
use schooldesk_common::AppError;
use schooldesk_core::{
    ActivityService, CreateActivityInput, CreateEventInput, CreateGradeInput,
    CreateNotificationInput, CreateStaffInput, CreateStudentInput, DashboardService,
    EventService, FinanceService, GradeService, JoinActivityInput, NotificationService,
    PaymentStatus, RecordPaymentInput, SeedOptions, SeedService, StaffFilter, StaffService,
    StudentFilter, StudentService, UpdateFeesInput, UpdateEventInput,
};
use schooldesk_db::repositories::{
    ActivityRepository, EventRepository, FeePaymentRepository, GradeRepository,
    NotificationRepository, StaffRepository, StudentRepository,
};
use schooldesk_db::test_utils::TestDatabase;
use sea_orm::DatabaseConnection;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

struct Services {
    _db: TestDatabase,
    conn: Arc<DatabaseConnection>,
    grades: GradeService,
    students: StudentService,
    staff: StaffService,
    notifications: NotificationService,
    events: EventService,
    activities: ActivityService,
    finance: FinanceService,
    dashboard: DashboardService,
}

impl Services {
    async fn new() -> Self {
        let db = TestDatabase::new().await.unwrap();
        let conn = db.shared();

        let grade_repo = GradeRepository::new(conn.clone());
        let student_repo = StudentRepository::new(conn.clone());
        let staff_repo = StaffRepository::new(conn.clone());
        let notification_repo = NotificationRepository::new(conn.clone());
        let event_repo = EventRepository::new(conn.clone());
        let activity_repo = ActivityRepository::new(conn.clone());
        let payment_repo = FeePaymentRepository::new(conn.clone());

        Self {
            grades: GradeService::new(grade_repo.clone(), student_repo.clone()),
            students: StudentService::new(student_repo.clone(), grade_repo.clone()),
            staff: StaffService::new(staff_repo.clone()),
            notifications: NotificationService::new(notification_repo.clone(), grade_repo.clone()),
            events: EventService::new(event_repo.clone(), grade_repo.clone()),
            activities: ActivityService::new(activity_repo, student_repo.clone()),
            finance: FinanceService::new(student_repo.clone(), grade_repo.clone(), payment_repo),
            dashboard: DashboardService::new(
                student_repo,
                staff_repo,
                grade_repo,
                notification_repo,
                event_repo,
            ),
            _db: db,
            conn,
        }
    }

    async fn grade(&self, name: &str, capacity: i32) -> String {
        self.grades
            .create(CreateGradeInput {
                name: name.to_string(),
                description: None,
                capacity,
            })
            .await
            .unwrap()
            .id
    }

    async fn student(&self, name: &str, grade_id: &str, due: &str, paid: &str) -> String {
        let input: CreateStudentInput = serde_json::from_value(serde_json::json!({
            "name": name,
            "grade_id": grade_id,
            "fees_due": due,
            "fees_paid": paid,
        }))
        .unwrap();
        self.students.create(input).await.unwrap().id
    }
}

#[tokio::test]
async fn test_student_filters() {
    let s = Services::new().await;
    let grade = s.grade("Grade 5", 30).await;

    s.student("Paid Up", &grade, "500.00", "500.00").await;
    s.student("Owes Little", &grade, "500.00", "450.00").await;
    s.student("Owes Lots", &grade, "500.00", "0.00").await;

    let outstanding = s.students.filter(StudentFilter::Outstanding).await.unwrap();
    let names: Vec<_> = outstanding.iter().map(|st| st.name.as_str()).collect();
    assert_eq!(names, ["Owes Little", "Owes Lots"]);

    let paid = s.students.filter(StudentFilter::Paid).await.unwrap();
    assert_eq!(paid.len(), 1);
    assert_eq!(paid[0].name, "Paid Up");

    let views = s.students.to_views(outstanding).await.unwrap();
    assert_eq!(views[0].payment_status, PaymentStatus::Outstanding);
    assert_eq!(views[1].payment_status, PaymentStatus::Overdue);
    assert_eq!(views[1].grade_name.as_deref(), Some("Grade 5"));

    let recent = s.students.filter(StudentFilter::Recent).await.unwrap();
    assert_eq!(recent.len(), 3);
}

#[tokio::test]
async fn test_student_ids_are_sequential() {
    let s = Services::new().await;
    let grade = s.grade("Grade 1", 30).await;

    let first = s.student("A", &grade, "0", "0").await;
    let second = s.student("B", &grade, "0", "0").await;

    assert_eq!(s.students.get(&first).await.unwrap().student_id, "STU-0001");
    assert_eq!(s.students.get(&second).await.unwrap().student_id, "STU-0002");
}

#[tokio::test]
async fn test_grade_over_enrollment_is_allowed() {
    let s = Services::new().await;
    let grade = s.grade("Grade 2", 2).await;

    for name in ["A", "B", "C"] {
        s.student(name, &grade, "0", "0").await;
    }

    let summary = s.grades.summary(&grade).await.unwrap();
    assert_eq!(summary.student_count, 3);
    assert_eq!(summary.available_spots, -1);

    let details = s.grades.details(&grade).await.unwrap();
    assert_eq!(details.students.len(), 3);
    assert_eq!(details.students[0].grade_name.as_deref(), Some("Grade 2"));
}

#[tokio::test]
async fn test_update_fees_changes_status() {
    let s = Services::new().await;
    let grade = s.grade("Grade 3", 30).await;
    let id = s.student("Amina", &grade, "500.00", "0.00").await;

    assert_eq!(
        s.students.view(&id).await.unwrap().payment_status,
        PaymentStatus::Overdue
    );

    s.students
        .update_fees(
            &id,
            UpdateFeesInput {
                fees_due: None,
                fees_paid: Some(dec("500.00")),
            },
        )
        .await
        .unwrap();

    let view = s.students.view(&id).await.unwrap();
    assert_eq!(view.balance, dec("0.00"));
    assert_eq!(view.payment_status, PaymentStatus::Paid);
}

#[tokio::test]
async fn test_payments_do_not_touch_fees_paid() {
    let s = Services::new().await;
    let grade = s.grade("Grade 4", 30).await;
    let id = s.student("Bilal", &grade, "800.00", "200.00").await;

    let input: RecordPaymentInput = serde_json::from_value(serde_json::json!({
        "amount": "150.00",
        "payment_method": "bank_transfer",
        "reference_number": "TX-1",
    }))
    .unwrap();
    let payment = s.finance.record_payment(&id, input).await.unwrap();

    let history = s.finance.payment_history(&id).await.unwrap();
    assert_eq!(history.payments.len(), 1);
    assert_eq!(history.payments[0].id, payment.id);
    assert_eq!(history.total_paid, dec("200.00"));
    assert_eq!(history.balance, dec("600.00"));

    s.finance.delete_payment(&payment.id).await.unwrap();
    assert!(matches!(
        s.finance.delete_payment(&payment.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_record_payment_for_missing_student() {
    let s = Services::new().await;
    let input: RecordPaymentInput = serde_json::from_str(r#"{"amount": "10"}"#).unwrap();

    let result = s.finance.record_payment("missing", input).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_finance_summary_by_grade() {
    let s = Services::new().await;
    let g1 = s.grade("Grade 1", 30).await;
    let g2 = s.grade("Grade 2", 30).await;

    s.student("A", &g1, "500.00", "450.00").await;
    s.student("B", &g1, "100.00", "300.00").await;
    s.student("C", &g2, "400.00", "100.00").await;

    let summary = s.finance.summary().await.unwrap();

    assert_eq!(summary.total_fees_due, dec("1000.00"));
    assert_eq!(summary.total_fees_paid, dec("850.00"));
    assert_eq!(summary.outstanding_fees, dec("350.00"));
    assert_eq!(summary.collection_percentage, dec("85.00"));
    assert_eq!(summary.outstanding_by_grade["Grade 1"], dec("50.00"));
    assert_eq!(summary.outstanding_by_grade["Grade 2"], dec("300.00"));
}

#[tokio::test]
async fn test_staff_filter_and_search() {
    let s = Services::new().await;

    for (name, role) in [
        ("Grace Hopper", "Teacher"),
        ("Alan Turing", "Teacher"),
        ("Ada Lovelace", "Admin"),
        ("Edsger Dijkstra", "Vice Principal"),
    ] {
        let input: CreateStaffInput =
            serde_json::from_value(serde_json::json!({ "name": name, "role": role })).unwrap();
        s.staff.create(input).await.unwrap();
    }

    assert_eq!(s.staff.filter(StaffFilter::Teachers).await.unwrap().len(), 2);
    assert_eq!(s.staff.filter(StaffFilter::Admin).await.unwrap().len(), 1);
    assert_eq!(s.staff.filter(StaffFilter::Support).await.unwrap().len(), 0);
    assert_eq!(s.staff.filter(StaffFilter::All).await.unwrap().len(), 4);

    let found = s.staff.search("principal").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Edsger Dijkstra");
    assert_eq!(found[0].staff_id, "STF-0004");
}

#[tokio::test]
async fn test_activity_membership() {
    let s = Services::new().await;
    let grade = s.grade("Grade 6", 30).await;
    let a = s.student("A", &grade, "0", "0").await;
    let b = s.student("B", &grade, "0", "0").await;

    let input: CreateActivityInput = serde_json::from_value(serde_json::json!({
        "title": "Debate Team",
        "activity_type": "academic",
        "max_participants": 1,
    }))
    .unwrap();
    let activity = s.activities.create(input).await.unwrap();

    for student_id in [&a, &b] {
        s.activities
            .join(
                &activity.id,
                JoinActivityInput {
                    student_id: student_id.clone(),
                },
            )
            .await
            .unwrap();
    }

    let duplicate = s
        .activities
        .join(&activity.id, JoinActivityInput { student_id: a.clone() })
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let summary = s.activities.summary(&activity.id).await.unwrap();
    assert_eq!(summary.active_participants, 2);
    assert_eq!(summary.available_spots, -1);

    s.activities
        .set_participant_active(&activity.id, &b, false)
        .await
        .unwrap();
    let details = s.activities.details(&activity.id).await.unwrap();
    assert_eq!(details.participant_count, 2);
    assert_eq!(details.summary.active_participants, 1);
    assert_eq!(details.summary.available_spots, 0);
    assert!(details.participants.iter().any(|p| p.student_name.as_deref() == Some("A")));

    s.activities.leave(&activity.id, &a).await.unwrap();
    assert!(matches!(
        s.activities.leave(&activity.id, &a).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_event_targets() {
    let s = Services::new().await;
    let g1 = s.grade("Grade 1", 30).await;
    let g2 = s.grade("Grade 2", 30).await;

    let input: CreateEventInput = serde_json::from_value(serde_json::json!({
        "title": "Sports Day",
        "event_type": "sports",
        "start_date": (Utc::now() + Duration::days(3)).to_rfc3339(),
    }))
    .unwrap();
    let event = s.events.create(input).await.unwrap();

    assert!(s.events.is_for_grade(&event.id, &g1).await.unwrap());

    s.events
        .update(
            &event.id,
            UpdateEventInput {
                target_grade_ids: Some(vec![g2.clone()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(!s.events.is_for_grade(&event.id, &g1).await.unwrap());
    assert!(s.events.is_for_grade(&event.id, &g2).await.unwrap());

    let details = s.events.details(&event.id).await.unwrap();
    assert_eq!(details.target_grades.len(), 1);
    assert_eq!(details.target_grades[0].name, "Grade 2");

    let upcoming = s.events.upcoming(Utc::now().into(), 5).await.unwrap();
    assert_eq!(upcoming.len(), 1);
}

#[tokio::test]
async fn test_upcoming_events_compare_instants_across_offsets() {
    let s = Services::new().await;
    let east = FixedOffset::east_opt(5 * 3600).unwrap();
    let west = FixedOffset::west_opt(5 * 3600).unwrap();

    // As text, "+05:00" local time sorts after the "-05:00" one.
    let past: CreateEventInput = serde_json::from_value(serde_json::json!({
        "title": "Morning Assembly",
        "start_date": (Utc::now() - Duration::hours(2)).with_timezone(&east).to_rfc3339(),
    }))
    .unwrap();
    s.events.create(past).await.unwrap();

    let future: CreateEventInput = serde_json::from_value(serde_json::json!({
        "title": "Parent Evening",
        "start_date": (Utc::now() + Duration::hours(2)).with_timezone(&west).to_rfc3339(),
    }))
    .unwrap();
    let future = s.events.create(future).await.unwrap();
    assert_eq!(future.start_date.unwrap().offset().local_minus_utc(), 0);

    let now = Utc::now().with_timezone(&east).fixed_offset();
    let upcoming = s.events.upcoming(now, 5).await.unwrap();
    let titles: Vec<_> = upcoming.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["Parent Evening"]);

    let summary = s.dashboard.summary(Utc::now().into()).await.unwrap();
    assert_eq!(summary.upcoming_events.len(), 1);
    assert_eq!(summary.upcoming_events[0].id, future.id);
}

#[tokio::test]
async fn test_event_update_stores_utc() {
    let s = Services::new().await;
    let input: CreateEventInput = serde_json::from_value(serde_json::json!({
        "title": "Science Fair",
    }))
    .unwrap();
    let event = s.events.create(input).await.unwrap();

    let local = FixedOffset::east_opt(9 * 3600)
        .unwrap()
        .with_ymd_and_hms(2030, 3, 1, 8, 0, 0)
        .unwrap();
    let updated = s
        .events
        .update(
            &event.id,
            UpdateEventInput {
                start_date: Some(Some(local)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let stored = updated.start_date.unwrap();
    assert_eq!(stored, local);
    assert_eq!(stored.to_rfc3339(), "2030-02-28T23:00:00+00:00");
}

#[tokio::test]
async fn test_grade_delete_detaches_notifications() {
    let s = Services::new().await;
    let grade = s.grade("Grade 9", 35).await;
    s.student("A", &grade, "0", "0").await;

    let input: CreateNotificationInput = serde_json::from_value(serde_json::json!({
        "message": "Grade 9 field trip forms are due",
        "target_audience": "grade_specific",
        "target_grade_id": grade,
    }))
    .unwrap();
    let notification = s.notifications.create(input).await.unwrap();

    let summary = s.grades.delete(&grade).await.unwrap();
    assert_eq!(summary.deleted, 2);
    assert_eq!(summary.detached, 1);

    let notification = s.notifications.get(&notification.id).await.unwrap();
    assert!(notification.target_grade_id.is_none());
}

#[tokio::test]
async fn test_dashboard_summary() {
    let s = Services::new().await;
    let grade = s.grade("Grade 10", 35).await;
    s.student("A", &grade, "1000.00", "250.00").await;

    for i in 0..7 {
        let input: CreateNotificationInput = serde_json::from_value(serde_json::json!({
            "title": format!("Notice {i}"),
            "message": "Reminder",
        }))
        .unwrap();
        s.notifications.create(input).await.unwrap();
    }

    let past: CreateEventInput = serde_json::from_value(serde_json::json!({
        "title": "Past",
        "start_date": (Utc::now() - Duration::days(1)).to_rfc3339(),
    }))
    .unwrap();
    s.events.create(past).await.unwrap();

    let summary = s.dashboard.summary(Utc::now().into()).await.unwrap();

    assert_eq!(summary.total_students, 1);
    assert_eq!(summary.total_grades, 1);
    assert_eq!(summary.total_staff, 0);
    assert_eq!(summary.outstanding_fees, dec("750.00"));
    assert_eq!(summary.collection_percentage, dec("25.00"));
    assert_eq!(summary.recent_notifications.len(), 5);
    assert!(summary.upcoming_events.is_empty());

    let stats = s.dashboard.stats().await.unwrap();
    assert_eq!(stats.total_notifications, 7);
}

#[tokio::test]
async fn test_seed_is_reproducible_and_reuses_grades() {
    let s = Services::new().await;
    let seeder = SeedService::new(s.conn.clone());
    let options = SeedOptions {
        students: 20,
        staff: 6,
        clear: false,
        rng_seed: Some(42),
    };

    let report = seeder.run(&options).await.unwrap();
    assert_eq!(report.grades, 13);
    assert_eq!(report.students, 20);
    assert_eq!(report.staff, 6);
    assert_eq!(report.notifications, 6);
    assert_eq!(report.events, 6);
    assert_eq!(report.activities, 8);

    let students = s.students.list().await.unwrap();
    assert_eq!(students.len(), 20);
    assert!(students.iter().all(|st| st.fees_paid <= st.fees_due));
    assert!(students.iter().any(|st| st.student_id == "STU-0020"));

    let again = seeder.run(&options).await.unwrap();
    assert_eq!(again.grades, 0);
    assert_eq!(s.grades.list().await.unwrap().len(), 13);

    let cleared = seeder
        .run(&SeedOptions {
            clear: true,
            ..options
        })
        .await
        .unwrap();
    assert_eq!(cleared.grades, 13);
    assert_eq!(s.students.list().await.unwrap().len(), 20);
}

#[tokio::test]
async fn test_clear_restarts_identifier_sequences() {
    let s = Services::new().await;
    let grade = s.grade("Grade 4", 30).await;
    for name in ["A", "B", "C"] {
        s.student(name, &grade, "0", "0").await;
    }

    SeedService::new(s.conn.clone()).clear().await.unwrap();

    let grade = s.grade("Grade 4", 30).await;
    let id = s.student("D", &grade, "0", "0").await;
    let student = s.students.get(&id).await.unwrap();
    assert_eq!(student.student_id, "STU-0001");
}
