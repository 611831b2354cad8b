//! Database integration tests.
//!
//! These run against an in-memory SQLite database with every migration
//! applied. Set `TEST_DATABASE_URL` to run them against another database.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use schooldesk_common::AppError;
use schooldesk_common::id::{IdGenerator, IdentifierKind};
use schooldesk_db::entities::{
    activity, activity_participant, event, fee_payment, grade, notification, staff, student,
};
use schooldesk_db::repositories::{
    ActivityRepository, EventRepository, FeePaymentRepository, GradeRepository,
    NotificationRepository, StaffRepository, StudentRepository, id_sequence,
};
use schooldesk_db::test_utils::TestDatabase;
use sea_orm::{DatabaseConnection, Set};

struct Fixture {
    _db: TestDatabase,
    conn: Arc<DatabaseConnection>,
    ids: IdGenerator,
}

impl Fixture {
    async fn new() -> Self {
        let db = TestDatabase::new().await.unwrap();
        let conn = db.shared();
        Self {
            _db: db,
            conn,
            ids: IdGenerator::new(),
        }
    }

    fn grades(&self) -> GradeRepository {
        GradeRepository::new(self.conn.clone())
    }

    fn students(&self) -> StudentRepository {
        StudentRepository::new(self.conn.clone())
    }

    fn staff(&self) -> StaffRepository {
        StaffRepository::new(self.conn.clone())
    }

    async fn grade(&self, name: &str, capacity: i32) -> grade::Model {
        self.grades()
            .create(grade::ActiveModel {
                id: Set(self.ids.generate()),
                name: Set(name.to_string()),
                description: Set(None),
                capacity: Set(capacity),
                created_at: Set(Utc::now().into()),
                updated_at: Set(None),
            })
            .await
            .unwrap()
    }

    fn student_model(&self, name: &str, grade_id: &str, due: i64, paid: i64) -> student::ActiveModel {
        student::ActiveModel {
            id: Set(self.ids.generate()),
            name: Set(name.to_string()),
            grade_id: Set(grade_id.to_string()),
            fees_due: Set(Decimal::new(due, 2)),
            fees_paid: Set(Decimal::new(paid, 2)),
            status: Set(student::RecordStatus::Active),
            enrolled_on: Set(Utc::now().date_naive()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
    }

    async fn student(&self, name: &str, grade_id: &str) -> student::Model {
        self.students()
            .create(self.student_model(name, grade_id, 0, 0))
            .await
            .unwrap()
    }

    async fn staff_member(&self, name: &str) -> staff::Model {
        self.staff()
            .create(staff::ActiveModel {
                id: Set(self.ids.generate()),
                name: Set(name.to_string()),
                role: Set(staff::StaffRole::Teacher),
                date_joined: Set(Utc::now().date_naive()),
                status: Set(staff::RecordStatus::Active),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            })
            .await
            .unwrap()
    }
}

// ==================== Identifier Sequence ====================

#[tokio::test]
async fn test_student_ids_are_sequential() {
    let fx = Fixture::new().await;
    let grade = fx.grade("Grade 1", 30).await;

    let mut assigned = Vec::new();
    for i in 0..10 {
        assigned.push(fx.student(&format!("Student {i}"), &grade.id).await.student_id);
    }

    assert_eq!(assigned[0], "STU-0001");
    assert_eq!(assigned[1], "STU-0002");
    assert_eq!(assigned[9], "STU-0010");
}

#[tokio::test]
async fn test_staff_ids_use_their_own_sequence() {
    let fx = Fixture::new().await;
    let grade = fx.grade("Grade 2", 30).await;

    fx.student("Amina", &grade.id).await;
    let first = fx.staff_member("Grace").await;
    let second = fx.staff_member("Alan").await;

    assert_eq!(first.staff_id, "STF-0001");
    assert_eq!(second.staff_id, "STF-0002");
}

#[tokio::test]
async fn test_malformed_last_identifier_restarts_sequence() {
    let fx = Fixture::new().await;
    let grade = fx.grade("Grade 3", 30).await;

    let mut legacy = fx.student_model("Legacy", &grade.id, 0, 0);
    legacy.student_id = Set("STU0042".to_string());
    fx.students().create(legacy).await.unwrap();

    let next = fx.student("Fresh", &grade.id).await;
    assert_eq!(next.student_id, "STU-0001");
}

#[tokio::test]
async fn test_sequence_seeded_from_last_record() {
    let fx = Fixture::new().await;
    let grade = fx.grade("Grade 4", 30).await;

    let mut imported = fx.student_model("Imported", &grade.id, 0, 0);
    imported.student_id = Set("STU-0041".to_string());
    fx.students().create(imported).await.unwrap();

    let next = fx.student("Fresh", &grade.id).await;
    assert_eq!(next.student_id, "STU-0042");
    assert_eq!(
        id_sequence::current(fx.conn.as_ref(), IdentifierKind::Student)
            .await
            .unwrap(),
        Some(42)
    );
}

#[tokio::test]
async fn test_supplied_identifier_does_not_advance_sequence() {
    let fx = Fixture::new().await;
    let grade = fx.grade("Grade 5", 30).await;

    fx.student("First", &grade.id).await;
    let mut manual = fx.student_model("Manual", &grade.id, 0, 0);
    manual.student_id = Set("STU-0500".to_string());
    fx.students().create(manual).await.unwrap();

    let next = fx.student("Next", &grade.id).await;
    assert_eq!(next.student_id, "STU-0002");
}

// ==================== Uniqueness ====================

#[tokio::test]
async fn test_duplicate_student_id_is_conflict() {
    let fx = Fixture::new().await;
    let grade = fx.grade("Grade 6", 30).await;
    let first = fx.student("First", &grade.id).await;

    let mut duplicate = fx.student_model("Second", &grade.id, 0, 0);
    duplicate.student_id = Set(first.student_id);
    let err = fx.students().create(duplicate).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)), "{err:?}");
    assert_eq!(fx.students().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_duplicate_grade_name_is_conflict() {
    let fx = Fixture::new().await;
    fx.grade("Kindergarten", 20).await;

    let err = fx
        .grades()
        .create(grade::ActiveModel {
            id: Set(fx.ids.generate()),
            name: Set("Kindergarten".to_string()),
            description: Set(None),
            capacity: Set(25),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)), "{err:?}");
}

#[tokio::test]
async fn test_duplicate_participant_is_conflict() {
    let fx = Fixture::new().await;
    let grade = fx.grade("Grade 7", 30).await;
    let student = fx.student("Chen", &grade.id).await;
    let activities = ActivityRepository::new(fx.conn.clone());

    let club = activities
        .create(activity::ActiveModel {
            id: Set(fx.ids.generate()),
            title: Set("Chess Club".to_string()),
            activity_type: Set(activity::ActivityType::Club),
            max_participants: Set(activity::DEFAULT_MAX_PARTICIPANTS),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let join = || activity_participant::ActiveModel {
        id: Set(fx.ids.generate()),
        activity_id: Set(club.id.clone()),
        student_id: Set(student.id.clone()),
        date_joined: Set(Utc::now().date_naive()),
        is_active: Set(true),
    };

    activities.add_participant(join()).await.unwrap();
    let err = activities.add_participant(join()).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)), "{err:?}");
    assert_eq!(activities.participant_count(&club.id).await.unwrap(), 1);
}

// ==================== Cascade and Nullify ====================

#[tokio::test]
async fn test_grade_delete_cascades() {
    let fx = Fixture::new().await;
    let grade = fx.grade("Grade 8", 30).await;
    let other = fx.grade("Grade 9", 30).await;
    let student = fx.student("Dana", &grade.id).await;
    let survivor = fx.student("Eli", &other.id).await;

    let payments = FeePaymentRepository::new(fx.conn.clone());
    payments
        .create(fee_payment::ActiveModel {
            id: Set(fx.ids.generate()),
            student_id: Set(student.id.clone()),
            amount: Set(Decimal::new(10_000, 2)),
            payment_method: Set(fee_payment::PaymentMethod::Cash),
            payment_date: Set(Utc::now().date_naive()),
            recorded_at: Set(Utc::now().into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let notifications = NotificationRepository::new(fx.conn.clone());
    let notice = notifications
        .create(notification::ActiveModel {
            id: Set(fx.ids.generate()),
            title: Set("Grade 8 trip".to_string()),
            message: Set("Bring packed lunch".to_string()),
            priority: Set(notification::Priority::Medium),
            target_audience: Set(notification::TargetAudience::GradeSpecific),
            target_grade_id: Set(Some(grade.id.clone())),
            is_active: Set(true),
            date_created: Set(Utc::now().into()),
            date: Set(Utc::now().date_naive()),
            created_by_id: Set(None),
        })
        .await
        .unwrap();

    let events = EventRepository::new(fx.conn.clone());
    let trip = events
        .create(
            event::ActiveModel {
                id: Set(fx.ids.generate()),
                title: Set("Museum visit".to_string()),
                event_type: Set(event::EventType::Academic),
                is_active: Set(true),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            },
            &[grade.id.clone(), other.id.clone()],
        )
        .await
        .unwrap();

    let summary = fx.grades().delete(&grade.id).await.unwrap();
    assert_eq!(summary.deleted, 4); // grade, student, payment, one target link
    assert_eq!(summary.detached, 1);

    assert!(fx.students().find_by_id(&student.id).await.unwrap().is_none());
    assert!(fx.students().find_by_id(&survivor.id).await.unwrap().is_some());
    assert!(payments.find_by_student(&student.id).await.unwrap().is_empty());

    let notice = notifications.get_by_id(&notice.id).await.unwrap();
    assert_eq!(notice.target_grade_id, None);

    let targets = events.find_target_grade_ids(&trip.id).await.unwrap();
    assert_eq!(targets, vec![other.id.clone()]);
}

#[tokio::test]
async fn test_student_delete_cascades_to_payments_and_memberships() {
    let fx = Fixture::new().await;
    let grade = fx.grade("Grade 10", 30).await;
    let student = fx.student("Farah", &grade.id).await;
    let activities = ActivityRepository::new(fx.conn.clone());
    let payments = FeePaymentRepository::new(fx.conn.clone());

    let band = activities
        .create(activity::ActiveModel {
            id: Set(fx.ids.generate()),
            title: Set("Band".to_string()),
            activity_type: Set(activity::ActivityType::Music),
            max_participants: Set(15),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        })
        .await
        .unwrap();
    activities
        .add_participant(activity_participant::ActiveModel {
            id: Set(fx.ids.generate()),
            activity_id: Set(band.id.clone()),
            student_id: Set(student.id.clone()),
            date_joined: Set(Utc::now().date_naive()),
            is_active: Set(true),
        })
        .await
        .unwrap();

    for amount in [5_000, 7_500] {
        payments
            .create(fee_payment::ActiveModel {
                id: Set(fx.ids.generate()),
                student_id: Set(student.id.clone()),
                amount: Set(Decimal::new(amount, 2)),
                payment_method: Set(fee_payment::PaymentMethod::Online),
                payment_date: Set(Utc::now().date_naive()),
                recorded_at: Set(Utc::now().into()),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    let summary = fx.students().delete(&student.id).await.unwrap();
    assert_eq!(summary.deleted, 4);

    assert_eq!(payments.count_by_student(&student.id).await.unwrap(), 0);
    assert_eq!(activities.participant_count(&band.id).await.unwrap(), 0);
    assert!(activities.find_by_id(&band.id).await.unwrap().is_some());
    assert!(fx.grades().find_by_id(&grade.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_activity_delete_cascades_to_memberships() {
    let fx = Fixture::new().await;
    let grade = fx.grade("Grade 6", 30).await;
    let ines = fx.student("Ines", &grade.id).await;
    let jon = fx.student("Jon", &grade.id).await;
    let activities = ActivityRepository::new(fx.conn.clone());

    let choir = activities
        .create(activity::ActiveModel {
            id: Set(fx.ids.generate()),
            title: Set("Choir".to_string()),
            activity_type: Set(activity::ActivityType::Music),
            max_participants: Set(20),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        })
        .await
        .unwrap();
    for student in [&ines, &jon] {
        activities
            .add_participant(activity_participant::ActiveModel {
                id: Set(fx.ids.generate()),
                activity_id: Set(choir.id.clone()),
                student_id: Set(student.id.clone()),
                date_joined: Set(Utc::now().date_naive()),
                is_active: Set(true),
            })
            .await
            .unwrap();
    }
    assert_eq!(activities.participant_count(&choir.id).await.unwrap(), 2);

    activities.delete(&choir.id).await.unwrap();

    assert!(activities.find_by_id(&choir.id).await.unwrap().is_none());
    assert_eq!(activities.participant_count(&choir.id).await.unwrap(), 0);
    assert!(fx.students().find_by_id(&ines.id).await.unwrap().is_some());
    assert!(fx.students().find_by_id(&jon.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_staff_delete_clears_references() {
    let fx = Fixture::new().await;
    let grade = fx.grade("Grade 11", 30).await;
    let student = fx.student("Gus", &grade.id).await;
    let teacher = fx.staff_member("Hana").await;

    let activities = ActivityRepository::new(fx.conn.clone());
    let club = activities
        .create(activity::ActiveModel {
            id: Set(fx.ids.generate()),
            title: Set("Robotics".to_string()),
            activity_type: Set(activity::ActivityType::Academic),
            instructor_id: Set(Some(teacher.id.clone())),
            max_participants: Set(12),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let payments = FeePaymentRepository::new(fx.conn.clone());
    let payment = payments
        .create(fee_payment::ActiveModel {
            id: Set(fx.ids.generate()),
            student_id: Set(student.id.clone()),
            amount: Set(Decimal::new(2_500, 2)),
            payment_method: Set(fee_payment::PaymentMethod::Card),
            payment_date: Set(Utc::now().date_naive()),
            recorded_at: Set(Utc::now().into()),
            recorded_by_id: Set(Some(teacher.id.clone())),
            ..Default::default()
        })
        .await
        .unwrap();

    let events = EventRepository::new(fx.conn.clone());
    let meeting = events
        .create(
            event::ActiveModel {
                id: Set(fx.ids.generate()),
                title: Set("Staff meeting".to_string()),
                event_type: Set(event::EventType::Meeting),
                is_active: Set(true),
                created_at: Set(Utc::now().into()),
                created_by_id: Set(Some(teacher.id.clone())),
                ..Default::default()
            },
            &[],
        )
        .await
        .unwrap();

    let summary = fx.staff().delete(&teacher.id).await.unwrap();
    assert_eq!(summary.deleted, 1);
    assert_eq!(summary.detached, 3);

    assert_eq!(activities.get_by_id(&club.id).await.unwrap().instructor_id, None);
    assert_eq!(
        payments
            .find_by_id(&payment.id)
            .await
            .unwrap()
            .unwrap()
            .recorded_by_id,
        None
    );
    assert_eq!(events.get_by_id(&meeting.id).await.unwrap().created_by_id, None);
}

#[tokio::test]
async fn test_delete_missing_grade_is_not_found() {
    let fx = Fixture::new().await;
    let err = fx.grades().delete("missing").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

// ==================== Queries ====================

#[tokio::test]
async fn test_grade_student_counts() {
    let fx = Fixture::new().await;
    let grade = fx.grade("Grade 12", 30).await;
    let empty = fx.grade("Kindergarten", 20).await;

    for i in 0..28 {
        fx.student(&format!("Student {i:02}"), &grade.id).await;
    }

    assert_eq!(fx.grades().student_count(&grade.id).await.unwrap(), 28);

    let counts = fx.grades().student_counts().await.unwrap();
    assert_eq!(counts.get(&grade.id), Some(&28));
    assert_eq!(counts.get(&empty.id), None);
}

#[tokio::test]
async fn test_search_is_case_insensitive_over_grade_name() {
    let fx = Fixture::new().await;
    let grade = fx.grade("Grade 1", 30).await;
    let other = fx.grade("Kindergarten", 20).await;
    fx.student("Ivy Mwangi", &grade.id).await;
    fx.student("Jon Snow", &other.id).await;

    let by_name = fx.students().search("MWANGI").await.unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].name, "Ivy Mwangi");

    let by_grade = fx.students().search("kinder").await.unwrap();
    assert_eq!(by_grade.len(), 1);
    assert_eq!(by_grade[0].name, "Jon Snow");

    assert!(fx.students().search("100%").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fee_filters_and_totals() {
    let fx = Fixture::new().await;
    let grade = fx.grade("Grade 2", 30).await;
    let students = fx.students();

    students
        .create(fx.student_model("Paid", &grade.id, 50_000, 50_000))
        .await
        .unwrap();
    students
        .create(fx.student_model("Owes", &grade.id, 50_000, 45_000))
        .await
        .unwrap();
    students
        .create(fx.student_model("Overpaid", &grade.id, 10_000, 12_000))
        .await
        .unwrap();

    let outstanding = students.find_outstanding().await.unwrap();
    assert_eq!(outstanding.len(), 1);
    assert_eq!(outstanding[0].name, "Owes");

    let paid: Vec<_> = students
        .find_paid()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(paid, vec!["Overpaid".to_string(), "Paid".to_string()]);

    let totals = students.fee_totals().await.unwrap();
    assert_eq!(totals.due, Decimal::new(110_000, 2));
    assert_eq!(totals.paid, Decimal::new(107_000, 2));
}

#[tokio::test]
async fn test_recent_students_by_enrollment() {
    let fx = Fixture::new().await;
    let grade = fx.grade("Grade 3", 30).await;
    let students = fx.students();

    for (name, day) in [("Old", 1), ("Newest", 20), ("Middle", 10)] {
        let mut model = fx.student_model(name, &grade.id, 0, 0);
        model.enrolled_on = Set(NaiveDate::from_ymd_opt(2024, 9, day).unwrap());
        students.create(model).await.unwrap();
    }

    let recent: Vec<_> = students
        .find_recent(2)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(recent, vec!["Newest".to_string(), "Middle".to_string()]);
}

#[tokio::test]
async fn test_event_targets_replaced_on_update() {
    let fx = Fixture::new().await;
    let g1 = fx.grade("Grade 4", 30).await;
    let g2 = fx.grade("Grade 5", 30).await;
    let events = EventRepository::new(fx.conn.clone());

    let fair = events
        .create(
            event::ActiveModel {
                id: Set(fx.ids.generate()),
                title: Set("Science fair".to_string()),
                event_type: Set(event::EventType::Academic),
                start_date: Set(Some((Utc::now() + Duration::days(3)).into())),
                is_active: Set(true),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            },
            &[g1.id.clone()],
        )
        .await
        .unwrap();

    let mut active: event::ActiveModel = fair.clone().into();
    active.location = Set(Some("Hall".to_string()));
    events
        .update(active, Some([g2.id.clone(), g2.id.clone()].as_slice()))
        .await
        .unwrap();

    assert_eq!(
        events.find_target_grade_ids(&fair.id).await.unwrap(),
        vec![g2.id.clone()]
    );

    let upcoming = events.find_upcoming(Utc::now().into(), 5).await.unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].location.as_deref(), Some("Hall"));
}
