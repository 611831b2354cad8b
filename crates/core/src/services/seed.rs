//! Demo data seeding.
//!
//! Fills an empty (or cleared) database with the standard grades, randomly
//! generated students and staff, and a fixed set of notifications, events and
//! activities. A fixed `rng_seed` makes the generated records reproducible.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use fake::Fake;
use fake::faker::address::en::{BuildingNumber, CityName, StreetName};
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Paragraph;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use schooldesk_common::config::SeedConfig;
use schooldesk_common::{AppError, AppResult, id::IdGenerator};
use schooldesk_db::entities::activity::ActivityType;
use schooldesk_db::entities::event::EventType;
use schooldesk_db::entities::notification::{Priority, TargetAudience};
use schooldesk_db::entities::staff::StaffRole;
use schooldesk_db::entities::student::{Gender, RecordStatus};
use schooldesk_db::entities::{activity, event, grade, notification, staff, student};
use schooldesk_db::repositories::{
    ActivityRepository, EventRepository, GradeRepository, NotificationRepository,
    StaffRepository, StudentRepository, id_sequence,
};
use sea_orm::{ActiveValue::NotSet, DatabaseConnection, Set};
use serde::Serialize;
use tracing::{debug, info};

/// The standard grades: name, description, capacity.
pub const STANDARD_GRADES: [(&str, &str, i32); 13] = [
    ("Kindergarten", "Foundation level education", 25),
    ("Grade 1", "First grade primary education", 30),
    ("Grade 2", "Second grade primary education", 30),
    ("Grade 3", "Third grade primary education", 30),
    ("Grade 4", "Fourth grade primary education", 30),
    ("Grade 5", "Fifth grade primary education", 30),
    ("Grade 6", "Sixth grade primary education", 30),
    ("Grade 7", "Seventh grade middle school", 35),
    ("Grade 8", "Eighth grade middle school", 35),
    ("Grade 9", "Ninth grade high school", 35),
    ("Grade 10", "Tenth grade high school", 35),
    ("Grade 11", "Eleventh grade high school", 40),
    ("Grade 12", "Twelfth grade high school", 40),
];

const STAFF_ROLES: [StaffRole; 7] = [
    StaffRole::Teacher,
    StaffRole::Teacher,
    StaffRole::Teacher,
    StaffRole::Admin,
    StaffRole::Support,
    StaffRole::Principal,
    StaffRole::VicePrincipal,
];

const DEPARTMENTS: [&str; 10] = [
    "Mathematics",
    "Science",
    "English",
    "History",
    "Physical Education",
    "Art",
    "Music",
    "Computer Science",
    "Administration",
    "Library",
];

const SUBJECTS: [&str; 10] = [
    "Mathematics, Algebra",
    "Physics, Chemistry",
    "English Literature, Grammar",
    "World History, Geography",
    "Physical Education, Sports",
    "Visual Arts, Crafts",
    "Music Theory, Choir",
    "Computer Programming, IT",
    "Biology, Environmental Science",
    "Foreign Languages, Cultural Studies",
];

const NOTIFICATIONS: [(&str, &str, Priority, TargetAudience); 6] = [
    (
        "Term End Examinations",
        "Final examinations for all grades will begin next Monday. Please ensure students are well prepared.",
        Priority::High,
        TargetAudience::All,
    ),
    (
        "PTA Meeting",
        "Parent-Teacher Association meeting scheduled for this Friday at 6 PM in the main auditorium.",
        Priority::Medium,
        TargetAudience::Parents,
    ),
    (
        "Library New Books",
        "New collection of science and literature books have arrived. Students can check them out starting tomorrow.",
        Priority::Low,
        TargetAudience::Students,
    ),
    (
        "Staff Development Workshop",
        "Professional development workshop on modern teaching methods this Saturday from 9 AM to 3 PM.",
        Priority::Medium,
        TargetAudience::Staff,
    ),
    (
        "School Closure Notice",
        "School will be closed on Monday due to maintenance work. All classes will resume on Tuesday.",
        Priority::Urgent,
        TargetAudience::All,
    ),
    (
        "Sports Day Preparation",
        "All students participating in Sports Day events should report to the sports ground for practice.",
        Priority::Medium,
        TargetAudience::Students,
    ),
];

const EVENTS: [(&str, &str, EventType, &str); 6] = [
    (
        "Annual Science Fair",
        "Students will showcase their science projects and innovations.",
        EventType::Academic,
        "Main Auditorium",
    ),
    (
        "Inter-School Basketball Tournament",
        "Basketball competition between local schools.",
        EventType::Sports,
        "School Gymnasium",
    ),
    (
        "Cultural Heritage Day",
        "Celebration of diverse cultures with performances and exhibitions.",
        EventType::Cultural,
        "School Courtyard",
    ),
    (
        "Parent-Teacher Conference",
        "Individual meetings between parents and teachers to discuss student progress.",
        EventType::Meeting,
        "Classrooms",
    ),
    (
        "End of Term Examinations",
        "Final examinations for all grade levels.",
        EventType::Exam,
        "Examination Halls",
    ),
    (
        "Graduation Ceremony",
        "Celebration ceremony for graduating students.",
        EventType::Academic,
        "Main Auditorium",
    ),
];

const ACTIVITIES: [(&str, &str, ActivityType, i32, &str); 8] = [
    (
        "Chess Club",
        "Weekly chess games and tournaments for strategy enthusiasts.",
        ActivityType::Club,
        20,
        "Wednesdays 3:00-4:00 PM",
    ),
    (
        "School Orchestra",
        "Musical ensemble practicing classical and contemporary pieces.",
        ActivityType::Music,
        30,
        "Tuesdays and Thursdays 3:30-5:00 PM",
    ),
    (
        "Drama Society",
        "Acting and theater production group for creative students.",
        ActivityType::Drama,
        25,
        "Mondays and Fridays 3:15-4:45 PM",
    ),
    (
        "Environmental Club",
        "Promoting environmental awareness and sustainability projects.",
        ActivityType::Volunteer,
        15,
        "Fridays 3:00-4:00 PM",
    ),
    (
        "Basketball Team",
        "Competitive basketball team representing the school.",
        ActivityType::Sport,
        15,
        "Daily 4:00-5:30 PM",
    ),
    (
        "Art & Crafts Workshop",
        "Creative arts and crafts sessions for artistic expression.",
        ActivityType::Arts,
        20,
        "Wednesdays 3:00-4:30 PM",
    ),
    (
        "Debate Team",
        "Competitive debating and public speaking training.",
        ActivityType::Academic,
        12,
        "Tuesdays 3:30-5:00 PM",
    ),
    (
        "Community Service",
        "Volunteer work in the local community and charity projects.",
        ActivityType::Volunteer,
        25,
        "Saturdays 9:00 AM-12:00 PM",
    ),
];

/// What to seed.
#[derive(Debug, Clone, Default)]
pub struct SeedOptions {
    pub students: u32,
    pub staff: u32,
    /// Remove existing records first.
    pub clear: bool,
    pub rng_seed: Option<u64>,
}

impl From<&SeedConfig> for SeedOptions {
    fn from(config: &SeedConfig) -> Self {
        Self {
            students: config.students,
            staff: config.staff,
            clear: config.clear,
            rng_seed: config.rng_seed,
        }
    }
}

/// Records created by a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// Grades that did not exist yet.
    pub grades: usize,
    pub students: usize,
    pub staff: usize,
    pub notifications: usize,
    pub events: usize,
    pub activities: usize,
}

/// School year of a standard grade name: 0 for Kindergarten, N for `Grade N`.
#[must_use]
pub fn grade_level(name: &str) -> Option<u32> {
    if name.contains("Kindergarten") {
        return Some(0);
    }
    name.strip_prefix("Grade ")
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|level| level.parse().ok())
}

fn truncate(value: String, max: usize) -> String {
    value.chars().take(max).collect()
}

fn days_ago(rng: &mut StdRng, today: NaiveDate, max_days: i64) -> NaiveDate {
    today - Duration::days(rng.gen_range(0..=max_days))
}

/// Seeds demo data through the regular repositories.
#[derive(Clone)]
pub struct SeedService {
    grade_repo: GradeRepository,
    student_repo: StudentRepository,
    staff_repo: StaffRepository,
    notification_repo: NotificationRepository,
    event_repo: EventRepository,
    activity_repo: ActivityRepository,
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl SeedService {
    /// Create a new seed service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            grade_repo: GradeRepository::new(db.clone()),
            student_repo: StudentRepository::new(db.clone()),
            staff_repo: StaffRepository::new(db.clone()),
            notification_repo: NotificationRepository::new(db.clone()),
            event_repo: EventRepository::new(db.clone()),
            activity_repo: ActivityRepository::new(db.clone()),
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Run a seeding pass.
    pub async fn run(&self, options: &SeedOptions) -> AppResult<SeedReport> {
        let mut rng = options
            .rng_seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        if options.clear {
            self.clear().await?;
        }

        let mut report = SeedReport::default();
        let (grades, created) = self.seed_grades().await?;
        report.grades = created;

        for _ in 0..options.students {
            let Some(grade) = grades.choose(&mut rng) else {
                break;
            };
            let model = self.student_model(&mut rng, grade);
            self.student_repo.create(model).await?;
            report.students += 1;
        }

        let mut staff = Vec::new();
        for _ in 0..options.staff {
            let model = self.staff_model(&mut rng);
            staff.push(self.staff_repo.create(model).await?);
        }
        report.staff = staff.len();

        report.notifications = self.seed_notifications(&mut rng, &staff).await?;
        report.events = self.seed_events(&mut rng, &grades, &staff).await?;
        report.activities = self.seed_activities(&mut rng, &staff).await?;

        info!(
            grades = report.grades,
            students = report.students,
            staff = report.staff,
            notifications = report.notifications,
            events = report.events,
            activities = report.activities,
            "Database seeding complete"
        );
        Ok(report)
    }

    /// Delete every activity, event, notification, student, staff member and
    /// grade, then restart the student and staff identifier counters.
    pub async fn clear(&self) -> AppResult<()> {
        for activity in self.activity_repo.find_all().await? {
            self.activity_repo.delete(&activity.id).await?;
        }
        for event in self.event_repo.find_all().await? {
            self.event_repo.delete(&event.id).await?;
        }
        for notification in self.notification_repo.find_all().await? {
            self.notification_repo.delete(&notification.id).await?;
        }
        for student in self.student_repo.find_all().await? {
            self.student_repo.delete(&student.id).await?;
        }
        for member in self.staff_repo.find_all().await? {
            self.staff_repo.delete(&member.id).await?;
        }
        for grade in self.grade_repo.find_all().await? {
            self.grade_repo.delete(&grade.id).await?;
        }
        id_sequence::reset(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!("Existing data cleared");
        Ok(())
    }

    /// Make sure every standard grade exists. Returns all of them and how many were new.
    async fn seed_grades(&self) -> AppResult<(Vec<grade::Model>, usize)> {
        let mut grades = Vec::with_capacity(STANDARD_GRADES.len());
        let mut created = 0;

        for (name, description, capacity) in STANDARD_GRADES {
            if let Some(existing) = self.grade_repo.find_by_name(name).await? {
                grades.push(existing);
                continue;
            }

            let model = grade::ActiveModel {
                id: Set(self.id_gen.generate()),
                name: Set(name.to_string()),
                description: Set(Some(description.to_string())),
                capacity: Set(capacity),
                created_at: Set(Utc::now().into()),
                updated_at: Set(None),
            };
            grades.push(self.grade_repo.create(model).await?);
            debug!(name = name, "Created grade");
            created += 1;
        }

        Ok((grades, created))
    }

    fn student_model(&self, rng: &mut StdRng, grade: &grade::Model) -> student::ActiveModel {
        let now = Utc::now();
        let today = now.date_naive();

        let fees_due: i64 = rng.gen_range(500..=2000);
        let fees_paid: i64 = rng.gen_range(0..=fees_due);

        let age = i64::from(grade_level(&grade.name).map_or(10, |level| level + 5));
        let date_of_birth = today
            - Duration::days((age - 1) * 365)
            - Duration::days(rng.gen_range(0..=2 * 365));

        let email = rng.gen_bool(0.5).then(|| SafeEmail().fake_with_rng::<String, _>(rng));
        let phone = rng
            .gen_bool(0.5)
            .then(|| truncate(PhoneNumber().fake_with_rng(rng), 15));
        let address = rng.gen_bool(0.5).then(|| self.address(rng));
        let parent_email = rng.gen_bool(0.5).then(|| SafeEmail().fake_with_rng::<String, _>(rng));

        student::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(Name().fake_with_rng(rng)),
            student_id: NotSet,
            grade_id: Set(grade.id.clone()),
            date_of_birth: Set(Some(date_of_birth)),
            gender: Set(Some(if rng.gen_bool(0.5) {
                Gender::Male
            } else {
                Gender::Female
            })),
            email: Set(email),
            phone: Set(phone),
            address: Set(address),
            parent_name: Set(Some(Name().fake_with_rng(rng))),
            parent_phone: Set(Some(truncate(PhoneNumber().fake_with_rng(rng), 15))),
            parent_email: Set(parent_email),
            fees_due: Set(Decimal::new(fees_due, 0)),
            fees_paid: Set(Decimal::new(fees_paid, 0)),
            status: Set(random_status(rng)),
            enrolled_on: Set(days_ago(rng, today, 2 * 365)),
            created_at: Set(now.into()),
            updated_at: Set(None),
        }
    }

    fn staff_model(&self, rng: &mut StdRng) -> staff::ActiveModel {
        let now = Utc::now();
        let role = *STAFF_ROLES.choose(rng).unwrap_or(&StaffRole::Teacher);
        let is_teacher = role == StaffRole::Teacher;

        let department = if is_teacher {
            DEPARTMENTS.choose(rng).copied().unwrap_or("Administration")
        } else {
            "Administration"
        };
        let subjects = if is_teacher {
            SUBJECTS.choose(rng).map(|s| (*s).to_string())
        } else {
            None
        };

        let address = rng.gen_bool(0.5).then(|| self.address(rng));
        let salary = rng
            .gen_bool(0.5)
            .then(|| Decimal::new(rng.gen_range(30_000..=80_000), 0));
        let qualifications = rng
            .gen_bool(0.5)
            .then(|| truncate(Paragraph(1..3).fake_with_rng(rng), 200));

        staff::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(Name().fake_with_rng(rng)),
            staff_id: NotSet,
            role: Set(role),
            department: Set(Some(department.to_string())),
            email: Set(Some(SafeEmail().fake_with_rng(rng))),
            phone: Set(Some(truncate(PhoneNumber().fake_with_rng(rng), 15))),
            address: Set(address),
            date_joined: Set(days_ago(rng, now.date_naive(), 5 * 365)),
            salary: Set(salary),
            status: Set(random_status(rng)),
            qualifications: Set(qualifications),
            subjects: Set(subjects),
            created_at: Set(now.into()),
            updated_at: Set(None),
        }
    }

    fn address(&self, rng: &mut StdRng) -> String {
        let building: String = BuildingNumber().fake_with_rng(rng);
        let street: String = StreetName().fake_with_rng(rng);
        let city: String = CityName().fake_with_rng(rng);
        format!("{building} {street}, {city}")
    }

    async fn seed_notifications(
        &self,
        rng: &mut StdRng,
        staff: &[staff::Model],
    ) -> AppResult<usize> {
        let now = Utc::now();

        for (title, message, priority, target_audience) in NOTIFICATIONS {
            let model = notification::ActiveModel {
                id: Set(self.id_gen.generate()),
                title: Set(title.to_string()),
                message: Set(message.to_string()),
                priority: Set(priority),
                target_audience: Set(target_audience),
                target_grade_id: Set(None),
                is_active: Set(true),
                date_created: Set(now.into()),
                date: Set(days_ago(rng, now.date_naive(), 30)),
                created_by_id: Set(staff.choose(rng).map(|s| s.id.clone())),
            };
            self.notification_repo.create(model).await?;
        }

        Ok(NOTIFICATIONS.len())
    }

    async fn seed_events(
        &self,
        rng: &mut StdRng,
        grades: &[grade::Model],
        staff: &[staff::Model],
    ) -> AppResult<usize> {
        let now = Utc::now();

        for (title, description, event_type, location) in EVENTS {
            let start = now + Duration::seconds(rng.gen_range(3_600..=90 * 86_400));
            let end = start + Duration::hours(rng.gen_range(2..=8));

            let targets: Vec<String> = if rng.gen_bool(0.5) {
                let amount = rng.gen_range(1..=3).min(grades.len());
                grades
                    .choose_multiple(rng, amount)
                    .map(|g| g.id.clone())
                    .collect()
            } else {
                Vec::new()
            };

            let model = event::ActiveModel {
                id: Set(self.id_gen.generate()),
                title: Set(title.to_string()),
                description: Set(Some(description.to_string())),
                event_type: Set(event_type),
                start_date: Set(Some(start.into())),
                end_date: Set(Some(end.into())),
                location: Set(Some(location.to_string())),
                is_active: Set(true),
                created_at: Set(now.into()),
                created_by_id: Set(staff.choose(rng).map(|s| s.id.clone())),
            };
            self.event_repo.create(model, &targets).await?;
        }

        Ok(EVENTS.len())
    }

    async fn seed_activities(&self, rng: &mut StdRng, staff: &[staff::Model]) -> AppResult<usize> {
        let teachers: Vec<&staff::Model> = staff
            .iter()
            .filter(|s| s.role == StaffRole::Teacher)
            .collect();

        for (title, description, activity_type, max_participants, schedule) in ACTIVITIES {
            let model = activity::ActiveModel {
                id: Set(self.id_gen.generate()),
                title: Set(title.to_string()),
                description: Set(Some(description.to_string())),
                activity_type: Set(activity_type),
                instructor_id: Set(teachers.choose(rng).map(|s| s.id.clone())),
                max_participants: Set(max_participants),
                schedule: Set(Some(schedule.to_string())),
                is_active: Set(true),
                created_at: Set(Utc::now().into()),
            };
            self.activity_repo.create(model).await?;
        }

        Ok(ACTIVITIES.len())
    }
}

/// Four in five generated people are active.
fn random_status(rng: &mut StdRng) -> RecordStatus {
    if rng.gen_bool(0.8) {
        RecordStatus::Active
    } else {
        RecordStatus::Inactive
    }
}
