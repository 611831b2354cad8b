//! Student service.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use schooldesk_common::{AppError, AppResult, id::IdGenerator};
use schooldesk_db::entities::student::{self, Gender, RecordStatus};
use schooldesk_db::relations::DeleteSummary;
use schooldesk_db::repositories::{GradeRepository, StudentRepository};
use sea_orm::{ActiveValue::NotSet, Set};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::{RECENT_STUDENTS, non_negative};
use crate::derived::StudentView;

/// Named student lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentFilter {
    /// Balance above zero.
    Outstanding,
    /// Balance at or below zero.
    Paid,
    /// The most recently enrolled students.
    Recent,
    #[default]
    All,
}

impl FromStr for StudentFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "outstanding" => Ok(Self::Outstanding),
            "paid" => Ok(Self::Paid),
            "recent" => Ok(Self::Recent),
            "" | "all" => Ok(Self::All),
            other => Err(AppError::BadRequest(format!("Unknown student filter: {other}"))),
        }
    }
}

/// Input for creating a student.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudentInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Assigned from the `STU-` sequence when absent.
    #[validate(length(min = 1, max = 20))]
    pub student_id: Option<String>,
    pub grade_id: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 15))]
    pub phone: Option<String>,
    #[validate(length(max = 2048))]
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub parent_name: Option<String>,
    #[validate(length(max = 15))]
    pub parent_phone: Option<String>,
    #[validate(email)]
    pub parent_email: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "non_negative"))]
    pub fees_due: Decimal,
    #[serde(default)]
    #[validate(custom(function = "non_negative"))]
    pub fees_paid: Decimal,
    #[serde(default)]
    pub status: RecordStatus,
    /// Defaults to today.
    pub enrolled_on: Option<NaiveDate>,
}

/// Input for updating a student.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateStudentInput {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub grade_id: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub date_of_birth: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub gender: Option<Option<Gender>>,
    #[validate(email)]
    #[serde(default, deserialize_with = "super::nullable")]
    pub email: Option<Option<String>>,
    #[validate(length(max = 15))]
    #[serde(default, deserialize_with = "super::nullable")]
    pub phone: Option<Option<String>>,
    #[validate(length(max = 2048))]
    #[serde(default, deserialize_with = "super::nullable")]
    pub address: Option<Option<String>>,
    #[validate(length(max = 100))]
    #[serde(default, deserialize_with = "super::nullable")]
    pub parent_name: Option<Option<String>>,
    #[validate(length(max = 15))]
    #[serde(default, deserialize_with = "super::nullable")]
    pub parent_phone: Option<Option<String>>,
    #[validate(email)]
    #[serde(default, deserialize_with = "super::nullable")]
    pub parent_email: Option<Option<String>>,
    #[validate(custom(function = "non_negative"))]
    pub fees_due: Option<Decimal>,
    #[validate(custom(function = "non_negative"))]
    pub fees_paid: Option<Decimal>,
    pub status: Option<RecordStatus>,
    pub enrolled_on: Option<NaiveDate>,
}

/// Input for changing only the fee columns.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateFeesInput {
    #[validate(custom(function = "non_negative"))]
    pub fees_due: Option<Decimal>,
    #[validate(custom(function = "non_negative"))]
    pub fees_paid: Option<Decimal>,
}

/// Service for managing students.
#[derive(Clone)]
pub struct StudentService {
    student_repo: StudentRepository,
    grade_repo: GradeRepository,
    id_gen: IdGenerator,
}

impl StudentService {
    /// Create a new student service.
    #[must_use]
    pub const fn new(student_repo: StudentRepository, grade_repo: GradeRepository) -> Self {
        Self {
            student_repo,
            grade_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get a student by ID.
    pub async fn get(&self, id: &str) -> AppResult<student::Model> {
        self.student_repo.get_by_id(id).await
    }

    /// Get a student with its derived fields.
    pub async fn view(&self, id: &str) -> AppResult<StudentView> {
        let (student, grade) = self
            .student_repo
            .find_with_grade(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student not found: {id}")))?;

        Ok(StudentView::now(student, grade.map(|g| g.name)))
    }

    /// List all students ordered by name.
    pub async fn list(&self) -> AppResult<Vec<student::Model>> {
        self.student_repo.find_all().await
    }

    /// Students of a grade, optionally with one status only.
    pub async fn in_grade(
        &self,
        grade_id: &str,
        status: Option<RecordStatus>,
    ) -> AppResult<Vec<student::Model>> {
        self.grade_repo.get_by_id(grade_id).await?;
        self.student_repo.find_by_grade(grade_id, status).await
    }

    /// Case-insensitive search over student and grade names.
    pub async fn search(&self, query: &str) -> AppResult<Vec<student::Model>> {
        self.student_repo.search(query).await
    }

    /// Students matching a named filter.
    pub async fn filter(&self, filter: StudentFilter) -> AppResult<Vec<student::Model>> {
        match filter {
            StudentFilter::Outstanding => self.student_repo.find_outstanding().await,
            StudentFilter::Paid => self.student_repo.find_paid().await,
            StudentFilter::Recent => self.student_repo.find_recent(RECENT_STUDENTS).await,
            StudentFilter::All => self.student_repo.find_all().await,
        }
    }

    /// Attach derived fields and grade names to a list of students.
    pub async fn to_views(&self, students: Vec<student::Model>) -> AppResult<Vec<StudentView>> {
        let grade_names: HashMap<String, String> = self
            .grade_repo
            .find_all()
            .await?
            .into_iter()
            .map(|g| (g.id, g.name))
            .collect();
        let today = Utc::now().date_naive();

        Ok(students
            .into_iter()
            .map(|student| {
                let grade_name = grade_names.get(&student.grade_id).cloned();
                StudentView::new(student, grade_name, today)
            })
            .collect())
    }

    /// Create a student.
    pub async fn create(&self, input: CreateStudentInput) -> AppResult<student::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.grade_repo.get_by_id(&input.grade_id).await?;

        let now = Utc::now();
        let model = student::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            student_id: input.student_id.map_or(NotSet, Set),
            grade_id: Set(input.grade_id),
            date_of_birth: Set(input.date_of_birth),
            gender: Set(input.gender),
            email: Set(input.email),
            phone: Set(input.phone),
            address: Set(input.address),
            parent_name: Set(input.parent_name),
            parent_phone: Set(input.parent_phone),
            parent_email: Set(input.parent_email),
            fees_due: Set(input.fees_due),
            fees_paid: Set(input.fees_paid),
            status: Set(input.status),
            enrolled_on: Set(input.enrolled_on.unwrap_or_else(|| now.date_naive())),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        self.student_repo.create(model).await
    }

    /// Update a student.
    pub async fn update(&self, id: &str, input: UpdateStudentInput) -> AppResult<student::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let student = self.student_repo.get_by_id(id).await?;
        let mut active: student::ActiveModel = student.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(grade_id) = input.grade_id {
            self.grade_repo.get_by_id(&grade_id).await?;
            active.grade_id = Set(grade_id);
        }
        if let Some(date_of_birth) = input.date_of_birth {
            active.date_of_birth = Set(date_of_birth);
        }
        if let Some(gender) = input.gender {
            active.gender = Set(gender);
        }
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(address) = input.address {
            active.address = Set(address);
        }
        if let Some(parent_name) = input.parent_name {
            active.parent_name = Set(parent_name);
        }
        if let Some(parent_phone) = input.parent_phone {
            active.parent_phone = Set(parent_phone);
        }
        if let Some(parent_email) = input.parent_email {
            active.parent_email = Set(parent_email);
        }
        if let Some(fees_due) = input.fees_due {
            active.fees_due = Set(fees_due);
        }
        if let Some(fees_paid) = input.fees_paid {
            active.fees_paid = Set(fees_paid);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(enrolled_on) = input.enrolled_on {
            active.enrolled_on = Set(enrolled_on);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.student_repo.update(active).await
    }

    /// Change the fee columns of a student.
    pub async fn update_fees(&self, id: &str, input: UpdateFeesInput) -> AppResult<student::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let student = self.student_repo.get_by_id(id).await?;
        let mut active: student::ActiveModel = student.into();

        if let Some(fees_due) = input.fees_due {
            active.fees_due = Set(fees_due);
        }
        if let Some(fees_paid) = input.fees_paid {
            active.fees_paid = Set(fees_paid);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let student = self.student_repo.update(active).await?;
        info!(
            id = %student.id,
            fees_due = %student.fees_due,
            fees_paid = %student.fees_paid,
            "Updated student fees"
        );
        Ok(student)
    }

    /// Delete a student with its payments and activity memberships.
    pub async fn delete(&self, id: &str) -> AppResult<DeleteSummary> {
        self.student_repo.delete(id).await
    }
}
