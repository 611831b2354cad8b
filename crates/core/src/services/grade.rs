//! Grade service.

use chrono::Utc;
use schooldesk_common::{AppError, AppResult, id::IdGenerator};
use schooldesk_db::entities::grade;
use schooldesk_db::relations::DeleteSummary;
use schooldesk_db::repositories::{GradeRepository, StudentRepository};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::derived::{StudentView, grade_available_spots};

/// Capacity used when none is given.
pub const DEFAULT_CAPACITY: i32 = 30;

const fn default_capacity() -> i32 {
    DEFAULT_CAPACITY
}

/// Input for creating a grade.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGradeInput {
    #[validate(length(min = 1, max = 20))]
    pub name: String,
    #[validate(length(max = 2048))]
    pub description: Option<String>,
    #[serde(default = "default_capacity")]
    #[validate(range(min = 0))]
    pub capacity: i32,
}

/// Input for updating a grade.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateGradeInput {
    #[validate(length(min = 1, max = 20))]
    pub name: Option<String>,
    #[validate(length(max = 2048))]
    #[serde(default, deserialize_with = "super::nullable")]
    pub description: Option<Option<String>>,
    #[validate(range(min = 0))]
    pub capacity: Option<i32>,
}

/// A grade with its enrollment figures.
#[derive(Debug, Clone, Serialize)]
pub struct GradeSummary {
    #[serde(flatten)]
    pub grade: grade::Model,
    pub student_count: u64,
    /// May be negative when the grade is over-enrolled.
    pub available_spots: i64,
}

impl GradeSummary {
    fn new(grade: grade::Model, student_count: u64) -> Self {
        Self {
            available_spots: grade_available_spots(&grade, student_count),
            student_count,
            grade,
        }
    }
}

/// A grade with its students.
#[derive(Debug, Clone, Serialize)]
pub struct GradeDetails {
    #[serde(flatten)]
    pub summary: GradeSummary,
    pub students: Vec<StudentView>,
}

/// Service for managing grades.
#[derive(Clone)]
pub struct GradeService {
    grade_repo: GradeRepository,
    student_repo: StudentRepository,
    id_gen: IdGenerator,
}

impl GradeService {
    /// Create a new grade service.
    #[must_use]
    pub const fn new(grade_repo: GradeRepository, student_repo: StudentRepository) -> Self {
        Self {
            grade_repo,
            student_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// List all grades ordered by name.
    pub async fn list(&self) -> AppResult<Vec<grade::Model>> {
        self.grade_repo.find_all().await
    }

    /// Get a grade by ID.
    pub async fn get(&self, id: &str) -> AppResult<grade::Model> {
        self.grade_repo.get_by_id(id).await
    }

    /// Every grade with its student count and available spots.
    pub async fn stats(&self) -> AppResult<Vec<GradeSummary>> {
        let grades = self.grade_repo.find_all().await?;
        let counts = self.grade_repo.student_counts().await?;

        Ok(grades
            .into_iter()
            .map(|grade| {
                let count = counts.get(&grade.id).copied().unwrap_or(0);
                GradeSummary::new(grade, count)
            })
            .collect())
    }

    /// Enrollment figures of a single grade.
    pub async fn summary(&self, id: &str) -> AppResult<GradeSummary> {
        let grade = self.grade_repo.get_by_id(id).await?;
        let count = self.grade_repo.student_count(id).await?;
        Ok(GradeSummary::new(grade, count))
    }

    /// A grade with its students ordered by name.
    pub async fn details(&self, id: &str) -> AppResult<GradeDetails> {
        let grade = self.grade_repo.get_by_id(id).await?;
        let students = self.student_repo.find_by_grade(id, None).await?;
        let today = Utc::now().date_naive();

        let summary = GradeSummary::new(grade, students.len() as u64);
        let students = students
            .into_iter()
            .map(|student| StudentView::new(student, Some(summary.grade.name.clone()), today))
            .collect();

        Ok(GradeDetails { summary, students })
    }

    /// Create a grade.
    pub async fn create(&self, input: CreateGradeInput) -> AppResult<grade::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let model = grade::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name.trim().to_string()),
            description: Set(input.description),
            capacity: Set(input.capacity),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let grade = self.grade_repo.create(model).await?;
        info!(id = %grade.id, name = %grade.name, "Created grade");
        Ok(grade)
    }

    /// Update a grade.
    pub async fn update(&self, id: &str, input: UpdateGradeInput) -> AppResult<grade::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let grade = self.grade_repo.get_by_id(id).await?;
        let mut active: grade::ActiveModel = grade.into();

        if let Some(name) = input.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(capacity) = input.capacity {
            active.capacity = Set(capacity);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.grade_repo.update(active).await
    }

    /// Delete a grade together with its students.
    pub async fn delete(&self, id: &str) -> AppResult<DeleteSummary> {
        self.grade_repo.delete(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn create_test_grade(id: &str, name: &str, capacity: i32) -> grade::Model {
        grade::Model {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            capacity,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn count_row(grade_id: &str, total: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("grade_id", Value::from(grade_id.to_string())),
            ("total", Value::from(total)),
        ])
    }

    fn service(db: MockDatabase) -> GradeService {
        let db = Arc::new(db.into_connection());
        GradeService::new(
            GradeRepository::new(db.clone()),
            StudentRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_stats_fills_missing_counts_with_zero() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_grade("g1", "Grade 1", 30),
                    create_test_grade("g2", "Grade 2", 30),
                ]])
                .append_query_results([[count_row("g1", 31)]]),
        );

        let stats = service.stats().await.unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].student_count, 31);
        assert_eq!(stats[0].available_spots, -1);
        assert_eq!(stats[1].student_count, 0);
        assert_eq!(stats[1].available_spots, 30);
    }

    #[tokio::test]
    async fn test_create_rejects_negative_capacity() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service
            .create(CreateGradeInput {
                name: "Grade 1".to_string(),
                description: None,
                capacity: -1,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_long_name() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service
            .create(CreateGradeInput {
                name: "x".repeat(21),
                description: None,
                capacity: DEFAULT_CAPACITY,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_grade("g1", "Kindergarten", 25)]]),
        );

        let grade = service
            .create(CreateGradeInput {
                name: " Kindergarten ".to_string(),
                description: Some("Foundation level education".to_string()),
                capacity: 25,
            })
            .await
            .unwrap();

        assert_eq!(grade.name, "Kindergarten");
    }

    #[test]
    fn test_capacity_default() {
        let input: CreateGradeInput = serde_json::from_str(r#"{"name": "Grade 4"}"#).unwrap();
        assert_eq!(input.capacity, DEFAULT_CAPACITY);
    }
}
