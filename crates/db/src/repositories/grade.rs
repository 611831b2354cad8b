//! Grade repository.

use std::collections::HashMap;
use std::sync::Arc;

use schooldesk_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use tracing::info;

use crate::entities::{Grade, Student, grade, student};
use crate::map_db_err;
use crate::relations::{self, DeleteSummary, Table};

/// Repository for grade operations.
#[derive(Clone)]
pub struct GradeRepository {
    db: Arc<DatabaseConnection>,
}

impl GradeRepository {
    /// Create a new grade repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a grade by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<grade::Model>> {
        Grade::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a grade by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<grade::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Grade not found: {id}")))
    }

    /// Find a grade by its unique name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<grade::Model>> {
        Grade::find()
            .filter(grade::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all grades ordered by name.
    pub async fn find_all(&self) -> AppResult<Vec<grade::Model>> {
        Grade::find()
            .order_by_asc(grade::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all grades.
    pub async fn count(&self) -> AppResult<u64> {
        Grade::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new grade.
    pub async fn create(&self, model: grade::ActiveModel) -> AppResult<grade::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_db_err("Grade", e))
    }

    /// Update a grade.
    pub async fn update(&self, model: grade::ActiveModel) -> AppResult<grade::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| map_db_err("Grade", e))
    }

    /// Delete a grade together with its students and their records.
    ///
    /// Notifications targeting the grade keep existing with no target grade.
    pub async fn delete(&self, id: &str) -> AppResult<DeleteSummary> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if Grade::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .is_none()
        {
            return Err(AppError::NotFound(format!("Grade not found: {id}")));
        }

        let summary = relations::delete_with_dependents(&txn, Table::Grade, vec![id.to_string()])
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(
            grade_id = %id,
            deleted = summary.deleted,
            detached = summary.detached,
            "Deleted grade"
        );
        Ok(summary)
    }

    // ==================== Enrollment Counts ====================

    /// Count students assigned to a grade, whatever their status.
    pub async fn student_count(&self, grade_id: &str) -> AppResult<u64> {
        Student::find()
            .filter(student::Column::GradeId.eq(grade_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Student counts for every grade that has at least one student.
    pub async fn student_counts(&self) -> AppResult<HashMap<String, u64>> {
        #[derive(FromQueryResult)]
        struct GradeCount {
            grade_id: String,
            total: i64,
        }

        let rows = Student::find()
            .select_only()
            .column(student::Column::GradeId)
            .column_as(student::Column::Id.count(), "total")
            .group_by(student::Column::GradeId)
            .into_model::<GradeCount>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| (row.grade_id, row.total.max(0) as u64))
            .collect())
    }
}
