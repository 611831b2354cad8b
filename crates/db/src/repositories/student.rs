//! Student repository.

use std::sync::Arc;

use rust_decimal::Decimal;
use schooldesk_common::id::IdentifierKind;
use schooldesk_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use super::{icontains, id_sequence};
use crate::entities::{Grade, Student, grade, student};
use crate::map_db_err;
use crate::relations::{self, DeleteSummary, Table};

/// Fee columns of one student.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct FeeRow {
    /// Student primary key.
    pub id: String,
    /// Grade the student belongs to.
    pub grade_id: String,
    /// Total fees charged.
    pub fees_due: Decimal,
    /// Total fees received.
    pub fees_paid: Decimal,
}

/// Sums of fees across a set of students.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeTotals {
    /// Sum of `fees_due`.
    pub due: Decimal,
    /// Sum of `fees_paid`.
    pub paid: Decimal,
}

impl FeeTotals {
    /// Add up the fee columns of `rows`.
    #[must_use]
    pub fn sum(rows: &[FeeRow]) -> Self {
        rows.iter().fold(Self::default(), |acc, row| Self {
            due: acc.due + row.fees_due,
            paid: acc.paid + row.fees_paid,
        })
    }
}

/// Repository for student operations.
#[derive(Clone)]
pub struct StudentRepository {
    db: Arc<DatabaseConnection>,
}

impl StudentRepository {
    /// Create a new student repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a student by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<student::Model>> {
        Student::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a student by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<student::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student not found: {id}")))
    }

    /// Find a student together with its grade.
    pub async fn find_with_grade(
        &self,
        id: &str,
    ) -> AppResult<Option<(student::Model, Option<grade::Model>)>> {
        Student::find_by_id(id)
            .find_also_related(Grade)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a student by the human-readable identifier (`STU-0001`).
    pub async fn find_by_student_id(&self, student_id: &str) -> AppResult<Option<student::Model>> {
        Student::find()
            .filter(student::Column::StudentId.eq(student_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all students ordered by name.
    pub async fn find_all(&self) -> AppResult<Vec<student::Model>> {
        Student::find()
            .order_by_asc(student::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List students of a grade, optionally restricted to one status.
    pub async fn find_by_grade(
        &self,
        grade_id: &str,
        status: Option<student::RecordStatus>,
    ) -> AppResult<Vec<student::Model>> {
        let mut query = Student::find().filter(student::Column::GradeId.eq(grade_id));

        if let Some(status) = status {
            query = query.filter(student::Column::Status.eq(status));
        }

        query
            .order_by_asc(student::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Search students by name or grade name (case-insensitive substring).
    ///
    /// A blank query returns every student.
    pub async fn search(&self, query: &str) -> AppResult<Vec<student::Model>> {
        let query = query.trim();
        if query.is_empty() {
            return self.find_all().await;
        }

        Student::find()
            .inner_join(Grade)
            .filter(
                Condition::any()
                    .add(icontains((student::Entity, student::Column::Name), query))
                    .add(icontains((grade::Entity, grade::Column::Name), query)),
            )
            .order_by_asc(student::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Students whose balance is positive.
    pub async fn find_outstanding(&self) -> AppResult<Vec<student::Model>> {
        Student::find()
            .filter(
                Expr::col((student::Entity, student::Column::FeesDue))
                    .gt(Expr::col((student::Entity, student::Column::FeesPaid))),
            )
            .order_by_asc(student::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Students whose balance is zero or negative.
    pub async fn find_paid(&self) -> AppResult<Vec<student::Model>> {
        Student::find()
            .filter(
                Expr::col((student::Entity, student::Column::FeesDue))
                    .lte(Expr::col((student::Entity, student::Column::FeesPaid))),
            )
            .order_by_asc(student::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Most recently enrolled students.
    pub async fn find_recent(&self, limit: u64) -> AppResult<Vec<student::Model>> {
        Student::find()
            .order_by_desc(student::Column::EnrolledOn)
            .order_by_desc(student::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all students.
    pub async fn count(&self) -> AppResult<u64> {
        Student::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fee columns of every student, for aggregate reports.
    pub async fn fee_rows(&self) -> AppResult<Vec<FeeRow>> {
        Student::find()
            .select_only()
            .column(student::Column::Id)
            .column(student::Column::GradeId)
            .column(student::Column::FeesDue)
            .column(student::Column::FeesPaid)
            .into_model::<FeeRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Total fees due and paid across all students.
    pub async fn fee_totals(&self) -> AppResult<FeeTotals> {
        Ok(FeeTotals::sum(&self.fee_rows().await?))
    }

    /// Create a student, assigning the next `STU-` identifier when none is set.
    pub async fn create(&self, mut model: student::ActiveModel) -> AppResult<student::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if model.student_id.is_not_set() {
            let student_id = id_sequence::assign(&txn, IdentifierKind::Student)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            model.student_id = Set(student_id);
        }

        let student = model
            .insert(&txn)
            .await
            .map_err(|e| map_db_err("Student", e))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(id = %student.id, student_id = %student.student_id, "Created student");
        Ok(student)
    }

    /// Update a student.
    pub async fn update(&self, model: student::ActiveModel) -> AppResult<student::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| map_db_err("Student", e))
    }

    /// Delete a student together with its payments and activity memberships.
    pub async fn delete(&self, id: &str) -> AppResult<DeleteSummary> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if Student::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .is_none()
        {
            return Err(AppError::NotFound(format!("Student not found: {id}")));
        }

        let summary =
            relations::delete_with_dependents(&txn, Table::Student, vec![id.to_string()])
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(id = %id, deleted = summary.deleted, "Deleted student");
        Ok(summary)
    }
}
