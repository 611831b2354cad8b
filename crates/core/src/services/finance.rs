//! Finance service: fee totals and payment records.
//!
//! Payments and `fees_paid` are kept independently. Recording or deleting a
//! payment never touches the student's fee columns.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use schooldesk_common::{AppError, AppResult, id::IdGenerator};
use schooldesk_db::entities::fee_payment::{self, PaymentMethod};
use schooldesk_db::repositories::{
    FeePaymentRepository, FeeRow, FeeTotals, GradeRepository, StudentRepository,
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use super::positive_amount;
use crate::derived::{StudentView, collection_percentage, outstanding_fees};

/// Input for recording a payment.
#[derive(Debug, Deserialize, Validate)]
pub struct RecordPaymentInput {
    #[validate(custom(function = "positive_amount"))]
    pub amount: Decimal,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[validate(length(max = 100))]
    pub reference_number: Option<String>,
    #[validate(length(max = 4096))]
    pub notes: Option<String>,
    /// Defaults to today.
    pub payment_date: Option<NaiveDate>,
    pub recorded_by_id: Option<String>,
}

/// School-wide fee figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinanceSummary {
    pub total_fees_due: Decimal,
    pub total_fees_paid: Decimal,
    /// Sum of positive balances.
    pub outstanding_fees: Decimal,
    pub collection_percentage: Decimal,
    /// Grade name to the sum of positive balances in that grade.
    pub outstanding_by_grade: BTreeMap<String, Decimal>,
}

/// A student's payments with the figures they are shown next to.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentHistory {
    pub student: StudentView,
    pub payments: Vec<fee_payment::Model>,
    /// The student's `fees_paid`, not the sum of `payments`.
    pub total_paid: Decimal,
    pub balance: Decimal,
}

/// Service for fee reports and payments.
#[derive(Clone)]
pub struct FinanceService {
    student_repo: StudentRepository,
    grade_repo: GradeRepository,
    payment_repo: FeePaymentRepository,
    id_gen: IdGenerator,
}

impl FinanceService {
    /// Create a new finance service.
    #[must_use]
    pub const fn new(
        student_repo: StudentRepository,
        grade_repo: GradeRepository,
        payment_repo: FeePaymentRepository,
    ) -> Self {
        Self {
            student_repo,
            grade_repo,
            payment_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Fee totals across all students, broken down by grade.
    pub async fn summary(&self) -> AppResult<FinanceSummary> {
        let rows = self.student_repo.fee_rows().await?;
        let totals = FeeTotals::sum(&rows);

        let mut by_grade: BTreeMap<&str, Vec<FeeRow>> = BTreeMap::new();
        for row in &rows {
            by_grade.entry(row.grade_id.as_str()).or_default().push(row.clone());
        }

        let outstanding_by_grade = self
            .grade_repo
            .find_all()
            .await?
            .into_iter()
            .map(|grade| {
                let outstanding = by_grade
                    .get(grade.id.as_str())
                    .map_or(Decimal::ZERO, |rows| outstanding_fees(rows));
                (grade.name, outstanding)
            })
            .collect();

        Ok(FinanceSummary {
            total_fees_due: totals.due,
            total_fees_paid: totals.paid,
            outstanding_fees: outstanding_fees(&rows),
            collection_percentage: collection_percentage(&totals),
            outstanding_by_grade,
        })
    }

    /// Payments of a student, newest first.
    pub async fn payment_history(&self, student_id: &str) -> AppResult<PaymentHistory> {
        let (student, grade) = self
            .student_repo
            .find_with_grade(student_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student not found: {student_id}")))?;
        let payments = self.payment_repo.find_by_student(student_id).await?;

        let student = StudentView::now(student, grade.map(|g| g.name));
        Ok(PaymentHistory {
            total_paid: student.student.fees_paid,
            balance: student.balance,
            student,
            payments,
        })
    }

    /// Record a payment for a student.
    pub async fn record_payment(
        &self,
        student_id: &str,
        input: RecordPaymentInput,
    ) -> AppResult<fee_payment::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.student_repo.get_by_id(student_id).await?;

        let now = Utc::now();
        let model = fee_payment::ActiveModel {
            id: Set(self.id_gen.generate()),
            student_id: Set(student_id.to_string()),
            amount: Set(input.amount.round_dp(2)),
            payment_method: Set(input.payment_method),
            reference_number: Set(input.reference_number),
            notes: Set(input.notes),
            payment_date: Set(input.payment_date.unwrap_or_else(|| now.date_naive())),
            recorded_at: Set(now.into()),
            recorded_by_id: Set(input.recorded_by_id),
        };

        let payment = self.payment_repo.create(model).await?;
        info!(
            id = %payment.id,
            student_id = %payment.student_id,
            amount = %payment.amount,
            "Recorded fee payment"
        );
        Ok(payment)
    }

    /// Delete a payment record.
    pub async fn delete_payment(&self, id: &str) -> AppResult<()> {
        self.payment_repo.delete(id).await?;
        info!(id = %id, "Deleted fee payment");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use schooldesk_db::entities::grade;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::str::FromStr;
    use std::sync::Arc;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn fee_row(id: &str, grade_id: &str, due: &str, paid: &str) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("id", Value::from(id.to_string())),
            ("grade_id", Value::from(grade_id.to_string())),
            ("fees_due", Value::from(dec(due))),
            ("fees_paid", Value::from(dec(paid))),
        ])
    }

    fn create_test_grade(id: &str, name: &str) -> grade::Model {
        grade::Model {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            capacity: 30,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service(db: MockDatabase) -> FinanceService {
        let db = Arc::new(db.into_connection());
        FinanceService::new(
            StudentRepository::new(db.clone()),
            GradeRepository::new(db.clone()),
            FeePaymentRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_summary() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    fee_row("s1", "g1", "500.00", "450.00"),
                    fee_row("s2", "g1", "500.00", "600.00"),
                    fee_row("s3", "g2", "500.00", "0.00"),
                ]])
                .append_query_results([[
                    create_test_grade("g1", "Grade 1"),
                    create_test_grade("g2", "Grade 2"),
                    create_test_grade("g3", "Grade 3"),
                ]]),
        );

        let summary = service.summary().await.unwrap();

        assert_eq!(summary.total_fees_due, dec("1500.00"));
        assert_eq!(summary.total_fees_paid, dec("1050.00"));
        assert_eq!(summary.outstanding_fees, dec("550.00"));
        assert_eq!(summary.collection_percentage, dec("70.00"));
        assert_eq!(summary.outstanding_by_grade["Grade 1"], dec("50.00"));
        assert_eq!(summary.outstanding_by_grade["Grade 2"], dec("500.00"));
        assert_eq!(summary.outstanding_by_grade["Grade 3"], Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_summary_without_students() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<BTreeMap<&'static str, Value>>::new()])
                .append_query_results([Vec::<grade::Model>::new()]),
        );

        let summary = service.summary().await.unwrap();

        assert_eq!(summary.total_fees_due, Decimal::ZERO);
        assert_eq!(summary.collection_percentage, Decimal::ZERO);
        assert!(summary.outstanding_by_grade.is_empty());
    }

    #[tokio::test]
    async fn test_record_payment_rejects_zero_amount() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));
        let input: RecordPaymentInput = serde_json::from_str(r#"{"amount": "0.00"}"#).unwrap();

        let result = service.record_payment("s1", input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_payment_input_defaults() {
        let input: RecordPaymentInput =
            serde_json::from_str(r#"{"amount": "150.00", "reference_number": "RCPT-77"}"#)
                .unwrap();

        assert_eq!(input.payment_method, PaymentMethod::Cash);
        assert_eq!(input.amount, dec("150.00"));
        assert!(input.payment_date.is_none());
    }
}
