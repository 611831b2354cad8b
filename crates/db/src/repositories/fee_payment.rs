//! Fee payment repository.

use std::sync::Arc;

use schooldesk_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder,
};

use crate::entities::{FeePayment, fee_payment};
use crate::map_db_err;

/// Repository for fee payment operations.
#[derive(Clone)]
pub struct FeePaymentRepository {
    db: Arc<DatabaseConnection>,
}

impl FeePaymentRepository {
    /// Create a new fee payment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a payment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<fee_payment::Model>> {
        FeePayment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Payments of a student, newest payment date first.
    pub async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<fee_payment::Model>> {
        FeePayment::find()
            .filter(fee_payment::Column::StudentId.eq(student_id))
            .order_by(fee_payment::Column::PaymentDate, Order::Desc)
            .order_by(fee_payment::Column::RecordedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count payments of a student.
    pub async fn count_by_student(&self, student_id: &str) -> AppResult<u64> {
        FeePayment::find()
            .filter(fee_payment::Column::StudentId.eq(student_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Record a payment.
    pub async fn create(&self, model: fee_payment::ActiveModel) -> AppResult<fee_payment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_db_err("Fee payment", e))
    }

    /// Delete a payment.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let result = FeePayment::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Fee payment not found: {id}")));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_payment(id: &str, amount: i64, day: u32) -> fee_payment::Model {
        fee_payment::Model {
            id: id.to_string(),
            student_id: "s1".to_string(),
            amount: Decimal::new(amount, 2),
            payment_method: fee_payment::PaymentMethod::BankTransfer,
            reference_number: Some(format!("REF-{id}")),
            notes: None,
            payment_date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            recorded_at: Utc::now().into(),
            recorded_by_id: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_student() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_payment("p2", 20_000, 14),
                    create_test_payment("p1", 15_000, 2),
                ]])
                .into_connection(),
        );

        let repo = FeePaymentRepository::new(db);
        let result = repo.find_by_student("s1").await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(result[0].payment_date > result[1].payment_date);
        assert_eq!(result[1].amount, Decimal::new(15_000, 2));
    }
}
