//! Staff repository.

use std::sync::Arc;

use schooldesk_common::id::IdentifierKind;
use schooldesk_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use super::{icontains, id_sequence};
use crate::entities::{Staff, staff};
use crate::map_db_err;
use crate::relations::{self, DeleteSummary, Table};

/// Repository for staff operations.
#[derive(Clone)]
pub struct StaffRepository {
    db: Arc<DatabaseConnection>,
}

impl StaffRepository {
    /// Create a new staff repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a staff member by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<staff::Model>> {
        Staff::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a staff member by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<staff::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Staff member not found: {id}")))
    }

    /// Find a staff member by the human-readable identifier (`STF-0001`).
    pub async fn find_by_staff_id(&self, staff_id: &str) -> AppResult<Option<staff::Model>> {
        Staff::find()
            .filter(staff::Column::StaffId.eq(staff_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all staff ordered by name.
    pub async fn find_all(&self) -> AppResult<Vec<staff::Model>> {
        Staff::find()
            .order_by_asc(staff::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List staff with exactly the given role.
    pub async fn find_by_role(&self, role: staff::StaffRole) -> AppResult<Vec<staff::Model>> {
        Staff::find()
            .filter(staff::Column::Role.eq(role))
            .order_by_asc(staff::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Search staff by name or role (case-insensitive substring).
    ///
    /// A blank query returns every staff member.
    pub async fn search(&self, query: &str) -> AppResult<Vec<staff::Model>> {
        let query = query.trim();
        if query.is_empty() {
            return self.find_all().await;
        }

        Staff::find()
            .filter(
                Condition::any()
                    .add(icontains((staff::Entity, staff::Column::Name), query))
                    .add(icontains((staff::Entity, staff::Column::Role), query)),
            )
            .order_by_asc(staff::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all staff.
    pub async fn count(&self) -> AppResult<u64> {
        Staff::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a staff member, assigning the next `STF-` identifier when none is set.
    pub async fn create(&self, mut model: staff::ActiveModel) -> AppResult<staff::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if model.staff_id.is_not_set() {
            let staff_id = id_sequence::assign(&txn, IdentifierKind::Staff)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            model.staff_id = Set(staff_id);
        }

        let member = model
            .insert(&txn)
            .await
            .map_err(|e| map_db_err("Staff member", e))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(id = %member.id, staff_id = %member.staff_id, "Created staff member");
        Ok(member)
    }

    /// Update a staff member.
    pub async fn update(&self, model: staff::ActiveModel) -> AppResult<staff::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| map_db_err("Staff member", e))
    }

    /// Delete a staff member.
    ///
    /// Notifications, events, activities and payments referencing the member
    /// are kept with the reference cleared.
    pub async fn delete(&self, id: &str) -> AppResult<DeleteSummary> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if Staff::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .is_none()
        {
            return Err(AppError::NotFound(format!("Staff member not found: {id}")));
        }

        let summary = relations::delete_with_dependents(&txn, Table::Staff, vec![id.to_string()])
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(id = %id, detached = summary.detached, "Deleted staff member");
        Ok(summary)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_staff(id: &str, name: &str, role: staff::StaffRole) -> staff::Model {
        staff::Model {
            id: id.to_string(),
            name: name.to_string(),
            staff_id: format!("STF-{id}"),
            role,
            department: Some("Mathematics".to_string()),
            email: None,
            phone: None,
            address: None,
            date_joined: Utc::now().date_naive(),
            salary: None,
            status: staff::RecordStatus::Active,
            qualifications: None,
            subjects: Some("Algebra, Geometry".to_string()),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_role() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_staff("0001", "Grace Hopper", staff::StaffRole::Teacher),
                    create_test_staff("0002", "Alan Turing", staff::StaffRole::Teacher),
                ]])
                .into_connection(),
        );

        let repo = StaffRepository::new(db);
        let result = repo.find_by_role(staff::StaffRole::Teacher).await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|s| s.role == staff::StaffRole::Teacher));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<staff::Model>::new()])
                .into_connection(),
        );

        let repo = StaffRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_staff_id() {
        let member = create_test_staff("0003", "Mary Jackson", staff::StaffRole::Counselor);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[member.clone()]])
                .into_connection(),
        );

        let repo = StaffRepository::new(db);
        let result = repo.find_by_staff_id("STF-0003").await.unwrap().unwrap();

        assert_eq!(result.role, staff::StaffRole::Counselor);
    }
}
