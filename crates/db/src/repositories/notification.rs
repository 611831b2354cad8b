//! Notification repository.

use std::sync::Arc;

use schooldesk_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::{Notification, notification};
use crate::map_db_err;

/// Repository for notification operations.
#[derive(Clone)]
pub struct NotificationRepository {
    db: Arc<DatabaseConnection>,
}

impl NotificationRepository {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a notification by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<notification::Model>> {
        Notification::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a notification by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<notification::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Notification not found: {id}")))
    }

    /// List notifications, newest display date first.
    pub async fn find_all(&self) -> AppResult<Vec<notification::Model>> {
        Notification::find()
            .order_by(notification::Column::Date, Order::Desc)
            .order_by(notification::Column::DateCreated, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// The `limit` newest notifications.
    pub async fn find_recent(&self, limit: u64) -> AppResult<Vec<notification::Model>> {
        Notification::find()
            .order_by(notification::Column::Date, Order::Desc)
            .order_by(notification::Column::DateCreated, Order::Desc)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Active notifications, newest first.
    pub async fn find_active(&self) -> AppResult<Vec<notification::Model>> {
        Notification::find()
            .filter(notification::Column::IsActive.eq(true))
            .order_by(notification::Column::Date, Order::Desc)
            .order_by(notification::Column::DateCreated, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all notifications.
    pub async fn count(&self) -> AppResult<u64> {
        Notification::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new notification.
    pub async fn create(
        &self,
        model: notification::ActiveModel,
    ) -> AppResult<notification::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_db_err("Notification", e))
    }

    /// Update a notification.
    pub async fn update(
        &self,
        model: notification::ActiveModel,
    ) -> AppResult<notification::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| map_db_err("Notification", e))
    }

    /// Delete a notification.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let result = Notification::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Notification not found: {id}")));
        }

        Ok(())
    }
}
