//! Notification service.

use chrono::{NaiveDate, Utc};
use schooldesk_common::{AppError, AppResult, id::IdGenerator};
use schooldesk_db::entities::notification::{self, DEFAULT_TITLE, Priority, TargetAudience};
use schooldesk_db::repositories::{GradeRepository, NotificationRepository};
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

const fn default_true() -> bool {
    true
}

/// Input for creating a notification.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateNotificationInput {
    /// Falls back to [`DEFAULT_TITLE`].
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 8192))]
    pub message: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub target_audience: TargetAudience,
    pub target_grade_id: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Display date, defaults to today.
    pub date: Option<NaiveDate>,
    pub created_by_id: Option<String>,
}

/// Input for updating a notification.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateNotificationInput {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 8192))]
    pub message: Option<String>,
    pub priority: Option<Priority>,
    pub target_audience: Option<TargetAudience>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub target_grade_id: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub date: Option<NaiveDate>,
}

/// Service for school notifications.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    grade_repo: GradeRepository,
    id_gen: IdGenerator,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(notification_repo: NotificationRepository, grade_repo: GradeRepository) -> Self {
        Self {
            notification_repo,
            grade_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get a notification by ID.
    pub async fn get(&self, id: &str) -> AppResult<notification::Model> {
        self.notification_repo.get_by_id(id).await
    }

    /// All notifications, newest first.
    pub async fn list(&self) -> AppResult<Vec<notification::Model>> {
        self.notification_repo.find_all().await
    }

    /// The `limit` newest notifications.
    pub async fn recent(&self, limit: u64) -> AppResult<Vec<notification::Model>> {
        self.notification_repo.find_recent(limit).await
    }

    /// Notifications still marked active.
    pub async fn active(&self) -> AppResult<Vec<notification::Model>> {
        self.notification_repo.find_active().await
    }

    /// Create a notification.
    pub async fn create(&self, input: CreateNotificationInput) -> AppResult<notification::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if let Some(grade_id) = &input.target_grade_id {
            self.grade_repo.get_by_id(grade_id).await?;
        }

        let now = Utc::now();
        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title.unwrap_or_else(|| DEFAULT_TITLE.to_string())),
            message: Set(input.message),
            priority: Set(input.priority),
            target_audience: Set(input.target_audience),
            target_grade_id: Set(input.target_grade_id),
            is_active: Set(input.is_active),
            date_created: Set(now.into()),
            date: Set(input.date.unwrap_or_else(|| now.date_naive())),
            created_by_id: Set(input.created_by_id),
        };

        let notification = self.notification_repo.create(model).await?;
        info!(id = %notification.id, priority = ?notification.priority, "Created notification");
        Ok(notification)
    }

    /// Update a notification. `date_created` never changes.
    pub async fn update(
        &self,
        id: &str,
        input: UpdateNotificationInput,
    ) -> AppResult<notification::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let notification = self.notification_repo.get_by_id(id).await?;
        let mut active: notification::ActiveModel = notification.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(message) = input.message {
            active.message = Set(message);
        }
        if let Some(priority) = input.priority {
            active.priority = Set(priority);
        }
        if let Some(target_audience) = input.target_audience {
            active.target_audience = Set(target_audience);
        }
        if let Some(target_grade_id) = input.target_grade_id {
            if let Some(grade_id) = &target_grade_id {
                self.grade_repo.get_by_id(grade_id).await?;
            }
            active.target_grade_id = Set(target_grade_id);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(date) = input.date {
            active.date = Set(date);
        }

        self.notification_repo.update(active).await
    }

    /// Delete a notification.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.notification_repo.delete(id).await?;
        info!(id = %id, "Deleted notification");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_notification(id: &str, title: &str) -> notification::Model {
        notification::Model {
            id: id.to_string(),
            title: title.to_string(),
            message: "School closes early on Friday".to_string(),
            priority: Priority::Medium,
            target_audience: TargetAudience::All,
            target_grade_id: None,
            is_active: true,
            date_created: Utc::now().into(),
            date: Utc::now().date_naive(),
            created_by_id: None,
        }
    }

    fn service(db: MockDatabase) -> NotificationService {
        let db = Arc::new(db.into_connection());
        NotificationService::new(
            NotificationRepository::new(db.clone()),
            GradeRepository::new(db),
        )
    }

    #[test]
    fn test_create_input_defaults() {
        let input: CreateNotificationInput =
            serde_json::from_str(r#"{"message": "Library is open late"}"#).unwrap();

        assert!(input.title.is_none());
        assert_eq!(input.priority, Priority::Medium);
        assert_eq!(input.target_audience, TargetAudience::All);
        assert!(input.is_active);
    }

    #[tokio::test]
    async fn test_create_uses_default_title() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_notification("n1", DEFAULT_TITLE)]]),
        );
        let input: CreateNotificationInput =
            serde_json::from_str(r#"{"message": "School closes early on Friday"}"#).unwrap();

        let notification = service.create(input).await.unwrap();
        assert_eq!(notification.title, DEFAULT_TITLE);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_message() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));
        let input: CreateNotificationInput = serde_json::from_str(r#"{"message": ""}"#).unwrap();

        let result = service.create(input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }]),
        );

        let result = service.delete("missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
