//! Activity repository.

use std::collections::HashMap;
use std::sync::Arc;

use schooldesk_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use crate::entities::{Activity, ActivityParticipant, Student, activity, activity_participant, student};
use crate::map_db_err;
use crate::relations::{self, Table};

/// Repository for activity and participant operations.
#[derive(Clone)]
pub struct ActivityRepository {
    db: Arc<DatabaseConnection>,
}

impl ActivityRepository {
    /// Create a new activity repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // ==================== Activity Operations ====================

    /// Find an activity by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<activity::Model>> {
        Activity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an activity by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<activity::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Activity not found: {id}")))
    }

    /// List all activities ordered by title.
    pub async fn find_all(&self) -> AppResult<Vec<activity::Model>> {
        Activity::find()
            .order_by_asc(activity::Column::Title)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all activities.
    pub async fn count(&self) -> AppResult<u64> {
        Activity::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new activity.
    pub async fn create(&self, model: activity::ActiveModel) -> AppResult<activity::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_db_err("Activity", e))
    }

    /// Update an activity.
    pub async fn update(&self, model: activity::ActiveModel) -> AppResult<activity::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| map_db_err("Activity", e))
    }

    /// Delete an activity and its participant rows.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if Activity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .is_none()
        {
            return Err(AppError::NotFound(format!("Activity not found: {id}")));
        }

        let summary =
            relations::delete_with_dependents(&txn, Table::Activity, vec![id.to_string()])
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(id = %id, deleted = summary.deleted, "Deleted activity");
        Ok(())
    }

    // ==================== Participant Operations ====================

    /// Find the participant row for a student in an activity.
    pub async fn find_participant(
        &self,
        activity_id: &str,
        student_id: &str,
    ) -> AppResult<Option<activity_participant::Model>> {
        ActivityParticipant::find()
            .filter(activity_participant::Column::ActivityId.eq(activity_id))
            .filter(activity_participant::Column::StudentId.eq(student_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Participants of an activity with their students, by join date.
    pub async fn find_participants(
        &self,
        activity_id: &str,
    ) -> AppResult<Vec<(activity_participant::Model, Option<student::Model>)>> {
        ActivityParticipant::find()
            .filter(activity_participant::Column::ActivityId.eq(activity_id))
            .find_also_related(Student)
            .order_by_asc(activity_participant::Column::DateJoined)
            .order_by_asc(student::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Add a student to an activity. A second row for the same pair is a conflict.
    pub async fn add_participant(
        &self,
        model: activity_participant::ActiveModel,
    ) -> AppResult<activity_participant::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_db_err("Activity participant", e))
    }

    /// Remove a student from an activity.
    pub async fn remove_participant(&self, activity_id: &str, student_id: &str) -> AppResult<()> {
        let result = ActivityParticipant::delete_many()
            .filter(activity_participant::Column::ActivityId.eq(activity_id))
            .filter(activity_participant::Column::StudentId.eq(student_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "Student {student_id} is not a participant of activity {activity_id}"
            )));
        }

        Ok(())
    }

    /// Set the active flag of a participant row.
    pub async fn set_participant_active(
        &self,
        activity_id: &str,
        student_id: &str,
        is_active: bool,
    ) -> AppResult<activity_participant::Model> {
        let participant = self
            .find_participant(activity_id, student_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Student {student_id} is not a participant of activity {activity_id}"
                ))
            })?;

        let mut active: activity_participant::ActiveModel = participant.into();
        active.is_active = Set(is_active);

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count participant rows of an activity, active or not.
    pub async fn participant_count(&self, activity_id: &str) -> AppResult<u64> {
        ActivityParticipant::find()
            .filter(activity_participant::Column::ActivityId.eq(activity_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count active participants of an activity.
    pub async fn active_participant_count(&self, activity_id: &str) -> AppResult<u64> {
        ActivityParticipant::find()
            .filter(activity_participant::Column::ActivityId.eq(activity_id))
            .filter(activity_participant::Column::IsActive.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Active participant counts for every activity with at least one.
    pub async fn active_participant_counts(&self) -> AppResult<HashMap<String, u64>> {
        #[derive(FromQueryResult)]
        struct ActivityCount {
            activity_id: String,
            total: i64,
        }

        let rows = ActivityParticipant::find()
            .filter(activity_participant::Column::IsActive.eq(true))
            .select_only()
            .column(activity_participant::Column::ActivityId)
            .column_as(activity_participant::Column::Id.count(), "total")
            .group_by(activity_participant::Column::ActivityId)
            .into_model::<ActivityCount>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| (row.activity_id, row.total.max(0) as u64))
            .collect())
    }
}
