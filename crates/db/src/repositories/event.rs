//! Event repository.

use std::sync::Arc;

use chrono::Utc;
use schooldesk_common::id::IdGenerator;
use schooldesk_common::{AppError, AppResult};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use crate::entities::{Event, EventTargetGrade, Grade, event, event_target_grade, grade};
use crate::map_db_err;
use crate::relations::{self, Table};

/// Repository for event operations.
#[derive(Clone)]
pub struct EventRepository {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl EventRepository {
    /// Create a new event repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Find an event by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<event::Model>> {
        Event::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an event by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<event::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event not found: {id}")))
    }

    /// List all events by start date, undated events last.
    pub async fn find_all(&self) -> AppResult<Vec<event::Model>> {
        Event::find()
            .order_by_asc(event::Column::StartDate.is_null())
            .order_by_asc(event::Column::StartDate)
            .order_by_asc(event::Column::Title)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Active events starting at or after `now`, earliest first.
    ///
    /// Start dates are stored in UTC; `now` is converted to match, since SQLite
    /// compares timestamps as text.
    pub async fn find_upcoming(
        &self,
        now: DateTimeWithTimeZone,
        limit: u64,
    ) -> AppResult<Vec<event::Model>> {
        let now = now.with_timezone(&Utc).fixed_offset();
        Event::find()
            .filter(event::Column::IsActive.eq(true))
            .filter(event::Column::StartDate.gte(now))
            .order_by_asc(event::Column::StartDate)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all events.
    pub async fn count(&self) -> AppResult<u64> {
        Event::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ==================== Target Grades ====================

    /// Grades an event targets, ordered by name. Empty means every grade.
    pub async fn find_target_grades(&self, event: &event::Model) -> AppResult<Vec<grade::Model>> {
        event
            .find_related(Grade)
            .order_by_asc(grade::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of the grades an event targets.
    pub async fn find_target_grade_ids(&self, event_id: &str) -> AppResult<Vec<String>> {
        EventTargetGrade::find()
            .filter(event_target_grade::Column::EventId.eq(event_id))
            .select_only()
            .column(event_target_grade::Column::GradeId)
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn replace_targets<C>(
        &self,
        conn: &C,
        event_id: &str,
        grade_ids: &[String],
    ) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        EventTargetGrade::delete_many()
            .filter(event_target_grade::Column::EventId.eq(event_id))
            .exec(conn)
            .await?;

        let mut seen = std::collections::HashSet::new();
        let rows: Vec<_> = grade_ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .map(|grade_id| event_target_grade::ActiveModel {
                id: Set(self.id_gen.generate()),
                event_id: Set(event_id.to_string()),
                grade_id: Set(grade_id.clone()),
            })
            .collect();

        if !rows.is_empty() {
            EventTargetGrade::insert_many(rows)
                .exec_without_returning(conn)
                .await?;
        }

        Ok(())
    }

    // ==================== Mutations ====================

    /// Create an event with its target grades.
    pub async fn create(
        &self,
        model: event::ActiveModel,
        grade_ids: &[String],
    ) -> AppResult<event::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let event = model
            .insert(&txn)
            .await
            .map_err(|e| map_db_err("Event", e))?;

        self.replace_targets(&txn, &event.id, grade_ids)
            .await
            .map_err(|e| map_db_err("Event target grade", e))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(id = %event.id, targets = grade_ids.len(), "Created event");
        Ok(event)
    }

    /// Update an event. When `grade_ids` is given it replaces the stored set.
    pub async fn update(
        &self,
        model: event::ActiveModel,
        grade_ids: Option<&[String]>,
    ) -> AppResult<event::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let event = model
            .update(&txn)
            .await
            .map_err(|e| map_db_err("Event", e))?;

        if let Some(grade_ids) = grade_ids {
            self.replace_targets(&txn, &event.id, grade_ids)
                .await
                .map_err(|e| map_db_err("Event target grade", e))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(event)
    }

    /// Delete an event and its target grade links.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if Event::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .is_none()
        {
            return Err(AppError::NotFound(format!("Event not found: {id}")));
        }

        relations::delete_with_dependents(&txn, Table::Event, vec![id.to_string()])
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(id = %id, "Deleted event");
        Ok(())
    }
}
