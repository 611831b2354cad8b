//! Event service.

use chrono::Utc;
use schooldesk_common::{AppError, AppResult, id::IdGenerator};
use schooldesk_db::entities::{
    event::{self, EventType},
    grade,
};
use schooldesk_db::repositories::{EventRepository, GradeRepository};
use sea_orm::Set;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

const fn default_true() -> bool {
    true
}

// Stored timestamps are compared as text on SQLite, so they must share an offset.
fn to_utc(at: DateTimeWithTimeZone) -> DateTimeWithTimeZone {
    at.with_timezone(&Utc).fixed_offset()
}

/// Whether an event with the given target set is meant for `grade_id`.
///
/// An empty target set addresses every grade.
#[must_use]
pub fn targets_grade(target_grade_ids: &[String], grade_id: &str) -> bool {
    target_grade_ids.is_empty() || target_grade_ids.iter().any(|id| id == grade_id)
}

/// Input for creating an event.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventInput {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(max = 8192))]
    pub description: Option<String>,
    #[serde(default)]
    pub event_type: EventType,
    pub start_date: Option<DateTimeWithTimeZone>,
    pub end_date: Option<DateTimeWithTimeZone>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    /// Empty means every grade.
    #[serde(default)]
    pub target_grade_ids: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_by_id: Option<String>,
}

/// Input for updating an event.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateEventInput {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(max = 8192))]
    #[serde(default, deserialize_with = "super::nullable")]
    pub description: Option<Option<String>>,
    pub event_type: Option<EventType>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub start_date: Option<Option<DateTimeWithTimeZone>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub end_date: Option<Option<DateTimeWithTimeZone>>,
    #[validate(length(max = 200))]
    #[serde(default, deserialize_with = "super::nullable")]
    pub location: Option<Option<String>>,
    /// Replaces the stored target set when present.
    pub target_grade_ids: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// An event with the grades it targets.
#[derive(Debug, Clone, Serialize)]
pub struct EventDetails {
    #[serde(flatten)]
    pub event: event::Model,
    /// Empty when the event is for every grade.
    pub target_grades: Vec<grade::Model>,
}

/// Service for school events.
#[derive(Clone)]
pub struct EventService {
    event_repo: EventRepository,
    grade_repo: GradeRepository,
    id_gen: IdGenerator,
}

impl EventService {
    /// Create a new event service.
    #[must_use]
    pub const fn new(event_repo: EventRepository, grade_repo: GradeRepository) -> Self {
        Self {
            event_repo,
            grade_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get an event by ID.
    pub async fn get(&self, id: &str) -> AppResult<event::Model> {
        self.event_repo.get_by_id(id).await
    }

    /// Get an event with its target grades.
    pub async fn details(&self, id: &str) -> AppResult<EventDetails> {
        let event = self.event_repo.get_by_id(id).await?;
        let target_grades = self.event_repo.find_target_grades(&event).await?;
        Ok(EventDetails {
            event,
            target_grades,
        })
    }

    /// All events by start date.
    pub async fn list(&self) -> AppResult<Vec<event::Model>> {
        self.event_repo.find_all().await
    }

    /// Active events starting at or after `now`, earliest first.
    pub async fn upcoming(
        &self,
        now: DateTimeWithTimeZone,
        limit: u64,
    ) -> AppResult<Vec<event::Model>> {
        self.event_repo.find_upcoming(now, limit).await
    }

    /// Whether an event is meant for a grade.
    pub async fn is_for_grade(&self, event_id: &str, grade_id: &str) -> AppResult<bool> {
        self.event_repo.get_by_id(event_id).await?;
        let targets = self.event_repo.find_target_grade_ids(event_id).await?;
        Ok(targets_grade(&targets, grade_id))
    }

    async fn check_grades(&self, grade_ids: &[String]) -> AppResult<()> {
        for grade_id in grade_ids {
            self.grade_repo.get_by_id(grade_id).await?;
        }
        Ok(())
    }

    /// Create an event.
    pub async fn create(&self, input: CreateEventInput) -> AppResult<event::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.check_grades(&input.target_grade_ids).await?;

        let model = event::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            description: Set(input.description),
            event_type: Set(input.event_type),
            start_date: Set(input.start_date.map(to_utc)),
            end_date: Set(input.end_date.map(to_utc)),
            location: Set(input.location),
            is_active: Set(input.is_active),
            created_at: Set(Utc::now().into()),
            created_by_id: Set(input.created_by_id),
        };

        self.event_repo.create(model, &input.target_grade_ids).await
    }

    /// Update an event.
    pub async fn update(&self, id: &str, input: UpdateEventInput) -> AppResult<event::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if let Some(grade_ids) = &input.target_grade_ids {
            self.check_grades(grade_ids).await?;
        }

        let event = self.event_repo.get_by_id(id).await?;
        let mut active: event::ActiveModel = event.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(event_type) = input.event_type {
            active.event_type = Set(event_type);
        }
        if let Some(start_date) = input.start_date {
            active.start_date = Set(start_date.map(to_utc));
        }
        if let Some(end_date) = input.end_date {
            active.end_date = Set(end_date.map(to_utc));
        }
        if let Some(location) = input.location {
            active.location = Set(location);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }

        self.event_repo
            .update(active, input.target_grade_ids.as_deref())
            .await
    }

    /// Delete an event.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.event_repo.delete(id).await?;
        info!(id = %id, "Deleted event");
        Ok(())
    }
}
