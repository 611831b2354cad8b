//! Activity service.
//!
//! Joining does not check `max_participants`; an activity may be
//! over-subscribed, in which case its available spots go negative.

use chrono::Utc;
use schooldesk_common::{AppError, AppResult, id::IdGenerator};
use schooldesk_db::entities::activity::{self, ActivityType, DEFAULT_MAX_PARTICIPANTS};
use schooldesk_db::entities::{activity_participant, student};
use schooldesk_db::repositories::{ActivityRepository, StudentRepository};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::derived::activity_available_spots;

const fn default_true() -> bool {
    true
}

const fn default_max_participants() -> i32 {
    DEFAULT_MAX_PARTICIPANTS
}

/// Input for creating an activity.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateActivityInput {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(max = 8192))]
    pub description: Option<String>,
    #[serde(default)]
    pub activity_type: ActivityType,
    pub instructor_id: Option<String>,
    #[serde(default = "default_max_participants")]
    #[validate(range(min = 0))]
    pub max_participants: i32,
    #[validate(length(max = 200))]
    pub schedule: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Input for updating an activity.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateActivityInput {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(max = 8192))]
    #[serde(default, deserialize_with = "super::nullable")]
    pub description: Option<Option<String>>,
    pub activity_type: Option<ActivityType>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub instructor_id: Option<Option<String>>,
    #[validate(range(min = 0))]
    pub max_participants: Option<i32>,
    #[validate(length(max = 200))]
    #[serde(default, deserialize_with = "super::nullable")]
    pub schedule: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// Input for adding a student to an activity.
#[derive(Debug, Deserialize, Validate)]
pub struct JoinActivityInput {
    #[validate(length(min = 1))]
    pub student_id: String,
}

/// An activity with its membership figures.
#[derive(Debug, Clone, Serialize)]
pub struct ActivitySummary {
    #[serde(flatten)]
    pub activity: activity::Model,
    pub active_participants: u64,
    /// May be negative when over-subscribed.
    pub available_spots: i64,
}

impl ActivitySummary {
    fn new(activity: activity::Model, active_participants: u64) -> Self {
        Self {
            available_spots: activity_available_spots(&activity, active_participants),
            active_participants,
            activity,
        }
    }
}

/// A participant row with the student's name.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantView {
    #[serde(flatten)]
    pub participant: activity_participant::Model,
    pub student_name: Option<String>,
    /// Human-readable student identifier.
    pub student_number: Option<String>,
}

impl From<(activity_participant::Model, Option<student::Model>)> for ParticipantView {
    fn from((participant, student): (activity_participant::Model, Option<student::Model>)) -> Self {
        let (student_name, student_number) = student
            .map(|s| (Some(s.name), Some(s.student_id)))
            .unwrap_or_default();
        Self {
            participant,
            student_name,
            student_number,
        }
    }
}

/// An activity with all its participants.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityDetails {
    #[serde(flatten)]
    pub summary: ActivitySummary,
    /// Every participant row, inactive ones included.
    pub participant_count: u64,
    pub participants: Vec<ParticipantView>,
}

/// Service for extracurricular activities.
#[derive(Clone)]
pub struct ActivityService {
    activity_repo: ActivityRepository,
    student_repo: StudentRepository,
    id_gen: IdGenerator,
}

impl ActivityService {
    /// Create a new activity service.
    #[must_use]
    pub const fn new(activity_repo: ActivityRepository, student_repo: StudentRepository) -> Self {
        Self {
            activity_repo,
            student_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get an activity by ID.
    pub async fn get(&self, id: &str) -> AppResult<activity::Model> {
        self.activity_repo.get_by_id(id).await
    }

    /// All activities by title, with their membership figures.
    pub async fn list(&self) -> AppResult<Vec<ActivitySummary>> {
        let activities = self.activity_repo.find_all().await?;
        let counts = self.activity_repo.active_participant_counts().await?;

        Ok(activities
            .into_iter()
            .map(|activity| {
                let active = counts.get(&activity.id).copied().unwrap_or(0);
                ActivitySummary::new(activity, active)
            })
            .collect())
    }

    /// Membership figures of one activity.
    pub async fn summary(&self, id: &str) -> AppResult<ActivitySummary> {
        let activity = self.activity_repo.get_by_id(id).await?;
        let active = self.activity_repo.active_participant_count(id).await?;
        Ok(ActivitySummary::new(activity, active))
    }

    /// An activity with its participants.
    pub async fn details(&self, id: &str) -> AppResult<ActivityDetails> {
        let summary = self.summary(id).await?;
        let participant_count = self.activity_repo.participant_count(id).await?;
        let participants = self.participants(id).await?;

        Ok(ActivityDetails {
            summary,
            participant_count,
            participants,
        })
    }

    /// Participants of an activity by join date.
    pub async fn participants(&self, id: &str) -> AppResult<Vec<ParticipantView>> {
        Ok(self
            .activity_repo
            .find_participants(id)
            .await?
            .into_iter()
            .map(ParticipantView::from)
            .collect())
    }

    /// Create an activity.
    pub async fn create(&self, input: CreateActivityInput) -> AppResult<activity::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let model = activity::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            description: Set(input.description),
            activity_type: Set(input.activity_type),
            instructor_id: Set(input.instructor_id),
            max_participants: Set(input.max_participants),
            schedule: Set(input.schedule),
            is_active: Set(input.is_active),
            created_at: Set(Utc::now().into()),
        };

        let activity = self.activity_repo.create(model).await?;
        info!(id = %activity.id, title = %activity.title, "Created activity");
        Ok(activity)
    }

    /// Update an activity.
    pub async fn update(
        &self,
        id: &str,
        input: UpdateActivityInput,
    ) -> AppResult<activity::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let activity = self.activity_repo.get_by_id(id).await?;
        let mut active: activity::ActiveModel = activity.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(activity_type) = input.activity_type {
            active.activity_type = Set(activity_type);
        }
        if let Some(instructor_id) = input.instructor_id {
            active.instructor_id = Set(instructor_id);
        }
        if let Some(max_participants) = input.max_participants {
            active.max_participants = Set(max_participants);
        }
        if let Some(schedule) = input.schedule {
            active.schedule = Set(schedule);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }

        self.activity_repo.update(active).await
    }

    /// Delete an activity and its participant rows.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.activity_repo.delete(id).await
    }

    /// Add a student to an activity. Joining twice is a conflict.
    pub async fn join(
        &self,
        activity_id: &str,
        input: JoinActivityInput,
    ) -> AppResult<activity_participant::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.activity_repo.get_by_id(activity_id).await?;
        self.student_repo.get_by_id(&input.student_id).await?;

        let model = activity_participant::ActiveModel {
            id: Set(self.id_gen.generate()),
            activity_id: Set(activity_id.to_string()),
            student_id: Set(input.student_id),
            date_joined: Set(Utc::now().date_naive()),
            is_active: Set(true),
        };

        let participant = self.activity_repo.add_participant(model).await?;
        info!(
            activity_id = %participant.activity_id,
            student_id = %participant.student_id,
            "Student joined activity"
        );
        Ok(participant)
    }

    /// Remove a student from an activity.
    pub async fn leave(&self, activity_id: &str, student_id: &str) -> AppResult<()> {
        self.activity_repo
            .remove_participant(activity_id, student_id)
            .await?;
        info!(activity_id = %activity_id, student_id = %student_id, "Student left activity");
        Ok(())
    }

    /// Mark a participant active or inactive without removing the row.
    pub async fn set_participant_active(
        &self,
        activity_id: &str,
        student_id: &str,
        is_active: bool,
    ) -> AppResult<activity_participant::Model> {
        self.activity_repo
            .set_participant_active(activity_id, student_id, is_active)
            .await
    }
}
