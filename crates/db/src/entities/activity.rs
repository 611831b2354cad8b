//! Activity entity (extracurricular clubs, sports, ...).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of activity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    #[sea_orm(string_value = "club")]
    Club,
    #[sea_orm(string_value = "sport")]
    Sport,
    #[sea_orm(string_value = "academic")]
    Academic,
    #[sea_orm(string_value = "volunteer")]
    Volunteer,
    #[sea_orm(string_value = "arts")]
    Arts,
    #[sea_orm(string_value = "music")]
    Music,
    #[sea_orm(string_value = "drama")]
    Drama,
    #[sea_orm(string_value = "other")]
    Other,
}

impl Default for ActivityType {
    fn default() -> Self {
        Self::Other
    }
}

/// Default participant limit.
pub const DEFAULT_MAX_PARTICIPANTS: i32 = 20;

/// Activity entity.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub activity_type: ActivityType,

    /// Cleared when the staff member is deleted.
    #[sea_orm(nullable)]
    pub instructor_id: Option<String>,

    pub max_participants: i32,

    /// Free text, e.g. "Mondays 3-4 PM".
    #[sea_orm(nullable)]
    pub schedule: Option<String>,

    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::staff::Entity",
        from = "Column::InstructorId",
        to = "super::staff::Column::Id"
    )]
    Instructor,
    #[sea_orm(has_many = "super::activity_participant::Entity")]
    Participants,
}

impl Related<super::staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Instructor.def()
    }
}

impl Related<super::activity_participant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
