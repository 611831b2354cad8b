//! Event entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of school event.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[sea_orm(string_value = "academic")]
    Academic,
    #[sea_orm(string_value = "sports")]
    Sports,
    #[sea_orm(string_value = "cultural")]
    Cultural,
    #[sea_orm(string_value = "meeting")]
    Meeting,
    #[sea_orm(string_value = "holiday")]
    Holiday,
    #[sea_orm(string_value = "exam")]
    Exam,
    #[sea_orm(string_value = "other")]
    Other,
}

impl Default for EventType {
    fn default() -> Self {
        Self::Other
    }
}

/// Event entity.
///
/// Target grades live in `event_target_grade`; an empty set means the event
/// is for every grade.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub event_type: EventType,

    #[sea_orm(nullable)]
    pub start_date: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub end_date: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub location: Option<String>,

    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub created_by_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::staff::Entity",
        from = "Column::CreatedById",
        to = "super::staff::Column::Id"
    )]
    CreatedBy,
    #[sea_orm(has_many = "super::event_target_grade::Entity")]
    TargetGrades,
}

impl Related<super::staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatedBy.def()
    }
}

impl Related<super::grade::Entity> for Entity {
    fn to() -> RelationDef {
        super::event_target_grade::Relation::Grade.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::event_target_grade::Relation::Event.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
