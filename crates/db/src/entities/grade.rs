//! Grade entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A grade (class level) that students are enrolled in.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "grade")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Grade name, unique across the school.
    #[sea_orm(unique)]
    pub name: String,

    /// Description or notes.
    #[sea_orm(nullable)]
    pub description: Option<String>,

    /// Maximum students per grade. Not enforced on enrollment.
    pub capacity: i32,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::student::Entity")]
    Students,
    #[sea_orm(has_many = "super::notification::Entity")]
    Notifications,
    #[sea_orm(has_many = "super::event_target_grade::Entity")]
    EventTargets,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        super::event_target_grade::Relation::Event.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::event_target_grade::Relation::Grade.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
