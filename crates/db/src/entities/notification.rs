//! Notification entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Notification priority.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "urgent")]
    Urgent,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

/// Who a notification is addressed to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum TargetAudience {
    #[sea_orm(string_value = "all")]
    All,
    #[sea_orm(string_value = "students")]
    Students,
    #[sea_orm(string_value = "staff")]
    Staff,
    #[sea_orm(string_value = "parents")]
    Parents,
    /// Only the grade in `target_grade_id`.
    #[sea_orm(string_value = "grade_specific")]
    GradeSpecific,
}

impl Default for TargetAudience {
    fn default() -> Self {
        Self::All
    }
}

/// Default title for notifications created without one.
pub const DEFAULT_TITLE: &str = "General Notification";

/// Notification entity.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub message: String,

    pub priority: Priority,

    pub target_audience: TargetAudience,

    /// Cleared when the grade is deleted.
    #[sea_orm(nullable)]
    pub target_grade_id: Option<String>,

    pub is_active: bool,

    /// Set on insert, never updated.
    pub date_created: DateTimeWithTimeZone,

    /// Display date, editable.
    pub date: Date,

    /// Cleared when the staff member is deleted.
    #[sea_orm(nullable)]
    pub created_by_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::grade::Entity",
        from = "Column::TargetGradeId",
        to = "super::grade::Column::Id"
    )]
    TargetGrade,
    #[sea_orm(
        belongs_to = "super::staff::Entity",
        from = "Column::CreatedById",
        to = "super::staff::Column::Id"
    )]
    CreatedBy,
}

impl Related<super::grade::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TargetGrade.def()
    }
}

impl Related<super::staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatedBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
