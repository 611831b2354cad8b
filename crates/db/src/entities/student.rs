//! Student entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Enrollment or employment status, shared by students and staff.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "graduated")]
    Graduated,
    #[sea_orm(string_value = "transferred")]
    Transferred,
}

impl Default for RecordStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// Student gender. Absent when not recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(1))")]
pub enum Gender {
    #[sea_orm(string_value = "M")]
    #[serde(rename = "M")]
    Male,
    #[sea_orm(string_value = "F")]
    #[serde(rename = "F")]
    Female,
}

/// Student entity.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    /// Human-readable identifier (`STU-0001`), assigned on insert when not supplied.
    #[sea_orm(unique)]
    pub student_id: String,

    /// Owning grade. Deleting the grade deletes the student.
    #[sea_orm(indexed)]
    pub grade_id: String,

    #[sea_orm(nullable)]
    pub date_of_birth: Option<Date>,

    #[sea_orm(nullable)]
    pub gender: Option<Gender>,

    // Contact
    #[sea_orm(nullable)]
    pub email: Option<String>,
    #[sea_orm(nullable)]
    pub phone: Option<String>,
    #[sea_orm(nullable)]
    pub address: Option<String>,

    // Parent / guardian
    #[sea_orm(nullable)]
    pub parent_name: Option<String>,
    #[sea_orm(nullable)]
    pub parent_phone: Option<String>,
    #[sea_orm(nullable)]
    pub parent_email: Option<String>,

    /// Total fees charged, two fractional digits, never negative.
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub fees_due: Decimal,

    /// Total fees received, two fractional digits, never negative.
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub fees_paid: Decimal,

    pub status: RecordStatus,

    pub enrolled_on: Date,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::grade::Entity",
        from = "Column::GradeId",
        to = "super::grade::Column::Id"
    )]
    Grade,
    #[sea_orm(has_many = "super::fee_payment::Entity")]
    Payments,
    #[sea_orm(has_many = "super::activity_participant::Entity")]
    Participations,
}

impl Related<super::grade::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grade.def()
    }
}

impl Related<super::fee_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::activity_participant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
