//! Staff entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use super::student::RecordStatus;

/// Role of a staff member.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
pub enum StaffRole {
    #[sea_orm(string_value = "Teacher")]
    Teacher,
    #[sea_orm(string_value = "Admin")]
    Admin,
    #[sea_orm(string_value = "Support")]
    Support,
    #[sea_orm(string_value = "Principal")]
    Principal,
    #[sea_orm(string_value = "Vice Principal")]
    #[serde(rename = "Vice Principal")]
    VicePrincipal,
    #[sea_orm(string_value = "Counselor")]
    Counselor,
}

impl Default for StaffRole {
    fn default() -> Self {
        Self::Teacher
    }
}

impl StaffRole {
    /// Stored value of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Teacher => "Teacher",
            Self::Admin => "Admin",
            Self::Support => "Support",
            Self::Principal => "Principal",
            Self::VicePrincipal => "Vice Principal",
            Self::Counselor => "Counselor",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Administrator",
            Self::Support => "Support Staff",
            other => other.as_str(),
        }
    }
}

/// Staff member entity.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "staff")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    /// Human-readable identifier (`STF-0001`), assigned on insert when not supplied.
    #[sea_orm(unique)]
    pub staff_id: String,

    pub role: StaffRole,

    /// e.g. Mathematics, Science.
    #[sea_orm(nullable)]
    pub department: Option<String>,

    #[sea_orm(nullable)]
    pub email: Option<String>,
    #[sea_orm(nullable)]
    pub phone: Option<String>,
    #[sea_orm(nullable)]
    pub address: Option<String>,

    pub date_joined: Date,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub salary: Option<Decimal>,

    pub status: RecordStatus,

    /// Educational qualifications and certifications.
    #[sea_orm(nullable)]
    pub qualifications: Option<String>,

    /// Subjects taught, comma-separated.
    #[sea_orm(nullable)]
    pub subjects: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::notification::Entity")]
    Notifications,
    #[sea_orm(has_many = "super::event::Entity")]
    Events,
    #[sea_orm(has_many = "super::activity::Entity")]
    Activities,
    #[sea_orm(has_many = "super::fee_payment::Entity")]
    RecordedPayments,
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl Related<super::activity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activities.def()
    }
}

impl Related<super::fee_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecordedPayments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
