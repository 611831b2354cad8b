//! Fee payment entity - payment history for a student.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How a payment was made.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    #[sea_orm(string_value = "cheque")]
    Cheque,
    #[sea_orm(string_value = "online")]
    Online,
    #[sea_orm(string_value = "card")]
    Card,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        Self::Cash
    }
}

/// Fee payment entity.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fee_payment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning student. Deleting the student deletes its payments.
    #[sea_orm(indexed)]
    pub student_id: String,

    /// Always at least 0.01.
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,

    pub payment_method: PaymentMethod,

    #[sea_orm(nullable)]
    pub reference_number: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    pub payment_date: Date,

    /// Set on insert, never updated.
    pub recorded_at: DateTimeWithTimeZone,

    /// Cleared when the staff member is deleted.
    #[sea_orm(nullable)]
    pub recorded_by_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::staff::Entity",
        from = "Column::RecordedById",
        to = "super::staff::Column::Id"
    )]
    RecordedBy,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecordedBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
