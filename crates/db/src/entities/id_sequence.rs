//! Identifier sequence - one counter row per identifier kind.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "id_sequence")]
pub struct Model {
    /// Sequence name (`student`, `staff`).
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,

    /// Last value handed out.
    pub last_value: i64,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
