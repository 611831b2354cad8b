//! Create identifier sequence table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Rows are created lazily on first use
        manager
            .create_table(
                Table::create()
                    .table(IdSequence::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IdSequence::Name)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(IdSequence::LastValue)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(IdSequence::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IdSequence::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum IdSequence {
    Table,
    Name,
    LastValue,
    UpdatedAt,
}
