//! Create notification table.

use sea_orm_migration::prelude::*;

use crate::relations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notification::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notification::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Notification::Title)
                            .string_len(200)
                            .not_null()
                            .default("General Notification"),
                    )
                    .col(ColumnDef::new(Notification::Message).text().not_null())
                    .col(
                        ColumnDef::new(Notification::Priority)
                            .string_len(10)
                            .not_null()
                            .default("medium"),
                    )
                    .col(
                        ColumnDef::new(Notification::TargetAudience)
                            .string_len(20)
                            .not_null()
                            .default("all"),
                    )
                    .col(ColumnDef::new(Notification::TargetGradeId).string_len(32))
                    .col(
                        ColumnDef::new(Notification::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Notification::DateCreated)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Notification::Date).date().not_null())
                    .col(ColumnDef::new(Notification::CreatedById).string_len(32))
                    .foreign_key(&mut relations::NOTIFICATION_TARGET_GRADE.to_foreign_key())
                    .foreign_key(&mut relations::NOTIFICATION_CREATED_BY.to_foreign_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notification_active_created")
                    .table(Notification::Table)
                    .col(Notification::IsActive)
                    .col(Notification::DateCreated)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notification::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Notification {
    Table,
    Id,
    Title,
    Message,
    Priority,
    TargetAudience,
    TargetGradeId,
    IsActive,
    DateCreated,
    Date,
    CreatedById,
}
