//! Create event and event target grade tables.

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
                    .table(Event::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Event::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Event::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Event::Description).text())
                    .col(
                        ColumnDef::new(Event::EventType)
                            .string_len(20)
                            .not_null()
                            .default("other"),
                    )
                    .col(ColumnDef::new(Event::StartDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Event::EndDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Event::Location).string_len(200))
                    .col(
                        ColumnDef::new(Event::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Event::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Event::CreatedById).string_len(32))
                    .foreign_key(&mut relations::EVENT_CREATED_BY.to_foreign_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_start_date")
                    .table(Event::Table)
                    .col(Event::StartDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EventTargetGrade::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EventTargetGrade::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EventTargetGrade::EventId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EventTargetGrade::GradeId)
                            .string_len(32)
                            .not_null(),
                    )
                    .foreign_key(&mut relations::EVENT_TARGET_GRADE_EVENT.to_foreign_key())
                    .foreign_key(&mut relations::EVENT_TARGET_GRADE_GRADE.to_foreign_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_target_grade_pair")
                    .table(EventTargetGrade::Table)
                    .col(EventTargetGrade::EventId)
                    .col(EventTargetGrade::GradeId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventTargetGrade::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Event::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Event {
    Table,
    Id,
    Title,
    Description,
    EventType,
    StartDate,
    EndDate,
    Location,
    IsActive,
    CreatedAt,
    CreatedById,
}

#[derive(DeriveIden)]
enum EventTargetGrade {
    Table,
    Id,
    EventId,
    GradeId,
}
