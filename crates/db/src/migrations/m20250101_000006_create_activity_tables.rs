//! Create activity and activity participant tables.

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
                    .table(Activity::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Activity::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Activity::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Activity::Description).text())
                    .col(
                        ColumnDef::new(Activity::ActivityType)
                            .string_len(20)
                            .not_null()
                            .default("other"),
                    )
                    .col(ColumnDef::new(Activity::InstructorId).string_len(32))
                    .col(
                        ColumnDef::new(Activity::MaxParticipants)
                            .integer()
                            .not_null()
                            .default(20),
                    )
                    .col(ColumnDef::new(Activity::Schedule).string_len(200))
                    .col(
                        ColumnDef::new(Activity::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Activity::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(&mut relations::ACTIVITY_INSTRUCTOR.to_foreign_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ActivityParticipant::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivityParticipant::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ActivityParticipant::ActivityId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ActivityParticipant::StudentId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ActivityParticipant::DateJoined)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ActivityParticipant::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(&mut relations::PARTICIPANT_ACTIVITY.to_foreign_key())
                    .foreign_key(&mut relations::PARTICIPANT_STUDENT.to_foreign_key())
                    .to_owned(),
            )
            .await?;

        // A student joins an activity at most once
        manager
            .create_index(
                Index::create()
                    .name("idx_activity_participant_pair")
                    .table(ActivityParticipant::Table)
                    .col(ActivityParticipant::ActivityId)
                    .col(ActivityParticipant::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityParticipant::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Activity::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Activity {
    Table,
    Id,
    Title,
    Description,
    ActivityType,
    InstructorId,
    MaxParticipants,
    Schedule,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ActivityParticipant {
    Table,
    Id,
    ActivityId,
    StudentId,
    DateJoined,
    IsActive,
}
