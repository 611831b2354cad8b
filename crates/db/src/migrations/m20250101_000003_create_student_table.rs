//! Create student table.

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
                    .table(Student::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Student::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Student::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Student::StudentId)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Student::GradeId).string_len(32).not_null())
                    .col(ColumnDef::new(Student::DateOfBirth).date())
                    .col(ColumnDef::new(Student::Gender).string_len(1))
                    .col(ColumnDef::new(Student::Email).string_len(254))
                    .col(ColumnDef::new(Student::Phone).string_len(15))
                    .col(ColumnDef::new(Student::Address).text())
                    .col(ColumnDef::new(Student::ParentName).string_len(100))
                    .col(ColumnDef::new(Student::ParentPhone).string_len(15))
                    .col(ColumnDef::new(Student::ParentEmail).string_len(254))
                    .col(
                        ColumnDef::new(Student::FeesDue)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Student::FeesPaid)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Student::Status)
                            .string_len(20)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Student::EnrolledOn).date().not_null())
                    .col(
                        ColumnDef::new(Student::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Student::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(&mut relations::STUDENT_GRADE.to_foreign_key())
                    .to_owned(),
            )
            .await?;

        // Listing a grade filtered by status
        manager
            .create_index(
                Index::create()
                    .name("idx_student_grade_status")
                    .table(Student::Table)
                    .col(Student::GradeId)
                    .col(Student::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_student_name")
                    .table(Student::Table)
                    .col(Student::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_student_enrolled_on")
                    .table(Student::Table)
                    .col(Student::EnrolledOn)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Student::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Student {
    Table,
    Id,
    Name,
    StudentId,
    GradeId,
    DateOfBirth,
    Gender,
    Email,
    Phone,
    Address,
    ParentName,
    ParentPhone,
    ParentEmail,
    FeesDue,
    FeesPaid,
    Status,
    EnrolledOn,
    CreatedAt,
    UpdatedAt,
}
