//! Create staff table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Staff::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Staff::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Staff::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Staff::StaffId)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Staff::Role)
                            .string_len(50)
                            .not_null()
                            .default("Teacher"),
                    )
                    .col(ColumnDef::new(Staff::Department).string_len(100))
                    .col(ColumnDef::new(Staff::Email).string_len(254))
                    .col(ColumnDef::new(Staff::Phone).string_len(15))
                    .col(ColumnDef::new(Staff::Address).text())
                    .col(ColumnDef::new(Staff::DateJoined).date().not_null())
                    .col(ColumnDef::new(Staff::Salary).decimal_len(10, 2))
                    .col(
                        ColumnDef::new(Staff::Status)
                            .string_len(20)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Staff::Qualifications).text())
                    .col(ColumnDef::new(Staff::Subjects).string_len(200))
                    .col(
                        ColumnDef::new(Staff::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Staff::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_staff_role_status")
                    .table(Staff::Table)
                    .col(Staff::Role)
                    .col(Staff::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_staff_name")
                    .table(Staff::Table)
                    .col(Staff::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Staff::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Staff {
    Table,
    Id,
    Name,
    StaffId,
    Role,
    Department,
    Email,
    Phone,
    Address,
    DateJoined,
    Salary,
    Status,
    Qualifications,
    Subjects,
    CreatedAt,
    UpdatedAt,
}
