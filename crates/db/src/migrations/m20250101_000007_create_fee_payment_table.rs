//! Create fee payment table.

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
                    .table(FeePayment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeePayment::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FeePayment::StudentId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeePayment::Amount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeePayment::PaymentMethod)
                            .string_len(20)
                            .not_null()
                            .default("cash"),
                    )
                    .col(ColumnDef::new(FeePayment::ReferenceNumber).string_len(100))
                    .col(ColumnDef::new(FeePayment::Notes).text())
                    .col(ColumnDef::new(FeePayment::PaymentDate).date().not_null())
                    .col(
                        ColumnDef::new(FeePayment::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(FeePayment::RecordedById).string_len(32))
                    .foreign_key(&mut relations::PAYMENT_STUDENT.to_foreign_key())
                    .foreign_key(&mut relations::PAYMENT_RECORDED_BY.to_foreign_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_fee_payment_student_date")
                    .table(FeePayment::Table)
                    .col(FeePayment::StudentId)
                    .col(FeePayment::PaymentDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FeePayment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum FeePayment {
    Table,
    Id,
    StudentId,
    Amount,
    PaymentMethod,
    ReferenceNumber,
    Notes,
    PaymentDate,
    RecordedAt,
    RecordedById,
}
