//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_grade_table;
mod m20250101_000002_create_staff_table;
mod m20250101_000003_create_student_table;
mod m20250101_000004_create_notification_table;
mod m20250101_000005_create_event_tables;
mod m20250101_000006_create_activity_tables;
mod m20250101_000007_create_fee_payment_table;
mod m20250101_000008_create_id_sequence_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_grade_table::Migration),
            Box::new(m20250101_000002_create_staff_table::Migration),
            Box::new(m20250101_000003_create_student_table::Migration),
            Box::new(m20250101_000004_create_notification_table::Migration),
            Box::new(m20250101_000005_create_event_tables::Migration),
            Box::new(m20250101_000006_create_activity_tables::Migration),
            Box::new(m20250101_000007_create_fee_payment_table::Migration),
            Box::new(m20250101_000008_create_id_sequence_table::Migration),
        ]
    }
}
