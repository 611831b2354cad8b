//! Human-readable identifier counters.
//!
//! Each identifier kind owns one row in `id_sequence`. Taking the next value is
//! a single `UPDATE ... SET last_value = last_value + 1` followed by a read, run
//! on the caller's transaction so the row stays locked until the new record is
//! committed.

use chrono::Utc;
use schooldesk_common::id::{IdentifierKind, parse_sequence};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::debug;

use crate::entities::{IdSequence, Staff, Student, id_sequence, staff, student};

/// Take the next identifier of `kind`.
///
/// When the counter row does not exist yet it is seeded from the identifier of
/// the most recently created record of that kind.
pub async fn assign<C>(conn: &C, kind: IdentifierKind) -> Result<String, DbErr>
where
    C: ConnectionTrait,
{
    if bump(conn, kind).await? == 0 {
        let seed = last_assigned(conn, kind).await?;
        debug!(sequence = kind.sequence_name(), seed, "Seeding identifier sequence");

        let row = id_sequence::ActiveModel {
            name: Set(kind.sequence_name().to_string()),
            last_value: Set(i64::from(seed)),
            updated_at: Set(Utc::now().into()),
        };
        // Another writer may have seeded it in the meantime.
        IdSequence::insert(row)
            .on_conflict(
                OnConflict::column(id_sequence::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await?;

        bump(conn, kind).await?;
    }

    let value = current(conn, kind)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(kind.sequence_name().to_string()))?;
    let value = u32::try_from(value)
        .map_err(|_| DbErr::Custom(format!("{} sequence out of range", kind.sequence_name())))?;

    Ok(kind.format(value))
}

/// Last value handed out for `kind`, if the counter exists.
pub async fn current<C>(conn: &C, kind: IdentifierKind) -> Result<Option<i64>, DbErr>
where
    C: ConnectionTrait,
{
    Ok(IdSequence::find_by_id(kind.sequence_name())
        .one(conn)
        .await?
        .map(|row| row.last_value))
}

/// Drop every counter so the next identifier of each kind is seeded afresh.
pub async fn reset<C>(conn: &C) -> Result<u64, DbErr>
where
    C: ConnectionTrait,
{
    let result = IdSequence::delete_many().exec(conn).await?;
    debug!(counters = result.rows_affected, "Reset identifier sequences");
    Ok(result.rows_affected)
}

async fn bump<C>(conn: &C, kind: IdentifierKind) -> Result<u64, DbErr>
where
    C: ConnectionTrait,
{
    let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
    let result = IdSequence::update_many()
        .col_expr(
            id_sequence::Column::LastValue,
            Expr::col(id_sequence::Column::LastValue).add(1),
        )
        .col_expr(id_sequence::Column::UpdatedAt, Expr::value(now))
        .filter(id_sequence::Column::Name.eq(kind.sequence_name()))
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}

/// Sequence value of the most recently created record, 0 when there is none
/// or its identifier is malformed.
async fn last_assigned<C>(conn: &C, kind: IdentifierKind) -> Result<u32, DbErr>
where
    C: ConnectionTrait,
{
    let last = match kind {
        IdentifierKind::Student => Student::find()
            .order_by_desc(student::Column::CreatedAt)
            .order_by_desc(student::Column::Id)
            .one(conn)
            .await?
            .map(|s| s.student_id),
        IdentifierKind::Staff => Staff::find()
            .order_by_desc(staff::Column::CreatedAt)
            .order_by_desc(staff::Column::Id)
            .one(conn)
            .await?
            .map(|s| s.staff_id),
    };

    Ok(last.as_deref().map_or(0, parse_sequence))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn counter(name: &str, last_value: i64) -> id_sequence::Model {
        id_sequence::Model {
            name: name.to_string(),
            last_value,
            updated_at: Utc::now().into(),
        }
    }

    fn staff_member(staff_id: &str) -> staff::Model {
        staff::Model {
            id: "s1".to_string(),
            name: "Ada".to_string(),
            staff_id: staff_id.to_string(),
            role: staff::StaffRole::Teacher,
            department: None,
            email: None,
            phone: None,
            address: None,
            date_joined: Utc::now().date_naive(),
            salary: Some(Decimal::new(250_000, 2)),
            status: staff::RecordStatus::Active,
            qualifications: None,
            subjects: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_assign_existing_counter() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1)])
            .append_query_results([[counter("student", 42)]])
            .into_connection();

        let id = assign(&db, IdentifierKind::Student).await.unwrap();
        assert_eq!(id, "STU-0042");
    }

    #[tokio::test]
    async fn test_assign_seeds_from_last_record() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0), exec(1), exec(1)])
            .append_query_results([[staff_member("STF-0007")]])
            .append_query_results([[counter("staff", 8)]])
            .into_connection();

        let id = assign(&db, IdentifierKind::Staff).await.unwrap();
        assert_eq!(id, "STF-0008");
    }

    #[tokio::test]
    async fn test_reset_removes_all_counters() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(2)])
            .into_connection();

        assert_eq!(reset(&db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_current_missing_counter() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<id_sequence::Model>::new()])
            .into_connection();

        assert_eq!(current(&db, IdentifierKind::Student).await.unwrap(), None);
    }
}
