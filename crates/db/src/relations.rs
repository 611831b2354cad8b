//! Foreign key kinds and the delete executor built on them.
//!
//! Every foreign key in the schema is listed once in [`FOREIGN_KEYS`] with its
//! [`RelationKind`]. Migrations derive their `ON DELETE` actions from this
//! table, and [`delete_with_dependents`] applies the same rules explicitly so
//! that a delete behaves identically on every backend.

use std::collections::HashSet;

use sea_orm::sea_query::{Alias, Expr, ForeignKey, ForeignKeyAction, ForeignKeyCreateStatement, Query};
use sea_orm::{ConnectionTrait, DbErr};
use serde::Serialize;
use tracing::debug;

/// What happens to a child row when the row it points at is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// The parent owns the child: the child is deleted with it.
    Owning,
    /// The child only references the parent: the column is cleared.
    Referencing,
}

impl RelationKind {
    /// Storage-level action matching this kind.
    #[must_use]
    pub const fn on_delete(self) -> ForeignKeyAction {
        match self {
            Self::Owning => ForeignKeyAction::Cascade,
            Self::Referencing => ForeignKeyAction::SetNull,
        }
    }
}

/// Tables taking part in relationships. Every table has an `id` primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// Class levels.
    Grade,
    /// Enrolled students.
    Student,
    /// Teachers and other staff.
    Staff,
    /// Announcements.
    Notification,
    /// Calendar events.
    Event,
    /// Event to grade join rows.
    EventTargetGrade,
    /// Extracurricular activities.
    Activity,
    /// Activity memberships.
    ActivityParticipant,
    /// Recorded fee payments.
    FeePayment,
}

impl Table {
    /// SQL table name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Grade => "grade",
            Self::Student => "student",
            Self::Staff => "staff",
            Self::Notification => "notification",
            Self::Event => "event",
            Self::EventTargetGrade => "event_target_grade",
            Self::Activity => "activity",
            Self::ActivityParticipant => "activity_participant",
            Self::FeePayment => "fee_payment",
        }
    }
}

/// A single foreign key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeySpec {
    /// Constraint name.
    pub name: &'static str,
    /// Table holding the column.
    pub table: Table,
    /// Column pointing at `parent.id`.
    pub column: &'static str,
    /// Referenced table.
    pub parent: Table,
    /// What deleting the parent does to this row.
    pub kind: RelationKind,
}

impl ForeignKeySpec {
    /// Constraint definition for `Table::create().foreign_key(..)`.
    #[must_use]
    pub fn to_foreign_key(&self) -> ForeignKeyCreateStatement {
        ForeignKey::create()
            .name(self.name)
            .from(Alias::new(self.table.name()), Alias::new(self.column))
            .to(Alias::new(self.parent.name()), Alias::new("id"))
            .on_delete(self.kind.on_delete())
            .to_owned()
    }
}

/// A student belongs to a grade.
pub const STUDENT_GRADE: ForeignKeySpec = ForeignKeySpec {
    name: "fk_student_grade",
    table: Table::Student,
    column: "grade_id",
    parent: Table::Grade,
    kind: RelationKind::Owning,
};

/// Grade a notification is addressed to.
pub const NOTIFICATION_TARGET_GRADE: ForeignKeySpec = ForeignKeySpec {
    name: "fk_notification_target_grade",
    table: Table::Notification,
    column: "target_grade_id",
    parent: Table::Grade,
    kind: RelationKind::Referencing,
};

/// Author of a notification.
pub const NOTIFICATION_CREATED_BY: ForeignKeySpec = ForeignKeySpec {
    name: "fk_notification_created_by",
    table: Table::Notification,
    column: "created_by_id",
    parent: Table::Staff,
    kind: RelationKind::Referencing,
};

/// Organiser of an event.
pub const EVENT_CREATED_BY: ForeignKeySpec = ForeignKeySpec {
    name: "fk_event_created_by",
    table: Table::Event,
    column: "created_by_id",
    parent: Table::Staff,
    kind: RelationKind::Referencing,
};

/// Event side of the event/grade join.
pub const EVENT_TARGET_GRADE_EVENT: ForeignKeySpec = ForeignKeySpec {
    name: "fk_event_target_grade_event",
    table: Table::EventTargetGrade,
    column: "event_id",
    parent: Table::Event,
    kind: RelationKind::Owning,
};

/// Grade side of the event/grade join.
pub const EVENT_TARGET_GRADE_GRADE: ForeignKeySpec = ForeignKeySpec {
    name: "fk_event_target_grade_grade",
    table: Table::EventTargetGrade,
    column: "grade_id",
    parent: Table::Grade,
    kind: RelationKind::Owning,
};

/// Staff member running an activity.
pub const ACTIVITY_INSTRUCTOR: ForeignKeySpec = ForeignKeySpec {
    name: "fk_activity_instructor",
    table: Table::Activity,
    column: "instructor_id",
    parent: Table::Staff,
    kind: RelationKind::Referencing,
};

/// Activity a membership belongs to.
pub const PARTICIPANT_ACTIVITY: ForeignKeySpec = ForeignKeySpec {
    name: "fk_activity_participant_activity",
    table: Table::ActivityParticipant,
    column: "activity_id",
    parent: Table::Activity,
    kind: RelationKind::Owning,
};

/// Student holding a membership.
pub const PARTICIPANT_STUDENT: ForeignKeySpec = ForeignKeySpec {
    name: "fk_activity_participant_student",
    table: Table::ActivityParticipant,
    column: "student_id",
    parent: Table::Student,
    kind: RelationKind::Owning,
};

/// Student a payment was made for.
pub const PAYMENT_STUDENT: ForeignKeySpec = ForeignKeySpec {
    name: "fk_fee_payment_student",
    table: Table::FeePayment,
    column: "student_id",
    parent: Table::Student,
    kind: RelationKind::Owning,
};

/// Staff member who recorded a payment.
pub const PAYMENT_RECORDED_BY: ForeignKeySpec = ForeignKeySpec {
    name: "fk_fee_payment_recorded_by",
    table: Table::FeePayment,
    column: "recorded_by_id",
    parent: Table::Staff,
    kind: RelationKind::Referencing,
};

/// Every foreign key in the schema.
pub const FOREIGN_KEYS: &[ForeignKeySpec] = &[
    STUDENT_GRADE,
    NOTIFICATION_TARGET_GRADE,
    NOTIFICATION_CREATED_BY,
    EVENT_CREATED_BY,
    EVENT_TARGET_GRADE_EVENT,
    EVENT_TARGET_GRADE_GRADE,
    ACTIVITY_INSTRUCTOR,
    PARTICIPANT_ACTIVITY,
    PARTICIPANT_STUDENT,
    PAYMENT_STUDENT,
    PAYMENT_RECORDED_BY,
];

/// Foreign keys pointing at `parent`.
pub fn dependents_of(parent: Table) -> impl Iterator<Item = &'static ForeignKeySpec> {
    FOREIGN_KEYS.iter().filter(move |fk| fk.parent == parent)
}

/// Rows touched by a delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeleteSummary {
    /// Rows removed, the requested ones included.
    pub deleted: u64,
    /// Referencing columns set to NULL.
    pub detached: u64,
}

/// Delete rows of `table` together with everything they own.
///
/// Referencing columns pointing at any deleted row are cleared first, owned
/// descendants are collected level by level, and rows are removed children
/// first so no foreign key is ever left dangling. Run this inside a
/// transaction; the caller decides whether to commit.
pub async fn delete_with_dependents<C>(
    conn: &C,
    table: Table,
    ids: Vec<String>,
) -> Result<DeleteSummary, DbErr>
where
    C: ConnectionTrait,
{
    let backend = conn.get_database_backend();
    let mut summary = DeleteSummary::default();
    let mut pending = vec![(table, ids)];
    let mut plan: Vec<(Table, Vec<String>)> = Vec::new();
    let mut seen: HashSet<(Table, String)> = HashSet::new();

    while let Some((table, ids)) = pending.pop() {
        let ids: Vec<String> = ids
            .into_iter()
            .filter(|id| seen.insert((table, id.clone())))
            .collect();
        if ids.is_empty() {
            continue;
        }

        for fk in dependents_of(table) {
            match fk.kind {
                RelationKind::Referencing => {
                    let stmt = Query::update()
                        .table(Alias::new(fk.table.name()))
                        .value(Alias::new(fk.column), Option::<String>::None)
                        .and_where(Expr::col(Alias::new(fk.column)).is_in(ids.iter().cloned()))
                        .to_owned();
                    let result = conn.execute(backend.build(&stmt)).await?;
                    summary.detached += result.rows_affected();
                }
                RelationKind::Owning => {
                    let stmt = Query::select()
                        .column(Alias::new("id"))
                        .from(Alias::new(fk.table.name()))
                        .and_where(Expr::col(Alias::new(fk.column)).is_in(ids.iter().cloned()))
                        .to_owned();
                    let rows = conn.query_all(backend.build(&stmt)).await?;
                    let child_ids = rows
                        .iter()
                        .map(|row| row.try_get::<String>("", "id"))
                        .collect::<Result<Vec<_>, _>>()?;
                    if !child_ids.is_empty() {
                        pending.push((fk.table, child_ids));
                    }
                }
            }
        }

        plan.push((table, ids));
    }

    // A child always enters the plan after its parent.
    for (table, ids) in plan.into_iter().rev() {
        let stmt = Query::delete()
            .from_table(Alias::new(table.name()))
            .and_where(Expr::col(Alias::new("id")).is_in(ids))
            .to_owned();
        let result = conn.execute(backend.build(&stmt)).await?;
        debug!(table = table.name(), rows = result.rows_affected(), "Deleted rows");
        summary.deleted += result.rows_affected();
    }

    Ok(summary)
}
