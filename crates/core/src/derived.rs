//! Derived fields.
//!
//! Everything here is computed from an already loaded record and never
//! stored, so a derived value cannot drift from the columns it is built from.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use schooldesk_db::entities::{activity, grade, student};
use schooldesk_db::repositories::{FeeRow, FeeTotals};
use serde::{Deserialize, Serialize};

/// Balance above which an unpaid student is overdue rather than outstanding.
///
/// Fixed policy, not configurable.
pub const OVERDUE_THRESHOLD: Decimal = Decimal::ONE_HUNDRED;

/// Fee standing of a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing left to pay.
    Paid,
    /// Owes at most [`OVERDUE_THRESHOLD`].
    Outstanding,
    /// Owes more than [`OVERDUE_THRESHOLD`].
    Overdue,
}

impl PaymentStatus {
    /// Classify a balance.
    #[must_use]
    pub fn from_balance(balance: Decimal) -> Self {
        if balance <= Decimal::ZERO {
            Self::Paid
        } else if balance <= OVERDUE_THRESHOLD {
            Self::Outstanding
        } else {
            Self::Overdue
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Outstanding => "outstanding",
            Self::Overdue => "overdue",
        }
    }
}

fn money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `fees_due - fees_paid`, two fractional digits. Negative when overpaid.
#[must_use]
pub fn balance(student: &student::Model) -> Decimal {
    money(student.fees_due - student.fees_paid)
}

/// Fee standing of a student.
#[must_use]
pub fn payment_status(student: &student::Model) -> PaymentStatus {
    PaymentStatus::from_balance(balance(student))
}

/// Whole years between `date_of_birth` and `today`.
#[must_use]
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let years = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years - 1
    } else {
        years
    }
}

/// Age of a student on `today`, if the birth date is known.
#[must_use]
pub fn age(student: &student::Model, today: NaiveDate) -> Option<i32> {
    student.date_of_birth.map(|dob| age_on(dob, today))
}

/// `capacity - student_count`. Negative when over-enrolled.
#[must_use]
pub fn grade_available_spots(grade: &grade::Model, student_count: u64) -> i64 {
    i64::from(grade.capacity) - student_count as i64
}

/// `max_participants - active_participants`. Negative when over-subscribed.
#[must_use]
pub fn activity_available_spots(activity: &activity::Model, active_participants: u64) -> i64 {
    i64::from(activity.max_participants) - active_participants as i64
}

/// `paid / due * 100`, two fractional digits; 0 when nothing is due.
#[must_use]
pub fn collection_percentage(totals: &FeeTotals) -> Decimal {
    if totals.due > Decimal::ZERO {
        money(totals.paid / totals.due * Decimal::ONE_HUNDRED)
    } else {
        Decimal::ZERO
    }
}

/// Sum of positive balances. Overpayments do not offset other students' debt.
#[must_use]
pub fn outstanding_fees(rows: &[FeeRow]) -> Decimal {
    money(
        rows.iter()
            .map(|row| row.fees_due - row.fees_paid)
            .filter(|balance| *balance > Decimal::ZERO)
            .sum(),
    )
}

/// A student with its derived fields, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentView {
    #[serde(flatten)]
    pub student: student::Model,
    /// Name of the student's grade.
    pub grade_name: Option<String>,
    pub balance: Decimal,
    pub payment_status: PaymentStatus,
    pub age: Option<i32>,
}

impl StudentView {
    /// Compute the derived fields of `student` as of `today`.
    #[must_use]
    pub fn new(student: student::Model, grade_name: Option<String>, today: NaiveDate) -> Self {
        Self {
            balance: balance(&student),
            payment_status: payment_status(&student),
            age: age(&student, today),
            grade_name,
            student,
        }
    }

    /// Compute the derived fields as of the current date.
    #[must_use]
    pub fn now(student: student::Model, grade_name: Option<String>) -> Self {
        Self::new(student, grade_name, Utc::now().date_naive())
    }
}
