//! Database repositories.

mod activity;
mod event;
mod fee_payment;
mod grade;
pub mod id_sequence;
mod notification;
mod staff;
mod student;

pub use activity::ActivityRepository;
pub use event::EventRepository;
pub use fee_payment::FeePaymentRepository;
pub use grade::GradeRepository;
pub use notification::NotificationRepository;
pub use staff::StaffRepository;
pub use student::{FeeRow, FeeTotals, StudentRepository};

use sea_orm::sea_query::{Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr};

/// Case-insensitive substring match on a text column.
///
/// `%`, `_` and `\` in the query are matched literally.
pub(crate) fn icontains<C: IntoColumnRef>(column: C, query: &str) -> SimpleExpr {
    let escaped = query
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");

    Expr::expr(Func::lower(Expr::col(column)))
        .like(LikeExpr::new(format!("%{escaped}%")).escape('\\'))
}
