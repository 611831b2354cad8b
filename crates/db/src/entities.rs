//! Database entities.

#![allow(missing_docs)]

pub mod activity;
pub mod activity_participant;
pub mod event;
pub mod event_target_grade;
pub mod fee_payment;
pub mod grade;
pub mod id_sequence;
pub mod notification;
pub mod staff;
pub mod student;

pub use activity::Entity as Activity;
pub use activity_participant::Entity as ActivityParticipant;
pub use event::Entity as Event;
pub use event_target_grade::Entity as EventTargetGrade;
pub use fee_payment::Entity as FeePayment;
pub use grade::Entity as Grade;
pub use id_sequence::Entity as IdSequence;
pub use notification::Entity as Notification;
pub use staff::Entity as Staff;
pub use student::Entity as Student;
