//! Common utilities and shared types for schooldesk.
//!
//! This crate provides foundational components used across all schooldesk crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID primary keys via [`IdGenerator`] and the
//!   human-readable `STU-0001` / `STF-0001` identifiers via [`IdentifierKind`]
//!
//! # Example
//!
//! ```no_run
//! use schooldesk_common::{AppResult, Config, IdGenerator, IdentifierKind};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id = IdGenerator::new().generate();
//!     println!("{} listening on {}", id, config.server.port);
//!     assert_eq!(IdentifierKind::Student.format(7), "STU-0007");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::{IdGenerator, IdentifierKind};
