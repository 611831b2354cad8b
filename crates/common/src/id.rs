//! ID generation utilities.
//!
//! Two kinds of identifiers exist: opaque ULID primary keys for every row, and
//! the human-readable sequence identifiers (`STU-0001`, `STF-0001`) shown to
//! school staff. Only the formatting and parsing of the latter lives here; the
//! counter itself is kept in the database.

use std::sync::Mutex;

use ulid::{Generator, Ulid};

// Shared so ids from every `IdGenerator` stay ordered within a millisecond.
static GENERATOR: Mutex<Generator> = Mutex::new(Generator::new());

/// ID generator for entity primary keys.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// IDs are monotonic: within one millisecond the random part is
    /// incremented, so ordering by primary key follows creation order.
    #[must_use]
    pub fn generate(&self) -> String {
        let ulid = GENERATOR
            .lock()
            .ok()
            .and_then(|mut generator| generator.generate().ok())
            .unwrap_or_else(Ulid::new);
        ulid.to_string().to_lowercase()
    }
}

/// Kind of human-readable sequence identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    /// `STU-nnnn`
    Student,
    /// `STF-nnnn`
    Staff,
}

impl IdentifierKind {
    /// Display prefix.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Student => "STU",
            Self::Staff => "STF",
        }
    }

    /// Name of the row holding this kind's counter.
    #[must_use]
    pub const fn sequence_name(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Staff => "staff",
        }
    }

    /// Format a sequence value, zero-padded to four digits.
    ///
    /// Values above 9999 keep all their digits (`STU-10000`).
    #[must_use]
    pub fn format(self, value: u32) -> String {
        format!("{}-{value:04}", self.prefix())
    }
}

/// Extract the sequence value from an existing identifier.
///
/// Takes the text after the last hyphen. An identifier without a hyphen, or
/// whose suffix is not a number, counts as 0.
#[must_use]
pub fn parse_sequence(identifier: &str) -> u32 {
    identifier
        .rsplit_once('-')
        .and_then(|(_, suffix)| suffix.trim().parse().ok())
        .unwrap_or(0)
}

/// Next identifier after the most recently created one, if any.
#[must_use]
pub fn next_identifier(kind: IdentifierKind, last: Option<&str>) -> String {
    kind.format(last.map_or(0, parse_sequence).saturating_add(1))
}
