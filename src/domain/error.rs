//! Domain Error Types
//!
//! Pure input errors that don't depend on infrastructure.

use thiserror::Error;

/// Errors raised while turning raw form fields into an expense.
///
/// The `Display` text of each variant is the message returned to the
/// submitting client, so it must stay stable.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A required field was absent or blank
    #[error("Text, amount, category, or date is missing")]
    MissingField(&'static str),

    /// Amount did not parse to a finite number
    #[error("Invalid amount")]
    InvalidAmount(String),

    /// Date was not a `YYYY-MM-DD` calendar date
    #[error("Invalid date format")]
    InvalidDate(String),
}

impl DomainError {
    /// Name of the offending form field
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField(field) => field,
            Self::InvalidAmount(_) => "amount",
            Self::InvalidDate(_) => "date",
        }
    }
}
