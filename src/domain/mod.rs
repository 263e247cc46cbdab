//! Domain module
//!
//! Core domain types and input rules.

pub mod context;
pub mod error;
pub mod expense;
pub mod user;

pub use context::OperationContext;
pub use error::DomainError;
pub use expense::{
    format_instant, normalize_date, parse_amount, ExpenseEntry, ExpenseForm, FormFields,
    NewExpenseEntry, RecordData,
};
pub use user::{fallback_email, NewUserAccount, UserAccount};
