//! expense_tracker Library
//!
//! Re-exports modules for the server binary and integration testing.

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod domain;
mod error;
pub mod handlers;
pub mod identity;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use domain::{DomainError, ExpenseEntry, OperationContext, RecordData, UserAccount};
pub use handlers::{add_expense_record, RecordResult};
pub use state::AppState;
