//! Store module
//!
//! Persistence of users and expense entries.

pub mod postgres;

use async_trait::async_trait;

use crate::domain::{ExpenseEntry, NewExpenseEntry, NewUserAccount, UserAccount};

pub use postgres::PgExpenseStore;

/// Store Error
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The insert hit a unique key (external id or email) already taken
    #[error("User already exists for external id {0}")]
    DuplicateUser(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn is_duplicate_user(&self) -> bool {
        matches!(self, StoreError::DuplicateUser(_))
    }
}

/// Persistence operations the handlers depend on
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    async fn find_user_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<UserAccount>, StoreError>;

    /// Insert a user. Fails with [`StoreError::DuplicateUser`] when the
    /// external id or email is already taken.
    async fn create_user(&self, user: NewUserAccount) -> Result<UserAccount, StoreError>;

    async fn create_expense_entry(
        &self,
        entry: NewExpenseEntry,
    ) -> Result<ExpenseEntry, StoreError>;

    /// Entries owned by `external_id`, most recent date first
    async fn list_expense_entries(
        &self,
        external_id: &str,
    ) -> Result<Vec<ExpenseEntry>, StoreError>;
}
