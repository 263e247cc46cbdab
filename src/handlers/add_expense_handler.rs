//! Add Expense Record Handler
//!
//! Validates a submitted expense, provisions the caller's user and stores
//! the entry.

use std::sync::Arc;

use crate::cache::{ViewCache, ROOT_VIEW_PATH};
use crate::domain::{ExpenseForm, FormFields, OperationContext, RecordData};
use crate::identity::CallerIdentity;
use crate::state::AppState;
use crate::store::ExpenseStore;

use super::user_handler::EnsureUserHandler;
use super::{AddRecordError, RecordResult};

/// Handler for expense submissions
pub struct AddExpenseRecordHandler {
    store: Arc<dyn ExpenseStore>,
    cache: Arc<dyn ViewCache>,
    users: EnsureUserHandler,
}

impl AddExpenseRecordHandler {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            cache: state.cache.clone(),
            users: EnsureUserHandler::new(state),
        }
    }

    /// Execute one submission.
    ///
    /// Input and identity are checked before any store access. A user created
    /// here stays persisted even if the entry insert then fails.
    pub async fn execute(
        &self,
        fields: &FormFields,
        identity: Option<&CallerIdentity>,
        context: &OperationContext,
    ) -> Result<RecordData, AddRecordError> {
        let form = ExpenseForm::parse(fields).inspect_err(|e| {
            tracing::debug!(
                correlation_id = ?context.correlation_id,
                field = e.field(),
                "Rejected expense submission: {}",
                e
            );
        })?;

        let identity = identity.ok_or(AddRecordError::Unauthenticated)?;
        let external_id = identity.external_id();

        let user = self
            .users
            .execute(external_id, context)
            .await
            .map_err(|e| unexpected(e, context))?;

        let entry = self
            .store
            .create_expense_entry(form.into_new_entry(user.external_id))
            .await
            .map_err(|e| unexpected(e, context))?;

        self.cache.invalidate(ROOT_VIEW_PATH);

        tracing::info!(
            correlation_id = ?context.correlation_id,
            external_id,
            record_id = %entry.id,
            category = %entry.category,
            "Expense record added"
        );

        Ok(RecordData::from(&entry))
    }

    /// Execute and fold the outcome into the client result shape
    pub async fn handle(
        &self,
        fields: &FormFields,
        identity: Option<&CallerIdentity>,
        context: &OperationContext,
    ) -> RecordResult {
        self.execute(fields, identity, context).await.into()
    }
}

fn unexpected(e: crate::store::StoreError, context: &OperationContext) -> AddRecordError {
    tracing::error!(
        correlation_id = ?context.correlation_id,
        error = ?e,
        "Error adding expense record"
    );
    AddRecordError::Unexpected(e)
}
