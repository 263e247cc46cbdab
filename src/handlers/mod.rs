//! Command Handlers module
//!
//! Handlers that orchestrate validation, the store and the identity
//! directory for one request.

mod add_expense_handler;
mod commands;
mod list_records_handler;
mod user_handler;


pub use add_expense_handler::AddExpenseRecordHandler;
pub use commands::*;
pub use list_records_handler::ListRecordsHandler;
pub use user_handler::EnsureUserHandler;

use crate::domain::{FormFields, OperationContext};
use crate::identity::CallerIdentity;
use crate::state::AppState;

/// Add one expense record for `identity`
pub async fn add_expense_record(
    state: &AppState,
    fields: &FormFields,
    identity: Option<&CallerIdentity>,
) -> RecordResult {
    let mut context = OperationContext::new();
    if let Some(identity) = identity {
        context = context.with_external_id(identity.external_id());
    }
    context.ensure_correlation_id();

    AddExpenseRecordHandler::new(state)
        .handle(fields, identity, &context)
        .await
}
