//! User Provisioning Handler
//!
//! Finds the local user for an external identity, creating it on first use.

use std::sync::Arc;

use crate::domain::{NewUserAccount, OperationContext, UserAccount};
use crate::identity::IdentityDirectory;
use crate::state::AppState;
use crate::store::{ExpenseStore, StoreError};

/// Find-or-create of users keyed by external identity
pub struct EnsureUserHandler {
    store: Arc<dyn ExpenseStore>,
    directory: Arc<dyn IdentityDirectory>,
}

impl EnsureUserHandler {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            directory: state.directory.clone(),
        }
    }

    /// Return the user for `external_id`, creating it if needed.
    ///
    /// Directory failures never block creation; the user is stored with the
    /// placeholder email instead. If a concurrent request creates the same
    /// user first, that row is returned.
    pub async fn execute(
        &self,
        external_id: &str,
        context: &OperationContext,
    ) -> Result<UserAccount, StoreError> {
        if let Some(user) = self.store.find_user_by_external_id(external_id).await? {
            return Ok(user);
        }

        let new_user = self.profile_for(external_id, context).await;

        match self.store.create_user(new_user).await {
            Ok(user) => {
                tracing::info!(
                    correlation_id = ?context.correlation_id,
                    external_id,
                    user_id = %user.id,
                    "Created local user"
                );
                Ok(user)
            }
            Err(e) if e.is_duplicate_user() => {
                tracing::debug!(
                    correlation_id = ?context.correlation_id,
                    external_id,
                    "User created concurrently, re-fetching"
                );
                self.store
                    .find_user_by_external_id(external_id)
                    .await?
                    .ok_or(e)
            }
            Err(e) => Err(e),
        }
    }

    async fn profile_for(&self, external_id: &str, context: &OperationContext) -> NewUserAccount {
        match self.directory.get_profile(external_id).await {
            Ok(profile) => profile.to_new_user(external_id),
            Err(e) => {
                tracing::warn!(
                    correlation_id = ?context.correlation_id,
                    external_id,
                    error = %e,
                    "Could not fetch directory profile; creating user with fallback email"
                );
                NewUserAccount::fallback(external_id)
            }
        }
    }
}
