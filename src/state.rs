//! Shared application state

use std::sync::Arc;

use crate::cache::ViewCache;
use crate::identity::IdentityDirectory;
use crate::store::ExpenseStore;

/// Collaborators shared by every request
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ExpenseStore>,
    pub directory: Arc<dyn IdentityDirectory>,
    pub cache: Arc<dyn ViewCache>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ExpenseStore>,
        directory: Arc<dyn IdentityDirectory>,
        cache: Arc<dyn ViewCache>,
    ) -> Self {
        Self {
            store,
            directory,
            cache,
        }
    }
}
