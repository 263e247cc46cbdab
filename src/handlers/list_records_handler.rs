//! List Records Handler
//!
//! Serves the caller's root listing, cached until the next write.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::cache::{ViewCache, ROOT_VIEW_PATH};
use crate::domain::RecordData;
use crate::state::AppState;
use crate::store::{ExpenseStore, StoreError};

pub struct ListRecordsHandler {
    store: Arc<dyn ExpenseStore>,
    cache: Arc<dyn ViewCache>,
}

impl ListRecordsHandler {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            cache: state.cache.clone(),
        }
    }

    /// `{ "records": [...] }` for `external_id`
    pub async fn execute(&self, external_id: &str) -> Result<Value, StoreError> {
        if let Some(view) = self.cache.get(ROOT_VIEW_PATH, external_id) {
            return Ok(view);
        }

        let generation = self.cache.generation();
        let records: Vec<RecordData> = self
            .store
            .list_expense_entries(external_id)
            .await?
            .iter()
            .map(RecordData::from)
            .collect();

        let view = json!({ "records": records });
        self.cache
            .put(ROOT_VIEW_PATH, external_id, view.clone(), generation);

        Ok(view)
    }
}
