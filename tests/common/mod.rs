//! Common test utilities

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{middleware, Router};
use chrono::Utc;
use sqlx::Executor;
use uuid::Uuid;

use expense_tracker::api;
use expense_tracker::cache::InMemoryViewCache;
use expense_tracker::domain::{ExpenseEntry, NewExpenseEntry, NewUserAccount, UserAccount};
use expense_tracker::identity::{DirectoryError, DirectoryProfile, IdentityDirectory};
use expense_tracker::store::{ExpenseStore, StoreError};
use expense_tracker::AppState;

/// In-memory store with the same uniqueness rule as the users table
#[derive(Default)]
pub struct MemoryStore {
    pub users: Mutex<Vec<UserAccount>>,
    pub entries: Mutex<Vec<ExpenseEntry>>,
}

#[async_trait]
impl ExpenseStore for MemoryStore {
    async fn find_user_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<UserAccount>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.external_id == external_id)
            .cloned())
    }

    async fn create_user(&self, user: NewUserAccount) -> Result<UserAccount, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.external_id == user.external_id) {
            return Err(StoreError::DuplicateUser(user.external_id));
        }
        let account = UserAccount {
            id: Uuid::new_v4(),
            external_id: user.external_id,
            email: user.email,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
            created_at: Utc::now(),
        };
        users.push(account.clone());
        Ok(account)
    }

    async fn create_expense_entry(
        &self,
        entry: NewExpenseEntry,
    ) -> Result<ExpenseEntry, StoreError> {
        let stored = ExpenseEntry {
            id: Uuid::new_v4(),
            description: entry.description,
            amount: entry.amount,
            category: entry.category,
            occurred_on: entry.occurred_on,
            user_external_id: entry.user_external_id,
            created_at: Utc::now(),
        };
        self.entries.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn list_expense_entries(
        &self,
        external_id: &str,
    ) -> Result<Vec<ExpenseEntry>, StoreError> {
        let mut entries: Vec<ExpenseEntry> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_external_id == external_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.occurred_on.cmp(&a.occurred_on));
        Ok(entries)
    }
}

/// Directory that always fails, as when the provider is unreachable
pub struct UnreachableDirectory;

#[async_trait]
impl IdentityDirectory for UnreachableDirectory {
    async fn get_profile(&self, external_id: &str) -> Result<DirectoryProfile, DirectoryError> {
        Err(DirectoryError::Status {
            status: 503,
            external_id: external_id.to_string(),
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub cache: Arc<InMemoryViewCache>,
}

/// Router with identity middleware over in-memory collaborators
pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::default());
    let cache = Arc::new(InMemoryViewCache::new());
    let state = AppState::new(store.clone(), Arc::new(UnreachableDirectory), cache.clone());

    let router = api::create_router()
        .layer(middleware::from_fn(api::middleware::identity_middleware))
        .with_state(state);

    TestApp {
        router,
        store,
        cache,
    }
}

/// Set up a pool for store tests; requires DATABASE_URL
pub async fn setup_test_db() -> sqlx::PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    // Unprepared execution so the multi-statement file runs as one batch
    (&pool)
        .execute(include_str!("../../migrations/0001_create_users_and_records.sql"))
        .await
        .expect("Failed to apply schema");

    pool
}
