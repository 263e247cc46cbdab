//! PostgreSQL store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{ExpenseEntry, NewExpenseEntry, NewUserAccount, UserAccount};

use super::{ExpenseStore, StoreError};

type UserRow = (Uuid, String, String, Option<String>, Option<String>, DateTime<Utc>);
type RecordRow = (Uuid, String, f64, String, DateTime<Utc>, String, DateTime<Utc>);

fn user_from_row(
    (id, external_id, email, display_name, avatar_url, created_at): UserRow,
) -> UserAccount {
    UserAccount {
        id,
        external_id,
        email,
        display_name,
        avatar_url,
        created_at,
    }
}

fn entry_from_row(
    (id, description, amount, category, occurred_on, user_external_id, created_at): RecordRow,
) -> ExpenseEntry {
    ExpenseEntry {
        id,
        description,
        amount,
        category,
        occurred_on,
        user_external_id,
        created_at,
    }
}

/// Store backed by the `users` and `records` tables
#[derive(Debug, Clone)]
pub struct PgExpenseStore {
    pool: PgPool,
}

impl PgExpenseStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExpenseStore for PgExpenseStore {
    async fn find_user_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<UserAccount>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, external_id, email, display_name, avatar_url, created_at
            FROM users
            WHERE external_id = $1
            "#,
        )
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(user_from_row))
    }

    async fn create_user(&self, user: NewUserAccount) -> Result<UserAccount, StoreError> {
        // Untargeted so a racing insert of the same user conflicts on either
        // unique key (external id or email) instead of raising 23505
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            INSERT INTO users (id, external_id, email, display_name, avatar_url, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT DO NOTHING
            RETURNING id, external_id, email, display_name, avatar_url, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.external_id)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.avatar_url)
        .fetch_optional(&self.pool)
        .await?;

        row.map(user_from_row)
            .ok_or(StoreError::DuplicateUser(user.external_id))
    }

    async fn create_expense_entry(
        &self,
        entry: NewExpenseEntry,
    ) -> Result<ExpenseEntry, StoreError> {
        let row: RecordRow = sqlx::query_as(
            r#"
            INSERT INTO records (id, text, amount, category, date, user_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING id, text, amount, category, date, user_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&entry.description)
        .bind(entry.amount)
        .bind(&entry.category)
        .bind(entry.occurred_on)
        .bind(&entry.user_external_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(
            "Record {} stored for user {}",
            row.0,
            entry.user_external_id
        );

        Ok(entry_from_row(row))
    }

    async fn list_expense_entries(
        &self,
        external_id: &str,
    ) -> Result<Vec<ExpenseEntry>, StoreError> {
        let rows: Vec<RecordRow> = sqlx::query_as(
            r#"
            SELECT id, text, amount, category, date, user_id, created_at
            FROM records
            WHERE user_id = $1
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(external_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(entry_from_row).collect())
    }
}
