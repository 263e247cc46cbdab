//! User accounts
//!
//! Local users are materialized lazily from an external identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted user, keyed by the identity provider's id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub external_id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a user
#[derive(Debug, Clone, PartialEq)]
pub struct NewUserAccount {
    pub external_id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl NewUserAccount {
    pub fn new(external_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            email: email.into(),
            display_name: None,
            avatar_url: None,
        }
    }

    /// User with nothing but the placeholder email
    pub fn fallback(external_id: impl Into<String>) -> Self {
        let external_id = external_id.into();
        let email = fallback_email(&external_id);
        Self::new(external_id, email)
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }
}

/// Placeholder email used when the directory has none for us
pub fn fallback_email(external_id: &str) -> String {
    format!("unknown-{}@example.com", external_id)
}
