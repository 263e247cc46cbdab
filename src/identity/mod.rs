//! Identity module
//!
//! Caller identity and the identity provider's user directory.

pub mod directory;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{fallback_email, NewUserAccount};

pub use directory::HttpIdentityDirectory;

/// The authenticated caller, as asserted by the session gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    external_id: String,
}

impl CallerIdentity {
    pub fn new(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
        }
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }
}

// =========================================================================
// Directory profile
// =========================================================================

/// One address on a directory profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub id: String,
    pub email_address: String,
}

/// User details as returned by the identity provider
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DirectoryProfile {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email_addresses: Vec<EmailAddress>,
    #[serde(default)]
    pub primary_email_address_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<EmailAddress>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<EmailAddress>>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl DirectoryProfile {
    /// The designated primary address, else the first one listed
    pub fn primary_email(&self) -> Option<&str> {
        let designated = self.primary_email_address_id.as_deref().and_then(|primary_id| {
            self.email_addresses
                .iter()
                .find(|address| address.id == primary_id)
        });

        designated
            .or_else(|| self.email_addresses.first())
            .map(|address| address.email_address.trim())
            .filter(|address| !address.is_empty())
    }

    /// First name, else last name, else full name
    pub fn display_name(&self) -> Option<&str> {
        non_blank(&self.first_name)
            .or_else(|| non_blank(&self.last_name))
            .or_else(|| non_blank(&self.full_name))
    }

    pub fn avatar_url(&self) -> Option<&str> {
        non_blank(&self.image_url)
    }

    /// Build the user row for `external_id`, falling back to the
    /// placeholder email when the profile lists none
    pub fn to_new_user(&self, external_id: &str) -> NewUserAccount {
        let email = self
            .primary_email()
            .map(str::to_string)
            .unwrap_or_else(|| fallback_email(external_id));

        let mut user = NewUserAccount::new(external_id, email);
        if let Some(name) = self.display_name() {
            user = user.with_display_name(name);
        }
        if let Some(url) = self.avatar_url() {
            user = user.with_avatar_url(url);
        }
        user
    }
}

// =========================================================================
// Directory trait
// =========================================================================

/// Errors fetching a directory profile
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Identity directory is not configured")]
    NotConfigured,

    #[error("Invalid directory URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Directory returned status {status} for {external_id}")]
    Status { status: u16, external_id: String },
}

/// Lookup of user details at the identity provider
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    async fn get_profile(&self, external_id: &str) -> Result<DirectoryProfile, DirectoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(id: &str, email: &str) -> EmailAddress {
        EmailAddress {
            id: id.to_string(),
            email_address: email.to_string(),
        }
    }

    #[test]
    fn test_primary_email_uses_designated_id() {
        let profile = DirectoryProfile {
            email_addresses: vec![
                address("idn_1", "work@example.com"),
                address("idn_2", "home@example.com"),
            ],
            primary_email_address_id: Some("idn_2".to_string()),
            ..Default::default()
        };

        assert_eq!(profile.primary_email(), Some("home@example.com"));
    }

    #[test]
    fn test_primary_email_falls_back_to_first() {
        let mut profile = DirectoryProfile {
            email_addresses: vec![
                address("idn_1", "work@example.com"),
                address("idn_2", "home@example.com"),
            ],
            primary_email_address_id: Some("idn_missing".to_string()),
            ..Default::default()
        };
        assert_eq!(profile.primary_email(), Some("work@example.com"));

        profile.primary_email_address_id = None;
        assert_eq!(profile.primary_email(), Some("work@example.com"));
    }

    #[test]
    fn test_primary_email_none_when_no_addresses() {
        let profile = DirectoryProfile::default();
        assert_eq!(profile.primary_email(), None);
    }

    #[test]
    fn test_display_name_precedence() {
        let mut profile = DirectoryProfile {
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            full_name: Some("Ada Lovelace".into()),
            ..Default::default()
        };
        assert_eq!(profile.display_name(), Some("Ada"));

        profile.first_name = None;
        assert_eq!(profile.display_name(), Some("Lovelace"));

        profile.last_name = Some("  ".into());
        assert_eq!(profile.display_name(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_to_new_user() {
        let profile = DirectoryProfile {
            email_addresses: vec![address("idn_1", "ada@example.com")],
            primary_email_address_id: Some("idn_1".into()),
            first_name: Some("Ada".into()),
            image_url: Some("https://img.example.com/ada.png".into()),
            ..Default::default()
        };

        let user = profile.to_new_user("user_ada");
        assert_eq!(user.external_id, "user_ada");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.display_name.as_deref(), Some("Ada"));
        assert_eq!(user.avatar_url.as_deref(), Some("https://img.example.com/ada.png"));
    }

    #[test]
    fn test_to_new_user_without_email_uses_placeholder() {
        let user = DirectoryProfile::default().to_new_user("user_x");
        assert_eq!(user.email, "unknown-user_x@example.com");
    }

    #[test]
    fn test_deserialize_provider_payload() {
        let json = serde_json::json!({
            "id": "user_2abc",
            "email_addresses": [
                { "id": "idn_1", "email_address": "ada@example.com", "verification": null }
            ],
            "primary_email_address_id": "idn_1",
            "first_name": null,
            "last_name": "Lovelace",
            "image_url": "https://img.example.com/ada.png"
        });

        let profile: DirectoryProfile = serde_json::from_value(json).unwrap();
        assert_eq!(profile.primary_email(), Some("ada@example.com"));
        assert_eq!(profile.display_name(), Some("Lovelace"));
    }

    #[test]
    fn test_deserialize_null_email_list() {
        let json = serde_json::json!({ "email_addresses": null });
        let profile: DirectoryProfile = serde_json::from_value(json).unwrap();
        assert!(profile.email_addresses.is_empty());
    }
}
