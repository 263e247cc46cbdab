//! HTTP identity directory client
//!
//! Fetches user profiles from the identity provider's backend API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::config::Config;

use super::{DirectoryError, DirectoryProfile, IdentityDirectory};

/// Directory backed by `GET {base_url}/users/{external_id}`
#[derive(Debug, Clone)]
pub struct HttpIdentityDirectory {
    client: Client,
    base_url: Url,
    secret: Option<String>,
}

impl HttpIdentityDirectory {
    pub fn new(
        base_url: &str,
        secret: Option<String>,
        timeout: Duration,
    ) -> Result<Self, DirectoryError> {
        let base_url =
            Url::parse(base_url).map_err(|e| DirectoryError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(DirectoryError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            secret,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, DirectoryError> {
        Self::new(
            &config.identity_api_url,
            config.identity_api_secret.clone(),
            Duration::from_secs(config.identity_timeout_secs),
        )
    }

    /// Profile URL for one user; the id is percent-encoded as a path segment
    fn user_url(&self, external_id: &str) -> Result<Url, DirectoryError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DirectoryError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("users")
            .push(external_id);
        Ok(url)
    }
}

#[async_trait]
impl IdentityDirectory for HttpIdentityDirectory {
    async fn get_profile(&self, external_id: &str) -> Result<DirectoryProfile, DirectoryError> {
        let secret = self.secret.as_deref().ok_or(DirectoryError::NotConfigured)?;
        let url = self.user_url(external_id)?;

        tracing::debug!(external_id, "Fetching directory profile");

        let response = self.client.get(url).bearer_auth(secret).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Status {
                status: status.as_u16(),
                external_id: external_id.to_string(),
            });
        }

        Ok(response.json::<DirectoryProfile>().await?)
    }
}
