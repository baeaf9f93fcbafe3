//! Site settings

use std::collections::BTreeMap;
use std::fmt;

use client::{ApiClient, CancelToken, ClientResult};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSettings {
    pub registration_enabled: bool,
    pub config: BTreeMap<String, String>,
    pub notice: Option<Notice>,
}

impl SiteSettings {
    pub async fn load(api: &ApiClient, cancel: &CancelToken) -> ClientResult<Self> {
        let registration_enabled = cancel.run(api.admin().registration_status()).await?;
        let config = cancel.run(api.admin().config()).await?;
        Ok(Self {
            registration_enabled,
            config,
            notice: None,
        })
    }

    /// Flip public registration. The displayed value follows what the API
    /// reports back.
    pub async fn toggle_registration(&mut self, api: &ApiClient) -> ClientResult<bool> {
        self.set_registration(api, !self.registration_enabled).await
    }

    pub async fn set_registration(
        &mut self,
        api: &ApiClient,
        enabled: bool,
    ) -> ClientResult<bool> {
        match api.admin().set_registration(enabled).await {
            Ok(enabled) => {
                info!("Registration {}", if enabled { "enabled" } else { "disabled" });
                self.registration_enabled = enabled;
                self.notice = Some(Notice::Success(format!(
                    "Registration {}",
                    if enabled { "enabled" } else { "disabled" }
                )));
                Ok(enabled)
            }
            Err(e) => {
                self.notice = Some(Notice::Error(e.user_message("Failed to update settings")));
                Err(e)
            }
        }
    }

    pub async fn set_config(
        &mut self,
        api: &ApiClient,
        key: &str,
        value: &str,
    ) -> ClientResult<()> {
        match api.admin().update_config(key, value).await {
            Ok(entry) => {
                self.notice = Some(Notice::Success(format!("Saved {}", entry.key)));
                self.config.insert(entry.key, entry.value);
                Ok(())
            }
            Err(e) => {
                self.notice = Some(Notice::Error(e.user_message("Failed to update settings")));
                Err(e)
            }
        }
    }
}

impl fmt::Display for SiteSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registration = if self.registration_enabled { "on" } else { "off" };
        writeln!(f, "Registration: {}", registration)?;
        for (key, value) in &self.config {
            writeln!(f, "  {} = {}", key, value)?;
        }
        Ok(())
    }
}
