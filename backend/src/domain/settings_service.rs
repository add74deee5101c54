//! Read and replace site settings.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::domain::ports::{SettingsPersistenceError, SettingsRepository};
use crate::domain::{Error, Setting, SettingKey};

/// Settings service.
#[derive(Clone)]
pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    #[must_use]
    pub const fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self { repo }
    }

    /// Fetch a setting or fail with `NotFound`.
    pub async fn get(&self, key: &SettingKey) -> Result<Setting, Error> {
        self.repo
            .get(key)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("Setting '{key}' not found")))
    }

    /// Replace the value stored under `key`, creating it when absent.
    pub async fn update(&self, key: &SettingKey, value: &Value) -> Result<Setting, Error> {
        let setting = self
            .repo
            .upsert(key, value)
            .await
            .map_err(map_persistence_error)?;
        info!(key = %key, "setting updated");
        Ok(setting)
    }
}

fn map_persistence_error(error: SettingsPersistenceError) -> Error {
    match error {
        SettingsPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("settings repository unavailable: {message}"))
        }
        SettingsPersistenceError::Query { message } => {
            Error::internal(format!("settings repository error: {message}"))
        }
    }
}
