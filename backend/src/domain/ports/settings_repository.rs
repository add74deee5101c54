//! Port abstraction for site settings storage.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Setting, SettingKey};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by settings repository adapters.
    pub enum SettingsPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "settings repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "settings repository query failed: {message}",
    }
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Fetch a setting by key.
    async fn get(&self, key: &SettingKey) -> Result<Option<Setting>, SettingsPersistenceError>;

    /// Insert or replace the value stored under `key`.
    async fn upsert(
        &self,
        key: &SettingKey,
        value: &Value,
    ) -> Result<Setting, SettingsPersistenceError>;
}
