//! In-memory settings repository.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use super::lock;
use crate::domain::ports::{SettingsPersistenceError, SettingsRepository};
use crate::domain::{Setting, SettingKey};

/// Settings keyed in process memory.
#[derive(Debug, Default)]
pub struct InMemorySettingsRepository {
    rows: Mutex<BTreeMap<SettingKey, Setting>>,
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn get(&self, key: &SettingKey) -> Result<Option<Setting>, SettingsPersistenceError> {
        Ok(lock(&self.rows).get(key).cloned())
    }

    async fn upsert(
        &self,
        key: &SettingKey,
        value: &Value,
    ) -> Result<Setting, SettingsPersistenceError> {
        let setting = Setting {
            key: key.clone(),
            value: value.clone(),
            updated_at: Utc::now(),
        };
        lock(&self.rows).insert(key.clone(), setting.clone());
        Ok(setting)
    }
}
