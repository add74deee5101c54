//! PostgreSQL-backed `SettingsRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use serde_json::Value;

use crate::domain::ports::{SettingsPersistenceError, SettingsRepository};
use crate::domain::{Setting, SettingKey};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{NewSettingRow, SettingRow};
use super::pool::{DbPool, PoolError};
use super::schema::settings;

/// Diesel-backed settings storage.
#[derive(Clone)]
pub struct DieselSettingsRepository {
    pool: DbPool,
}

impl DieselSettingsRepository {
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> SettingsPersistenceError {
    map_pool_error(error, SettingsPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> SettingsPersistenceError {
    map_diesel_error(
        error,
        SettingsPersistenceError::query,
        SettingsPersistenceError::connection,
        SettingsPersistenceError::query,
    )
}

fn row_to_setting(row: SettingRow) -> Result<Setting, SettingsPersistenceError> {
    let key = SettingKey::new(&row.key)
        .map_err(|_| SettingsPersistenceError::query("stored setting has invalid key"))?;
    Ok(Setting {
        key,
        value: row.value,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl SettingsRepository for DieselSettingsRepository {
    async fn get(&self, key: &SettingKey) -> Result<Option<Setting>, SettingsPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<SettingRow> = settings::table
            .filter(settings::key.eq(key.as_ref()))
            .select(SettingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_setting).transpose()
    }

    async fn upsert(
        &self,
        key: &SettingKey,
        value: &Value,
    ) -> Result<Setting, SettingsPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewSettingRow {
            key: key.as_ref(),
            value,
            updated_at: Utc::now(),
        };
        let stored: SettingRow = diesel::insert_into(settings::table)
            .values(&row)
            .on_conflict(settings::key)
            .do_update()
            .set((
                settings::value.eq(excluded(settings::value)),
                settings::updated_at.eq(excluded(settings::updated_at)),
            ))
            .returning(SettingRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        row_to_setting(stored)
    }
}
