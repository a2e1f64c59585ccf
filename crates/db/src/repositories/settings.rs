use crate::{DbPool, models::DbSetting};
use async_trait::async_trait;
use chrono::Utc;
use eyre::Result;
use salonbook_core::models::settings::SettingKey;

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load_settings(&self) -> Result<Vec<DbSetting>>;

    async fn upsert_setting(&self, key: SettingKey, value: serde_json::Value) -> Result<DbSetting>;
}

pub struct PgSettingsStore {
    pool: DbPool,
}

impl PgSettingsStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for PgSettingsStore {
    async fn load_settings(&self) -> Result<Vec<DbSetting>> {
        let settings = sqlx::query_as::<_, DbSetting>(
            r#"
            SELECT key, value, updated_at
            FROM settings
            ORDER BY key ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!("Loaded {} settings rows", settings.len());
        Ok(settings)
    }

    async fn upsert_setting(&self, key: SettingKey, value: serde_json::Value) -> Result<DbSetting> {
        tracing::debug!("Writing setting: key={}", key.as_str());

        let setting = sqlx::query_as::<_, DbSetting>(
            r#"
            INSERT INTO settings (key, value, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (key) DO UPDATE
            SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at
            RETURNING key, value, updated_at
            "#,
        )
        .bind(key.as_str())
        .bind(value)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(setting)
    }
}
