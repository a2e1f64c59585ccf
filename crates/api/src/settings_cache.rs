//! # Settings Cache
//!
//! Business hours and the booking buffer are stored as key/value rows and are
//! needed on every availability request. `SettingsCache` reads them through
//! once and serves later requests from memory until an admin update
//! invalidates the snapshot.

use std::sync::Arc;

use eyre::Result;
use salonbook_core::models::{
    business_hours::WeeklyHours,
    settings::{MAX_BOOKING_BUFFER_MINUTES, SalonSettings, SettingKey},
};
use salonbook_db::{models::DbSetting, repositories::SettingsStore};
use tokio::sync::RwLock;
use tracing::{debug, warn};

pub struct SettingsCache {
    store: Arc<dyn SettingsStore>,
    cached: RwLock<Option<SalonSettings>>,
}

impl SettingsCache {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            store,
            cached: RwLock::new(None),
        }
    }

    /// Current settings, loading them from the store on a cold cache.
    pub async fn get(&self) -> Result<SalonSettings> {
        if let Some(settings) = self.cached.read().await.as_ref() {
            return Ok(settings.clone());
        }

        let mut cached = self.cached.write().await;
        // Another request may have filled the cache while we waited for the lock
        if let Some(settings) = cached.as_ref() {
            return Ok(settings.clone());
        }

        let rows = self.store.load_settings().await?;
        let settings = settings_from_rows(&rows);
        debug!("Settings cache loaded from {} rows", rows.len());
        *cached = Some(settings.clone());
        Ok(settings)
    }

    /// Drops the snapshot; the next `get` reads from the store again.
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
        debug!("Settings cache invalidated");
    }

    /// Writes new business hours and returns the reloaded settings.
    pub async fn update_business_hours(&self, hours: &WeeklyHours) -> Result<SalonSettings> {
        self.store
            .upsert_setting(SettingKey::BusinessHours, serde_json::to_value(hours)?)
            .await?;
        self.invalidate().await;
        self.get().await
    }

    /// Writes a new booking buffer and returns the reloaded settings.
    pub async fn update_booking_buffer(&self, minutes: i64) -> Result<SalonSettings> {
        self.store
            .upsert_setting(SettingKey::BookingBufferMinutes, serde_json::json!(minutes))
            .await?;
        self.invalidate().await;
        self.get().await
    }
}

/// Builds settings from stored rows. Unknown keys are ignored and malformed
/// values fall back to the defaults.
pub fn settings_from_rows(rows: &[DbSetting]) -> SalonSettings {
    let mut settings = SalonSettings::default();

    for row in rows {
        match SettingKey::from_key(&row.key) {
            Some(SettingKey::BusinessHours) => {
                match serde_json::from_value::<WeeklyHours>(row.value.clone()) {
                    Ok(hours) if hours.validate().is_ok() => settings.business_hours = hours,
                    Ok(_) => warn!("Stored business hours are inconsistent, using defaults"),
                    Err(e) => warn!("Stored business hours are malformed, using defaults: {}", e),
                }
            }
            Some(SettingKey::BookingBufferMinutes) => match row.value.as_i64() {
                Some(minutes) if (0..=MAX_BOOKING_BUFFER_MINUTES).contains(&minutes) => {
                    settings.booking_buffer_minutes = minutes
                }
                _ => warn!(
                    "Stored booking buffer {} is not between 0 and {} minutes, using 0",
                    row.value, MAX_BOOKING_BUFFER_MINUTES
                ),
            },
            None => debug!("Ignoring unknown setting {}", row.key),
        }
    }

    settings
}
