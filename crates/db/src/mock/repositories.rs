use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use salonbook_core::models::settings::SettingKey;
use uuid::Uuid;

use crate::{
    models::{DbBooking, DbSetting, NewBooking},
    repositories::{BookingStore, SettingsStore},
};

// Mock repositories for testing
mock! {
    pub BookingRepo {}

    #[async_trait]
    impl BookingStore for BookingRepo {
        async fn list_active_between(
            &self,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
            worker_id: Option<Uuid>,
        ) -> eyre::Result<Vec<DbBooking>>;

        async fn create_booking(&self, booking: NewBooking) -> eyre::Result<DbBooking>;

        async fn get_booking_by_id(&self, id: Uuid) -> eyre::Result<Option<DbBooking>>;

        async fn cancel_booking(&self, id: Uuid) -> eyre::Result<Option<DbBooking>>;
    }
}

mock! {
    pub SettingsRepo {}

    #[async_trait]
    impl SettingsStore for SettingsRepo {
        async fn load_settings(&self) -> eyre::Result<Vec<DbSetting>>;

        async fn upsert_setting(
            &self,
            key: SettingKey,
            value: serde_json::Value,
        ) -> eyre::Result<DbSetting>;
    }
}
