use chrono::{DateTime, Utc};
use eyre::{Result, eyre};
use salonbook_core::models::{
    booking::{Booking, BookingStatus},
    slot::BusyInterval,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub worker_id: Option<Uuid>,
    pub client_name: String,
    pub client_email: String,
    pub service_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DbBooking {
    /// Time range this booking occupies; `None` once it no longer blocks time.
    ///
    /// Rows with an unknown status are treated as blocking.
    pub fn busy_interval(&self) -> Option<BusyInterval> {
        let blocks_time = self
            .status
            .parse::<BookingStatus>()
            .map_or(true, |status| status.blocks_time());
        blocks_time.then(|| BusyInterval::new(self.start_time, self.end_time))
    }

    pub fn into_booking(self) -> Result<Booking> {
        let status = self
            .status
            .parse::<BookingStatus>()
            .map_err(|e| eyre!("Booking {} has invalid status: {}", self.id, e))?;

        Ok(Booking {
            id: self.id,
            worker_id: self.worker_id,
            client_name: self.client_name,
            client_email: self.client_email,
            service_name: self.service_name,
            start_time: self.start_time,
            end_time: self.end_time,
            status,
            notes: self.notes,
            created_at: self.created_at,
        })
    }
}

/// Fields of a booking row about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub worker_id: Option<Uuid>,
    pub client_name: String,
    pub client_email: String,
    pub service_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSetting {
    pub key: String,
    pub value: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}
