use serde::{Deserialize, Serialize};

use crate::models::business_hours::WeeklyHours;

/// Upper bound accepted for the booking buffer.
pub const MAX_BOOKING_BUFFER_MINUTES: i64 = 240;

/// Keys of the rows in the key/value settings table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    BusinessHours,
    BookingBufferMinutes,
}

impl SettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::BusinessHours => "business_hours",
            SettingKey::BookingBufferMinutes => "booking_buffer_minutes",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "business_hours" => Some(SettingKey::BusinessHours),
            "booking_buffer_minutes" => Some(SettingKey::BookingBufferMinutes),
            _ => None,
        }
    }
}

/// Salon-wide settings assembled from the settings table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalonSettings {
    pub business_hours: WeeklyHours,
    pub booking_buffer_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookingBufferRequest {
    pub minutes: i64,
}
