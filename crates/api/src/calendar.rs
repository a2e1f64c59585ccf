//! # Calendar Free/Busy Provider
//!
//! Busy ranges from external calendars block slots in the same way as
//! bookings. The provider is optional; when it is configured the availability
//! path also applies the salon's booking buffer.
//!
//! A provider failure never fails availability: [`busy_or_empty`] logs the
//! error and treats the calendar as free.

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::{Result, WrapErr};
use salonbook_core::models::slot::BusyInterval;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::CalendarConfig;

pub const GOOGLE_CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";

#[async_trait]
pub trait FreeBusyProvider: Send + Sync {
    /// Busy ranges intersecting `[start, end)` across all configured calendars.
    async fn busy_intervals(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>>;
}

/// Queries `provider`, substituting an empty set on any error.
pub async fn busy_or_empty(
    provider: &dyn FreeBusyProvider,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<BusyInterval> {
    match provider.busy_intervals(start, end).await {
        Ok(busy) => busy,
        Err(e) => {
            warn!(
                "Calendar free/busy lookup failed for {} - {}, treating calendar as free: {:#}",
                start, end, e
            );
            Vec::new()
        }
    }
}

/// Google Calendar `freeBusy` client.
pub struct GoogleFreeBusy {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
    calendar_ids: Vec<String>,
}

impl GoogleFreeBusy {
    pub fn new(config: &CalendarConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .wrap_err("Failed to build calendar HTTP client")?;

        Ok(Self {
            client,
            base_url: GOOGLE_CALENDAR_API.to_string(),
            access_token: config.access_token.clone(),
            calendar_ids: config.calendar_ids.clone(),
        })
    }

    /// Points the client at another API root, e.g. a local stub.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FreeBusyRequest<'a> {
    time_min: DateTime<Utc>,
    time_max: DateTime<Utc>,
    items: Vec<FreeBusyItem<'a>>,
}

#[derive(Debug, Serialize)]
struct FreeBusyItem<'a> {
    id: &'a str,
}

/// Body of a `freeBusy` response.
#[derive(Debug, Deserialize)]
pub struct FreeBusyResponse {
    #[serde(default)]
    pub calendars: HashMap<String, CalendarBusy>,
}

#[derive(Debug, Deserialize)]
pub struct CalendarBusy {
    #[serde(default)]
    pub busy: Vec<BusyInterval>,
    #[serde(default)]
    pub errors: Vec<CalendarLookupError>,
}

#[derive(Debug, Deserialize)]
pub struct CalendarLookupError {
    #[serde(default)]
    pub domain: Option<String>,
    pub reason: String,
}

impl FreeBusyResponse {
    /// Flattens all calendars into one list sorted by start.
    ///
    /// A calendar reporting errors contributes nothing.
    pub fn into_busy_intervals(self) -> Vec<BusyInterval> {
        let mut busy = Vec::new();
        for (calendar_id, calendar) in self.calendars {
            if !calendar.errors.is_empty() {
                let reasons: Vec<&str> = calendar
                    .errors
                    .iter()
                    .map(|error| error.reason.as_str())
                    .collect();
                warn!(
                    "Skipping calendar {} in free/busy response: {}",
                    calendar_id,
                    reasons.join(", ")
                );
                continue;
            }
            busy.extend(calendar.busy);
        }
        busy.sort_by_key(|interval| interval.start);
        busy
    }
}

#[async_trait]
impl FreeBusyProvider for GoogleFreeBusy {
    async fn busy_intervals(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>> {
        let request = FreeBusyRequest {
            time_min: start,
            time_max: end,
            items: self
                .calendar_ids
                .iter()
                .map(|id| FreeBusyItem { id: id.as_str() })
                .collect(),
        };

        let response: FreeBusyResponse = self
            .client
            .post(format!("{}/freeBusy", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .wrap_err("Free/busy request failed")?
            .error_for_status()
            .wrap_err("Free/busy request was rejected")?
            .json()
            .await
            .wrap_err("Malformed free/busy response")?;

        let busy = response.into_busy_intervals();
        debug!("Calendar reported {} busy intervals", busy.len());
        Ok(busy)
    }
}
