//! # Availability Handlers
//!
//! Serves the bookable slots of one day. Slot generation itself lives in
//! `salonbook_core::availability`; this module gathers its inputs:
//!
//! 1. Business hours and booking buffer from the settings cache
//! 2. Non-cancelled bookings overlapping the business day
//! 3. Calendar busy ranges, when a calendar provider is configured
//!
//! Without a calendar provider only bookings block slots and no buffer is
//! applied. With one, calendar busy ranges are added and the configured
//! booking buffer pads every busy interval. A failing calendar degrades to
//! "no calendar conflicts" instead of failing the request.
//!
//! The same [`load_slots`] function backs booking creation, so a submitted
//! start time is re-validated with exactly the rules the client saw.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use salonbook_core::{
    availability::{SlotParams, business_day_bounds, compute_slots},
    errors::{BookingError, BookingResult},
    models::slot::{AvailabilityResponse, BusyInterval, TimeSlot},
};
use salonbook_db::models::DbBooking;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::{ApiState, calendar::busy_or_empty, middleware::error_handling::AppError};

/// Longest service duration accepted, one full day.
pub const MAX_SERVICE_DURATION_MINUTES: i64 = 24 * 60;

/// Query parameters for the availability endpoint
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// Day to compute slots for, `YYYY-MM-DD`
    pub date: NaiveDate,

    /// Length of the requested service in minutes
    pub duration_minutes: i64,

    /// Restrict booking conflicts to one worker
    pub worker_id: Option<Uuid>,
}

pub fn validate_duration(duration_minutes: i64) -> BookingResult<()> {
    if duration_minutes <= 0 || duration_minutes > MAX_SERVICE_DURATION_MINUTES {
        return Err(BookingError::Validation(format!(
            "duration_minutes must be between 1 and {}",
            MAX_SERVICE_DURATION_MINUTES
        )));
    }
    Ok(())
}

/// Computes the slots of `date` from current settings, bookings and calendar.
pub async fn load_slots(
    state: &ApiState,
    date: NaiveDate,
    duration_minutes: i64,
    worker_id: Option<Uuid>,
    now: DateTime<Utc>,
) -> BookingResult<Vec<TimeSlot>> {
    let settings = state.settings.get().await?;
    let hours = settings.business_hours.for_weekday(date.weekday());

    let Some((day_start, day_end)) = business_day_bounds(date, hours, &state.timezone) else {
        debug!("Salon closed on {}", date);
        return Ok(Vec::new());
    };

    let buffer_minutes = if state.calendar.is_some() {
        settings.booking_buffer_minutes
    } else {
        0
    };
    // Busy ranges just outside the day still matter once padded
    let window_start = day_start - Duration::minutes(buffer_minutes);
    let window_end = day_end + Duration::minutes(buffer_minutes);

    let bookings = state
        .bookings
        .list_active_between(window_start, window_end, worker_id)
        .await?;
    let mut busy: Vec<BusyInterval> = bookings
        .iter()
        .filter_map(DbBooking::busy_interval)
        .collect();

    if let Some(calendar) = &state.calendar {
        busy.extend(busy_or_empty(calendar.as_ref(), window_start, window_end).await);
    }

    debug!(
        "Computing slots for {}: {} busy intervals, buffer {} min",
        date,
        busy.len(),
        buffer_minutes
    );

    let params = SlotParams::new(duration_minutes).with_buffer_minutes(buffer_minutes);
    Ok(compute_slots(date, hours, &busy, &params, &state.timezone, now))
}

/// Lists the slots of a day
///
/// # Endpoint
///
/// ```text
/// GET /api/availability?date=2030-01-07&duration_minutes=60[&worker_id=<uuid>]
/// ```
///
/// # Errors
///
/// * `BookingError::Validation` - duration outside 1..=1440 minutes
/// * `BookingError::Database` - settings or bookings could not be read
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    validate_duration(query.duration_minutes)?;

    let slots = load_slots(
        &state,
        query.date,
        query.duration_minutes,
        query.worker_id,
        Utc::now(),
    )
    .await?;

    Ok(Json(AvailabilityResponse {
        date: query.date,
        duration_minutes: query.duration_minutes,
        slots,
    }))
}
