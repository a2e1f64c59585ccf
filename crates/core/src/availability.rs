//! # Availability Calculator
//!
//! Generates the candidate appointment slots of one business day and marks
//! each of them available or unavailable.
//!
//! ## Algorithm
//!
//! 1. A closed day yields no slots.
//! 2. The business day start and end are resolved from wall-clock times in
//!    the salon timezone.
//! 3. Starting at the day start, a slot of `service_duration` is emitted every
//!    `step` as long as it ends no later than the day end. Trailing partial
//!    slots are dropped, never truncated.
//! 4. A slot is unavailable when it intersects any busy interval widened by
//!    `buffer` on both sides, or when it starts before `now`.
//!
//! Overlap uses strict comparisons, so a slot that ends exactly where a
//! (buffered) busy interval begins is still available.
//!
//! The function is pure: the caller supplies the busy intervals and the
//! current instant, and is responsible for re-validating the chosen slot at
//! booking time.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::models::{
    business_hours::BusinessHours,
    slot::{BusyInterval, TimeSlot},
};

/// Cadence at which candidate slot starts are generated.
pub const DEFAULT_STEP_MINUTES: i64 = 30;

/// Parameters of one slot calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotParams {
    /// Length of every generated slot
    pub service_duration: Duration,
    /// Distance between consecutive slot starts
    pub step: Duration,
    /// Symmetric padding applied around each busy interval
    pub buffer: Duration,
}

impl SlotParams {
    /// Slots of `service_duration_minutes` every 30 minutes, without buffer.
    pub fn new(service_duration_minutes: i64) -> Self {
        Self {
            service_duration: Duration::minutes(service_duration_minutes),
            step: Duration::minutes(DEFAULT_STEP_MINUTES),
            buffer: Duration::zero(),
        }
    }

    pub fn with_step_minutes(mut self, minutes: i64) -> Self {
        self.step = Duration::minutes(minutes);
        self
    }

    pub fn with_buffer_minutes(mut self, minutes: i64) -> Self {
        self.buffer = Duration::minutes(minutes);
        self
    }
}

/// Resolves a wall-clock time on `date` in `tz` to UTC.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant; times that
/// do not exist (DST spring-forward gap) yield `None`.
pub fn local_to_utc(date: NaiveDate, time: NaiveTime, tz: &Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

/// First instant of the calendar day `date` in `tz`.
///
/// When local midnight falls into a DST gap the day starts at the first
/// wall-clock minute that exists.
pub fn local_day_start(date: NaiveDate, tz: &Tz) -> Option<DateTime<Utc>> {
    let midnight = date.and_time(NaiveTime::default());
    (0..24 * 60)
        .map(|minute| midnight + Duration::minutes(minute))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map(|local| local.with_timezone(&Utc))
}

/// Absolute start and end of the business day, or `None` when closed.
pub fn business_day_bounds(
    date: NaiveDate,
    hours: &BusinessHours,
    tz: &Tz,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    if hours.closed {
        return None;
    }
    let day_start = local_to_utc(date, hours.start, tz)?;
    let day_end = local_to_utc(date, hours.end, tz)?;
    Some((day_start, day_end))
}

/// Whether `[start, end)` intersects any busy interval padded by `buffer`.
pub fn conflicts_with(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    busy: &[BusyInterval],
    buffer: Duration,
) -> bool {
    busy.iter()
        .any(|interval| start < interval.end + buffer && end > interval.start - buffer)
}

/// Computes the slots of `date` in ascending start order.
///
/// Non-positive durations or steps produce no slots.
pub fn compute_slots(
    date: NaiveDate,
    hours: &BusinessHours,
    busy: &[BusyInterval],
    params: &SlotParams,
    tz: &Tz,
    now: DateTime<Utc>,
) -> Vec<TimeSlot> {
    let Some((day_start, day_end)) = business_day_bounds(date, hours, tz) else {
        return Vec::new();
    };
    if params.service_duration <= Duration::zero() || params.step <= Duration::zero() {
        return Vec::new();
    }

    let mut slots = Vec::new();
    let mut cursor = day_start;
    while cursor + params.service_duration <= day_end {
        let slot_end = cursor + params.service_duration;
        let conflict = conflicts_with(cursor, slot_end, busy, params.buffer);
        let in_past = cursor < now;
        slots.push(TimeSlot {
            start: cursor,
            end: slot_end,
            available: !conflict && !in_past,
        });
        cursor += params.step;
    }
    slots
}
