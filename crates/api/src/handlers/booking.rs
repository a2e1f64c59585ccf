use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{Duration, NaiveDate, Utc};
use salonbook_core::{
    availability::local_day_start,
    errors::{BookingError, BookingResult},
    models::booking::{Booking, BookingStatus, CreateBookingRequest, ListBookingsResponse},
};
use salonbook_db::models::{DbBooking, NewBooking};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    ApiState,
    handlers::availability::{load_slots, validate_duration},
    middleware::{auth::AdminAccess, error_handling::AppError},
};

#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    pub date: NaiveDate,
    pub worker_id: Option<Uuid>,
}

fn validate_request(payload: &CreateBookingRequest) -> BookingResult<()> {
    validate_duration(payload.duration_minutes)?;
    if payload.client_name.trim().is_empty() {
        return Err(BookingError::Validation("client_name must not be empty".to_string()));
    }
    if !payload.client_email.contains('@') {
        return Err(BookingError::Validation(
            "client_email must be an email address".to_string(),
        ));
    }
    if payload.service_name.trim().is_empty() {
        return Err(BookingError::Validation("service_name must not be empty".to_string()));
    }
    Ok(())
}

fn into_booking(row: DbBooking) -> Result<Booking, AppError> {
    Ok(row.into_booking()?)
}

/// Creates a booking for one of the day's available slots.
///
/// The requested start is checked against freshly computed slots right before
/// the insert. Both steps are separate statements, so two concurrent requests
/// for the same slot can still both succeed.
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    validate_request(&payload)?;

    let date = payload
        .start_time
        .with_timezone(&state.timezone)
        .date_naive();
    let slots = load_slots(
        &state,
        date,
        payload.duration_minutes,
        payload.worker_id,
        Utc::now(),
    )
    .await?;

    let slot = slots
        .iter()
        .find(|slot| slot.start == payload.start_time)
        .ok_or_else(|| {
            BookingError::Validation(format!(
                "{} is not a bookable slot start",
                payload.start_time.to_rfc3339()
            ))
        })?;
    if !slot.available {
        return Err(AppError(BookingError::Conflict(format!(
            "The slot starting at {} is no longer available",
            payload.start_time.to_rfc3339()
        ))));
    }

    let row = state
        .bookings
        .create_booking(NewBooking {
            worker_id: payload.worker_id,
            client_name: payload.client_name.trim().to_string(),
            client_email: payload.client_email.trim().to_string(),
            service_name: payload.service_name.trim().to_string(),
            start_time: slot.start,
            end_time: slot.end,
            status: BookingStatus::Pending,
            notes: payload.notes,
        })
        .await?;

    info!(
        "Booking {} created for {} - {}",
        row.id, row.start_time, row.end_time
    );

    Ok((StatusCode::CREATED, Json(into_booking(row)?)))
}

/// Lists the non-cancelled bookings of a calendar day in the salon timezone.
#[axum::debug_handler]
pub async fn list_bookings(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<ListBookingsResponse>, AppError> {
    let next_day = query.date + Duration::days(1);
    let (Some(start), Some(end)) = (
        local_day_start(query.date, &state.timezone),
        local_day_start(next_day, &state.timezone),
    ) else {
        return Err(AppError(BookingError::Validation(format!(
            "Cannot resolve midnight of {} in {}",
            query.date, state.timezone
        ))));
    };

    let rows = state
        .bookings
        .list_active_between(start, end, query.worker_id)
        .await?;
    let bookings = rows
        .into_iter()
        .map(into_booking)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(ListBookingsResponse { bookings }))
}

#[axum::debug_handler]
pub async fn get_booking(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let row = state
        .bookings
        .get_booking_by_id(id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Booking with ID {} not found", id)))?;

    Ok(Json(into_booking(row)?))
}

#[axum::debug_handler]
pub async fn cancel_booking(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let row = state
        .bookings
        .cancel_booking(id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Booking with ID {} not found", id)))?;

    info!("Booking {} cancelled", id);
    Ok(Json(into_booking(row)?))
}
