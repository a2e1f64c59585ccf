use axum::{Json, extract::State};
use salonbook_core::{
    errors::BookingError,
    models::{
        business_hours::WeeklyHours,
        settings::{MAX_BOOKING_BUFFER_MINUTES, SalonSettings, UpdateBookingBufferRequest},
    },
};
use std::sync::Arc;
use tracing::info;

use crate::{
    ApiState,
    middleware::{auth::AdminAccess, error_handling::AppError},
};

#[axum::debug_handler]
pub async fn get_settings(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<SalonSettings>, AppError> {
    Ok(Json(state.settings.get().await?))
}

#[axum::debug_handler]
pub async fn update_business_hours(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    Json(hours): Json<WeeklyHours>,
) -> Result<Json<SalonSettings>, AppError> {
    hours.validate()?;

    let settings = state.settings.update_business_hours(&hours).await?;
    info!("Business hours updated");

    Ok(Json(settings))
}

#[axum::debug_handler]
pub async fn update_booking_buffer(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<UpdateBookingBufferRequest>,
) -> Result<Json<SalonSettings>, AppError> {
    if !(0..=MAX_BOOKING_BUFFER_MINUTES).contains(&payload.minutes) {
        return Err(AppError(BookingError::Validation(format!(
            "Booking buffer must be between 0 and {} minutes",
            MAX_BOOKING_BUFFER_MINUTES
        ))));
    }

    let settings = state.settings.update_booking_buffer(payload.minutes).await?;
    info!("Booking buffer set to {} minutes", payload.minutes);

    Ok(Json(settings))
}
