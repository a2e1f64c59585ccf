use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/settings", get(handlers::settings::get_settings))
        .route(
            "/api/settings/business-hours",
            put(handlers::settings::update_business_hours),
        )
        .route(
            "/api/settings/booking-buffer",
            put(handlers::settings::update_booking_buffer),
        )
}
