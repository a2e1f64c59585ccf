//! # SalonBook API
//!
//! The API crate provides the web server of the SalonBook booking service.
//! It exposes slot availability, booking creation, and admin endpoints for
//! bookings and salon settings.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Admin authentication and error mapping
//! - **Settings cache**: Read-through cache over the settings table
//! - **Calendar**: Optional external free/busy provider
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework and reaches PostgreSQL only through
//! the store traits of `salonbook_db`.

/// External calendar free/busy lookup
pub mod calendar;
/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;
/// Cached salon settings
pub mod settings_cache;

use std::{sync::Arc, time::Duration};

use axum::{Router, http::HeaderValue};
use chrono_tz::Tz;
use eyre::{Result, WrapErr};
use salonbook_db::{
    DbPool,
    repositories::{BookingStore, PgBookingStore, PgSettingsStore},
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::{
    calendar::{FreeBusyProvider, GoogleFreeBusy},
    settings_cache::SettingsCache,
};

/// Shared application state that is accessible to all request handlers
///
/// Stores are held as trait objects so that tests can substitute the mocks
/// from `salonbook_db::mock`.
pub struct ApiState {
    /// Booking rows
    pub bookings: Arc<dyn BookingStore>,
    /// Business hours and booking buffer
    pub settings: SettingsCache,
    /// External calendar; `None` disables the calendar-backed path
    pub calendar: Option<Arc<dyn FreeBusyProvider>>,
    /// Timezone of the business hours
    pub timezone: Tz,
    /// Argon2 hash of the admin key; `None` disables admin endpoints
    pub admin_key_hash: Option<String>,
}

impl ApiState {
    /// Builds the production state on top of a PostgreSQL pool
    pub fn from_config(config: &config::ApiConfig, db_pool: DbPool) -> Result<Self> {
        let calendar = match &config.calendar {
            Some(calendar_config) => {
                info!(
                    "Calendar sync enabled for {} calendar(s)",
                    calendar_config.calendar_ids.len()
                );
                Some(Arc::new(GoogleFreeBusy::new(calendar_config)?) as Arc<dyn FreeBusyProvider>)
            }
            None => None,
        };

        Ok(Self {
            bookings: Arc::new(PgBookingStore::new(db_pool.clone())),
            settings: SettingsCache::new(Arc::new(PgSettingsStore::new(db_pool))),
            calendar,
            timezone: config.timezone,
            admin_key_hash: config.admin_key_hash.clone(),
        })
    }
}

/// Builds the application router with all routes and request tracing
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Slot availability endpoints
        .merge(routes::availability::routes())
        // Booking endpoints
        .merge(routes::booking::routes())
        // Salon settings endpoints
        .merge(routes::settings::routes())
        // Attach shared state to all routes
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Starts the API server with the provided configuration and database connection
///
/// This function initializes logging, builds the shared state, configures
/// routes and middleware, and serves HTTP until the process exits.
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Serving business hours in timezone {}", config.timezone);
    let state = Arc::new(ApiState::from_config(&config, db_pool)?);
    let app = router(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .wrap_err("Invalid origin in API_CORS_ORIGINS")?;
        let cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        ServiceBuilder::new().layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
