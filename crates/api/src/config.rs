//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the SalonBook API server.
//! It retrieves configuration values from environment variables and provides defaults
//! where appropriate.
//!
//! ## Environment Variables
//!
//! The following environment variables are used:
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Request timeout (default: 30)
//! - `SALON_TIMEZONE`: IANA timezone of the business hours (default: "Europe/Zurich")
//! - `ADMIN_KEY_HASH`: Argon2 PHC hash of the admin key; admin endpoints are disabled without it
//! - `GOOGLE_CALENDAR_ACCESS_TOKEN`: Enables the calendar-backed availability path
//! - `GOOGLE_CALENDAR_IDS`: Comma-separated calendar ids (default: "primary")
//! - `GOOGLE_CALENDAR_TIMEOUT_SECONDS`: Free/busy request timeout (default: 10)

use chrono_tz::Tz;
use eyre::{Result, WrapErr, eyre};
use std::env;
use tracing::Level;

/// Credentials and targets for the Google Calendar free/busy lookup
#[derive(Debug, Clone)]
pub struct CalendarConfig {
    /// OAuth access token obtained outside of this service
    pub access_token: String,

    /// Calendars whose busy ranges block slots
    pub calendar_ids: Vec<String>,

    /// Timeout for a single free/busy request in seconds
    pub timeout_seconds: u64,
}

/// Configuration for the SalonBook API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use salonbook_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Timezone in which business hours are interpreted
    pub timezone: Tz,

    /// Argon2 hash of the admin key (optional)
    pub admin_key_hash: Option<String>,

    /// Google Calendar free/busy settings (optional)
    pub calendar: Option<CalendarConfig>,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - The API_PORT value cannot be parsed as a u16
    /// - The SALON_TIMEZONE value is not a known IANA timezone
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;

        // Logging settings
        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| split_list(&origins));

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        // Salon settings
        let timezone = parse_timezone(
            &env::var("SALON_TIMEZONE").unwrap_or_else(|_| "Europe/Zurich".to_string()),
        )?;

        // Security settings
        let admin_key_hash = env::var("ADMIN_KEY_HASH").ok().filter(|hash| !hash.is_empty());

        // Calendar settings
        let calendar = env::var("GOOGLE_CALENDAR_ACCESS_TOKEN")
            .ok()
            .filter(|token| !token.is_empty())
            .map(|access_token| {
                let calendar_ids = env::var("GOOGLE_CALENDAR_IDS")
                    .map(|ids| split_list(&ids))
                    .ok()
                    .filter(|ids| !ids.is_empty())
                    .unwrap_or_else(|| vec!["primary".to_string()]);
                let timeout_seconds = env::var("GOOGLE_CALENDAR_TIMEOUT_SECONDS")
                    .ok()
                    .and_then(|value| value.parse().ok())
                    .unwrap_or(10);
                CalendarConfig {
                    access_token,
                    calendar_ids,
                    timeout_seconds,
                }
            });

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            timezone,
            admin_key_hash,
            calendar,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Maps a `LOG_LEVEL` value to a tracing level, falling back to INFO.
pub fn parse_log_level(value: &str) -> Level {
    match value.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

pub fn parse_timezone(value: &str) -> Result<Tz> {
    value
        .parse::<Tz>()
        .map_err(|e| eyre!("Invalid SALON_TIMEZONE value {:?}: {}", value, e))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
