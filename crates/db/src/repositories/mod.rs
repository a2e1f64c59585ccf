//! Postgres-backed stores.
//!
//! Each store is exposed as an async trait so that the API layer can be
//! exercised against the mocks in [`crate::mock`].

pub mod booking;
pub mod settings;

pub use booking::{BookingStore, PgBookingStore};
pub use settings::{PgSettingsStore, SettingsStore};
