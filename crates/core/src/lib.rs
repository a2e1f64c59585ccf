//! # SalonBook Core
//!
//! Domain types shared by the database and API crates, the common error type,
//! and the availability calculator that turns business hours and busy
//! intervals into bookable time slots.

/// Slot generation from business hours and busy intervals
pub mod availability;
/// Error type shared across the workspace
pub mod errors;
/// Serializable domain models
pub mod models;
