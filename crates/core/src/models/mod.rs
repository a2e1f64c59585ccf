pub mod booking;
pub mod business_hours;
pub mod settings;
pub mod slot;
