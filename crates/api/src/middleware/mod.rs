/// Admin key hashing, verification and the `AdminAccess` extractor
pub mod auth;
/// Mapping of domain errors to HTTP responses
pub mod error_handling;
