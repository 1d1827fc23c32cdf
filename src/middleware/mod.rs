//! Middleware HTTP y extractores

pub mod auth;
pub mod cors;
pub mod validated_json;

pub use validated_json::ValidatedJson;
