//! Shared wire and domain types for the darkroom service.

pub mod api;
pub mod enums;
pub mod models;
pub mod validate;
