//! Shared types for the booking core
//!
//! Data models, error types and small utilities used by the
//! `booking-core` engine and any crate sitting on top of it.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{BookingError, BookingResult};
pub use serde::{Deserialize, Serialize};
