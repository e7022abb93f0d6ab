//! Data models
//!
//! Shared between the engine and whatever surface sits on top of it.
//! All IDs are `i64` (snowflake-style), all timestamps are Unix millis.

pub mod booking;
pub mod hold;
pub mod room;

// Re-exports
pub use booking::*;
pub use hold::*;
pub use room::*;
