//! Booking Model

use serde::{Deserialize, Serialize};

/// Booking status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// Durable booking entity
///
/// `start_time`/`end_time` are what the user sees; `block_*` is the window
/// actually held against the calendar (user window plus turnaround buffer),
/// computed once at creation and persisted for stability. Block fields are
/// optional for legacy records written before buffers existed; consumers
/// must fall back to deriving them from current policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub room_id: i64,
    pub user_id: i64,
    /// User-visible start (Unix millis)
    pub start_time: i64,
    /// User-visible end (Unix millis)
    pub end_time: i64,
    pub block_start_time: Option<i64>,
    pub block_end_time: Option<i64>,
    /// Buffer minutes before the user window (always 0 in current policy)
    pub buffer_before: Option<i64>,
    /// Buffer minutes after the user window
    pub buffer_after: Option<i64>,
    pub status: BookingStatus,
    pub price: f64,
    pub notes: Option<String>,
    /// Denormalized for faster rendering
    pub room_name: Option<String>,
    /// Denormalized for faster rendering
    pub user_name: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Booking {
    /// Whether this booking participates in conflict checks.
    pub fn is_conflict_relevant(&self) -> bool {
        self.status != BookingStatus::Cancelled
    }
}

/// Create booking payload (price and block window are computed server-side)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    pub room_id: i64,
    pub user_id: i64,
    pub start_time: i64,
    pub end_time: i64,
    pub block_start_time: i64,
    pub block_end_time: i64,
    pub buffer_before: i64,
    pub buffer_after: i64,
    pub price: f64,
    pub notes: Option<String>,
    pub room_name: Option<String>,
    pub user_name: Option<String>,
}
