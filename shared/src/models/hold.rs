//! Pending Reservation Model (soft lock)

use serde::{Deserialize, Serialize};

/// Short-lived hold on a time window while a user decides
///
/// Non-durable and TTL-bound: `expires_at > created_at` always. Expiry is
/// a silent, terminal transition — nothing is pushed to the owner; callers
/// poll [`PendingReservation::remaining_seconds`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingReservation {
    pub id: i64,
    pub room_id: i64,
    pub user_id: i64,
    /// User-visible start (Unix millis)
    pub start_time: i64,
    /// User-visible end (Unix millis)
    pub end_time: i64,
    pub block_start_time: i64,
    pub block_end_time: i64,
    pub buffer_before: i64,
    pub buffer_after: i64,
    /// Price captured at hold time; commit recomputes the authoritative one
    pub price: f64,
    pub notes: Option<String>,
    pub room_name: Option<String>,
    pub user_name: Option<String>,
    pub created_at: i64,
    pub expires_at: i64,
}

impl PendingReservation {
    /// Whole seconds left before expiry, never negative.
    pub fn remaining_seconds(&self, now: i64) -> i64 {
        ((self.expires_at - now).max(0)) / 1000
    }

    /// A hold past its expiry no longer blocks anyone.
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}
