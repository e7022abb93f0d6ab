//! Store seams
//!
//! The booking and pending-reservation stores are shared and multi-writer;
//! nothing here hands out exclusive locks on a room's calendar. The core
//! talks to them through these traits so it can run against a remote
//! eventually-consistent store or an embedded one unchanged.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::BookingResult;
use shared::models::{Booking, BookingStatus, NewBooking, PendingReservation, Room};

/// Read-only room lookup
#[async_trait]
pub trait RoomStore: Send + Sync {
    async fn get_room(&self, id: i64) -> BookingResult<Option<Room>>;
}

/// Durable booking store
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Bookings whose user window falls on `day` for a room. Cancelled
    /// records are included; the core filters status itself.
    async fn list_for_room_and_day(&self, room_id: i64, day: NaiveDate)
    -> BookingResult<Vec<Booking>>;

    /// Persist a new booking. Write failures must propagate — never
    /// silently succeed.
    async fn create(&self, data: NewBooking) -> BookingResult<Booking>;

    /// Status transition (cancel, confirm). Returns false when the record
    /// is gone.
    async fn set_status(&self, id: i64, status: BookingStatus) -> BookingResult<bool>;
}

/// Soft-lock (pending reservation) store
#[async_trait]
pub trait HoldStore: Send + Sync {
    /// Unexpired holds for a room as of `now`.
    async fn list_active_for_room(
        &self,
        room_id: i64,
        now: i64,
    ) -> BookingResult<Vec<PendingReservation>>;

    async fn get(&self, id: i64) -> BookingResult<Option<PendingReservation>>;

    async fn insert(&self, hold: PendingReservation) -> BookingResult<()>;

    /// Push a hold's expiry forward. Returns false when the record is gone.
    async fn set_expiry(&self, id: i64, expires_at: i64) -> BookingResult<bool>;

    /// Returns false when the record was already gone (idempotent).
    async fn delete(&self, id: i64) -> BookingResult<bool>;

    /// Every hold, expired or not — for the periodic sweep.
    async fn list_all(&self) -> BookingResult<Vec<PendingReservation>>;
}
