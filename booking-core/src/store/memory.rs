//! In-memory store
//!
//! DashMap-backed implementation of all three store traits. Used by tests
//! and by single-process deployments; per-entry operations only, so the
//! sweep can run concurrently with creates and renews without a global
//! lock.

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use shared::BookingResult;
use shared::models::{Booking, BookingStatus, NewBooking, PendingReservation, Room};
use shared::util::{now_millis, snowflake_id};

use super::{BookingStore, HoldStore, RoomStore};

/// Shared in-memory store for rooms, bookings and holds
#[derive(Debug, Default)]
pub struct MemoryStore {
    rooms: DashMap<i64, Room>,
    bookings: DashMap<i64, Booking>,
    holds: DashMap<i64, PendingReservation>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or replace a room.
    pub fn put_room(&self, room: Room) {
        self.rooms.insert(room.id, room);
    }

    /// Test/setup hook: insert a booking record as-is.
    pub fn put_booking(&self, booking: Booking) {
        self.bookings.insert(booking.id, booking);
    }

    pub fn booking_count(&self) -> usize {
        self.bookings.len()
    }

    pub fn hold_count(&self) -> usize {
        self.holds.len()
    }
}

#[async_trait]
impl RoomStore for MemoryStore {
    async fn get_room(&self, id: i64) -> BookingResult<Option<Room>> {
        Ok(self.rooms.get(&id).map(|r| r.clone()))
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn list_for_room_and_day(
        &self,
        room_id: i64,
        day: NaiveDate,
    ) -> BookingResult<Vec<Booking>> {
        let day_start = day
            .and_hms_opt(0, 0, 0)
            .unwrap_or_default()
            .and_utc()
            .timestamp_millis();
        let day_end = day_start + 24 * 3600 * 1000;
        let mut out: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|b| b.room_id == room_id && b.start_time >= day_start && b.start_time < day_end)
            .map(|b| b.clone())
            .collect();
        out.sort_by_key(|b| b.start_time);
        Ok(out)
    }

    async fn create(&self, data: NewBooking) -> BookingResult<Booking> {
        let now = now_millis();
        let booking = Booking {
            id: snowflake_id(),
            room_id: data.room_id,
            user_id: data.user_id,
            start_time: data.start_time,
            end_time: data.end_time,
            block_start_time: Some(data.block_start_time),
            block_end_time: Some(data.block_end_time),
            buffer_before: Some(data.buffer_before),
            buffer_after: Some(data.buffer_after),
            status: BookingStatus::Pending,
            price: data.price,
            notes: data.notes,
            room_name: data.room_name,
            user_name: data.user_name,
            created_at: now,
            updated_at: now,
        };
        self.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn set_status(&self, id: i64, status: BookingStatus) -> BookingResult<bool> {
        match self.bookings.get_mut(&id) {
            Some(mut b) => {
                b.status = status;
                b.updated_at = now_millis();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl HoldStore for MemoryStore {
    async fn list_active_for_room(
        &self,
        room_id: i64,
        now: i64,
    ) -> BookingResult<Vec<PendingReservation>> {
        let mut out: Vec<PendingReservation> = self
            .holds
            .iter()
            .filter(|h| h.room_id == room_id && !h.is_expired(now))
            .map(|h| h.clone())
            .collect();
        out.sort_by_key(|h| h.start_time);
        Ok(out)
    }

    async fn get(&self, id: i64) -> BookingResult<Option<PendingReservation>> {
        Ok(self.holds.get(&id).map(|h| h.clone()))
    }

    async fn insert(&self, hold: PendingReservation) -> BookingResult<()> {
        self.holds.insert(hold.id, hold);
        Ok(())
    }

    async fn set_expiry(&self, id: i64, expires_at: i64) -> BookingResult<bool> {
        match self.holds.get_mut(&id) {
            Some(mut h) => {
                h.expires_at = expires_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> BookingResult<bool> {
        Ok(self.holds.remove(&id).is_some())
    }

    async fn list_all(&self) -> BookingResult<Vec<PendingReservation>> {
        Ok(self.holds.iter().map(|h| h.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::models::RoomCategory;

    fn room() -> Room {
        Room {
            id: 1,
            name: "Animus".to_string(),
            category: RoomCategory::Booth,
            capacity: 2,
            description: None,
            min_duration: 15,
            hourly_rate: 12.0,
            daily_rate: None,
            weekly_rate: None,
            discount_percentage: None,
            discount_min_duration: None,
            slot_step: None,
            snap_step: None,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[tokio::test]
    async fn room_round_trip() {
        let store = MemoryStore::new();
        store.put_room(room());
        assert!(store.get_room(1).await.unwrap().is_some());
        assert!(store.get_room(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn bookings_are_scoped_to_day() {
        let store = MemoryStore::new();
        let day = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let other_day = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        let base = day
            .and_hms_opt(9, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis();

        let created = store
            .create(NewBooking {
                room_id: 1,
                user_id: 7,
                start_time: base,
                end_time: base + 3_600_000,
                block_start_time: base,
                block_end_time: base + 4_500_000,
                buffer_before: 0,
                buffer_after: 15,
                price: 12.0,
                notes: None,
                room_name: None,
                user_name: None,
            })
            .await
            .unwrap();
        assert_eq!(created.status, BookingStatus::Pending);

        assert_eq!(store.list_for_room_and_day(1, day).await.unwrap().len(), 1);
        assert!(
            store
                .list_for_room_and_day(1, other_day)
                .await
                .unwrap()
                .is_empty()
        );
        assert!(store.list_for_room_and_day(2, day).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn hold_delete_is_idempotent() {
        let store = MemoryStore::new();
        let hold = PendingReservation {
            id: 5,
            room_id: 1,
            user_id: 7,
            start_time: 0,
            end_time: 3_600_000,
            block_start_time: 0,
            block_end_time: 4_500_000,
            buffer_before: 0,
            buffer_after: 15,
            price: 12.0,
            notes: None,
            room_name: None,
            user_name: None,
            created_at: 0,
            expires_at: 180_000,
        };
        store.insert(hold).await.unwrap();
        assert!(store.delete(5).await.unwrap());
        assert!(!store.delete(5).await.unwrap());
    }

    #[tokio::test]
    async fn active_listing_hides_expired() {
        let store = MemoryStore::new();
        let hold = PendingReservation {
            id: 6,
            room_id: 1,
            user_id: 7,
            start_time: 0,
            end_time: 3_600_000,
            block_start_time: 0,
            block_end_time: 4_500_000,
            buffer_before: 0,
            buffer_after: 15,
            price: 12.0,
            notes: None,
            room_name: None,
            user_name: None,
            created_at: 0,
            expires_at: 180_000,
        };
        store.insert(hold).await.unwrap();
        assert_eq!(store.list_active_for_room(1, 0).await.unwrap().len(), 1);
        assert!(
            store
                .list_active_for_room(1, 180_000)
                .await
                .unwrap()
                .is_empty()
        );
        // Still present for the sweep
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }
}
