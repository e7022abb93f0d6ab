//! Soft-Lock Manager
//!
//! Hold lifecycle: none → held → (renewed)* → {committed | released |
//! expired}. One active hold per owner is expected at a time; callers are
//! responsible for releasing before creating another (no auto-merge here).
//!
//! Conflict *reads* fail open: when a store query cannot complete the
//! window is treated as free rather than blocking all bookings, because
//! the commit-time re-check is the backstop. Writes always propagate
//! failures.

use std::sync::Arc;

use chrono::NaiveDate;
use shared::models::{Booking, NewBooking, PendingReservation, Room};
use shared::util::{now_millis, snowflake_id};
use shared::{BookingError, BookingResult};

use crate::conflict::{self, Availability};
use crate::grid::{DayGrid, TimeWindow};
use crate::slots::{self, Slot};
use crate::store::{BookingStore, HoldStore, RoomStore};
use crate::{policy, pricing};

/// Fixed hold TTL: 3 minutes
pub const HOLD_TTL_MILLIS: i64 = 180_000;

/// Creates, renews, expires and commits soft locks against the stores
pub struct HoldManager {
    rooms: Arc<dyn RoomStore>,
    bookings: Arc<dyn BookingStore>,
    holds: Arc<dyn HoldStore>,
}

impl HoldManager {
    pub fn new(
        rooms: Arc<dyn RoomStore>,
        bookings: Arc<dyn BookingStore>,
        holds: Arc<dyn HoldStore>,
    ) -> Self {
        Self {
            rooms,
            bookings,
            holds,
        }
    }

    /// Wire all three seams to one store implementation.
    pub fn with_store<S>(store: Arc<S>) -> Self
    where
        S: RoomStore + BookingStore + HoldStore + 'static,
    {
        Self::new(store.clone(), store.clone(), store)
    }

    async fn require_active_room(&self, room_id: i64) -> BookingResult<Room> {
        let room = self
            .rooms
            .get_room(room_id)
            .await?
            .ok_or(BookingError::RoomNotFound(room_id))?;
        if !room.is_active {
            return Err(BookingError::RoomInactive(room_id));
        }
        Ok(room)
    }

    /// Day's bookings, failing open to an empty list on store errors.
    async fn bookings_fail_open(&self, room_id: i64, day: NaiveDate) -> Vec<Booking> {
        match self.bookings.list_for_room_and_day(room_id, day).await {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!(room_id, error = %err, "booking lookup failed, failing open");
                Vec::new()
            }
        }
    }

    /// Active holds, failing open to an empty list on store errors.
    async fn holds_fail_open(&self, room_id: i64, now: i64) -> Vec<PendingReservation> {
        match self.holds.list_active_for_room(room_id, now).await {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!(room_id, error = %err, "hold lookup failed, failing open");
                Vec::new()
            }
        }
    }

    /// Evaluate a freely positioned window against current bookings and
    /// other users' holds. Pure once the collections are loaded; reads
    /// fail open.
    pub async fn check_window(
        &self,
        room_id: i64,
        grid: &DayGrid,
        window: TimeWindow,
        exclude_owner: Option<i64>,
    ) -> BookingResult<Availability> {
        let room = self.require_active_room(room_id).await?;
        let now = now_millis();
        let bookings = self.bookings_fail_open(room_id, grid.date()).await;
        let holds = self.holds_fail_open(room_id, now).await;
        Ok(conflict::evaluate(
            &room,
            window,
            &conflict::booking_spans(grid, &room, &bookings),
            &conflict::hold_spans(grid, &holds, now),
            exclude_owner,
        ))
    }

    /// Enumerate available fixed-duration slots for a room on a day.
    pub async fn available_slots(
        &self,
        room_id: i64,
        grid: &DayGrid,
        duration_minutes: i64,
    ) -> BookingResult<Vec<Slot>> {
        let room = self.require_active_room(room_id).await?;
        let bookings = self.bookings_fail_open(room_id, grid.date()).await;
        let spans = conflict::booking_spans(grid, &room, &bookings);
        Ok(slots::generate_slots(grid, &room, duration_minutes, &spans))
    }

    /// Create a hold on a window. Requires the window to evaluate as
    /// confirmable right now; the caller runs this immediately after a
    /// selection.
    pub async fn create(
        &self,
        owner: i64,
        room_id: i64,
        grid: &DayGrid,
        window: TimeWindow,
        notes: Option<String>,
    ) -> BookingResult<PendingReservation> {
        self.create_at(now_millis(), owner, room_id, grid, window, notes)
            .await
    }

    /// [`HoldManager::create`] with an explicit clock, for deterministic
    /// tests.
    pub async fn create_at(
        &self,
        now: i64,
        owner: i64,
        room_id: i64,
        grid: &DayGrid,
        window: TimeWindow,
        notes: Option<String>,
    ) -> BookingResult<PendingReservation> {
        let room = self.require_active_room(room_id).await?;

        let duration = window.duration_minutes();
        if duration < room.min_duration {
            return Err(BookingError::BelowMinimumDuration {
                required: room.min_duration,
                requested: duration,
            });
        }
        if !grid.contains(&window) {
            return Err(BookingError::validation(
                "time window falls outside opening hours",
            ));
        }

        let bookings = self.bookings_fail_open(room_id, grid.date()).await;
        let holds = self.holds_fail_open(room_id, now).await;
        let availability = conflict::evaluate(
            &room,
            window,
            &conflict::booking_spans(grid, &room, &bookings),
            &conflict::hold_spans(grid, &holds, now),
            Some(owner),
        );
        if !availability.can_confirm {
            return Err(BookingError::conflict(
                "selected window conflicts with an existing booking or hold",
            ));
        }

        let buffer_before = policy::buffer_before(room.category);
        let buffer_after = policy::buffer_after(room.category);
        let hold = PendingReservation {
            id: snowflake_id(),
            room_id,
            user_id: owner,
            start_time: grid.to_millis(window.start),
            end_time: grid.to_millis(window.end),
            block_start_time: grid.to_millis(window.start - buffer_before),
            block_end_time: grid.to_millis(window.end + buffer_after),
            buffer_before,
            buffer_after,
            price: pricing::price_for_room(&room, duration),
            notes,
            room_name: Some(room.name.clone()),
            user_name: None,
            created_at: now,
            expires_at: now + HOLD_TTL_MILLIS,
        };
        self.holds.insert(hold.clone()).await?;
        tracing::debug!(hold_id = hold.id, room_id, owner, "hold created");
        Ok(hold)
    }

    /// Reset a hold's TTL. Returns the new expiry. Missing or already
    /// expired holds report [`BookingError::HoldExpired`], a soft failure.
    pub async fn renew(&self, id: i64) -> BookingResult<i64> {
        self.renew_at(now_millis(), id).await
    }

    /// [`HoldManager::renew`] with an explicit clock.
    pub async fn renew_at(&self, now: i64, id: i64) -> BookingResult<i64> {
        let hold = self
            .holds
            .get(id)
            .await?
            .ok_or(BookingError::HoldExpired(id))?;
        if hold.is_expired(now) {
            return Err(BookingError::HoldExpired(id));
        }
        let expires_at = now + HOLD_TTL_MILLIS;
        if !self.holds.set_expiry(id, expires_at).await? {
            return Err(BookingError::HoldExpired(id));
        }
        Ok(expires_at)
    }

    /// Delete a hold. Idempotent and best-effort: a failing store delete
    /// is logged, never surfaced — local state must be clearable
    /// regardless.
    pub async fn release(&self, id: i64) {
        match self.holds.delete(id).await {
            Ok(true) => tracing::debug!(hold_id = id, "hold released"),
            Ok(false) => {}
            Err(err) => {
                tracing::warn!(hold_id = id, error = %err, "hold release failed, record left for sweep");
            }
        }
    }

    /// Delete every hold with `expires_at ≤ now`. Returns the count
    /// removed. Idempotent; safe to run concurrently with creates and
    /// renews (per-record expiry check, no global lock).
    pub async fn sweep_expired(&self, now: i64) -> usize {
        let all = match self.holds.list_all().await {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!(error = %err, "sweep listing failed");
                return 0;
            }
        };
        let mut removed = 0;
        for hold in all.into_iter().filter(|h| h.is_expired(now)) {
            match self.holds.delete(hold.id).await {
                Ok(true) => removed += 1,
                Ok(false) => {} // someone else got there first
                Err(err) => {
                    tracing::warn!(hold_id = hold.id, error = %err, "sweep delete failed");
                }
            }
        }
        if removed > 0 {
            tracing::info!(removed, "cleaned up expired holds");
        }
        removed
    }

    /// Finalize a hold into a durable booking.
    ///
    /// Re-validates against the *current* durable bookings immediately
    /// before writing, to shrink (not eliminate) the read-check-write race.
    /// The losing side of a residual race gets [`BookingError::Conflict`]
    /// and keeps its hold, so the caller can re-select or release.
    pub async fn commit(&self, id: i64) -> BookingResult<Booking> {
        self.commit_at(now_millis(), id).await
    }

    /// [`HoldManager::commit`] with an explicit clock.
    pub async fn commit_at(&self, now: i64, id: i64) -> BookingResult<Booking> {
        let hold = self
            .holds
            .get(id)
            .await?
            .ok_or(BookingError::HoldExpired(id))?;
        if hold.is_expired(now) {
            return Err(BookingError::HoldExpired(id));
        }

        let room = self.require_active_room(hold.room_id).await?;
        let day = chrono::DateTime::from_timestamp_millis(hold.start_time)
            .map(|dt| dt.date_naive())
            .unwrap_or_default();
        let grid = DayGrid::new(day);
        let window = grid.window_from_millis(hold.start_time, hold.end_time)?;

        // Re-check against durable state; this read must not fail open.
        let bookings = self
            .bookings
            .list_for_room_and_day(hold.room_id, day)
            .await?;
        let availability = conflict::evaluate(
            &room,
            window,
            &conflict::booking_spans(&grid, &room, &bookings),
            &[],
            None,
        );
        if !availability.can_confirm {
            return Err(BookingError::conflict(
                "window was booked by another user while held",
            ));
        }

        // Block window and price are recomputed from current policy, not
        // copied from the hold.
        let buffer_before = policy::buffer_before(room.category);
        let buffer_after = policy::buffer_after(room.category);
        let booking = self
            .bookings
            .create(NewBooking {
                room_id: hold.room_id,
                user_id: hold.user_id,
                start_time: hold.start_time,
                end_time: hold.end_time,
                block_start_time: grid.to_millis(window.start - buffer_before),
                block_end_time: grid.to_millis(window.end + buffer_after),
                buffer_before,
                buffer_after,
                price: pricing::price_for_room(&room, window.duration_minutes()),
                notes: hold.notes.clone(),
                room_name: hold.room_name.clone(),
                user_name: hold.user_name.clone(),
            })
            .await?;

        // The hold served its purpose; a failed delete only means the
        // sweep cleans it up later.
        self.release(id).await;
        tracing::debug!(hold_id = id, booking_id = booking.id, "hold committed");
        Ok(booking)
    }
}
