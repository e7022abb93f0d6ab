//! Slot Generator
//!
//! Enumerates fixed-duration candidate windows across a day at the room's
//! coarse slot step, dropping any whose blocked span (user window plus
//! turnaround buffer) overlaps an existing booking's block window.
//!
//! Minimum-duration enforcement is deliberately left to the caller; the
//! generator will happily enumerate shorter windows.

use serde::{Deserialize, Serialize};
use shared::models::Room;

use crate::conflict::BlockSpan;
use crate::grid::{DayGrid, TimeWindow};
use crate::{policy, pricing};

/// One available candidate window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Grid minute the user window starts at
    pub start_minutes: i64,
    /// Grid minute the user window ends at
    pub end_minutes: i64,
    pub duration_minutes: i64,
    /// Turnaround minutes appended after the user end
    pub buffer_after: i64,
    /// User duration plus buffer
    pub blocked_minutes: i64,
    pub price: f64,
}

impl Slot {
    pub fn user_window(&self) -> TimeWindow {
        TimeWindow {
            start: self.start_minutes,
            end: self.end_minutes,
        }
    }

    pub fn block_end_minutes(&self) -> i64 {
        self.start_minutes + self.blocked_minutes
    }
}

/// Enumerate available slots of `duration_minutes` for a room on a day.
///
/// `spans` are the day's existing bookings (already converted via
/// [`crate::conflict::booking_spans`], which drops cancelled records).
/// Output is chronological; recompute fully whenever day, room, duration
/// or the booking collection changes.
pub fn generate_slots(
    grid: &DayGrid,
    room: &Room,
    duration_minutes: i64,
    spans: &[BlockSpan],
) -> Vec<Slot> {
    if duration_minutes <= 0 {
        return Vec::new();
    }

    let step = policy::slot_step(room);
    let buffer_after = policy::buffer_after(room.category);
    let last_start = grid.span_minutes() - duration_minutes;

    let mut slots = Vec::new();
    let mut start = 0;
    while start <= last_start {
        let block = TimeWindow {
            start,
            end: start + duration_minutes + buffer_after,
        };
        if spans.iter().all(|s| !block.overlaps(&s.block)) {
            slots.push(Slot {
                start_minutes: start,
                end_minutes: start + duration_minutes,
                duration_minutes,
                buffer_after,
                blocked_minutes: duration_minutes + buffer_after,
                price: pricing::price_for_room(room, duration_minutes),
            });
        }
        start += step;
    }
    slots
}
