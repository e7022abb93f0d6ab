//! Buffer and step policy
//!
//! The single source of truth mapping a room category to its turnaround
//! buffer and to the default slot/snap step sizes. Buffer for a *new*
//! candidate window is always recomputed from this table; only an
//! *existing* booking's persisted block window takes precedence over it.

use shared::models::{Room, RoomCategory};

/// Trailing turnaround minutes after a booking's user end time.
pub fn buffer_after(category: RoomCategory) -> i64 {
    match category {
        RoomCategory::Meeting => 15,
        RoomCategory::Office => 15,
        RoomCategory::Booth => 15,
        RoomCategory::OpenSpace => 0,
    }
}

/// Leading buffer minutes. Zero for every category today; the data model
/// supports nonzero values but no behavior exercises them yet.
pub fn buffer_before(_category: RoomCategory) -> i64 {
    0
}

/// Default coarse slot-enumeration step per category, used when the room
/// does not configure its own.
pub fn default_slot_step(category: RoomCategory) -> i64 {
    match category {
        RoomCategory::Meeting => 30,
        RoomCategory::Office => 60,
        RoomCategory::Booth => 15,
        RoomCategory::OpenSpace => 30,
    }
}

/// Default fine drag-snap step per category. Deliberately finer than the
/// slot step for categories where continuous positioning is common.
pub fn default_snap_step(category: RoomCategory) -> i64 {
    match category {
        RoomCategory::Meeting => 15,
        RoomCategory::Office => 30,
        RoomCategory::Booth => 5,
        RoomCategory::OpenSpace => 15,
    }
}

/// Effective slot step for a room: configured value or category default.
pub fn slot_step(room: &Room) -> i64 {
    room.slot_step
        .filter(|s| *s > 0)
        .unwrap_or_else(|| default_slot_step(room.category))
}

/// Effective snap step for a room: configured snap step, else the room's
/// slot step, else the category snap default. Slot and snap are distinct
/// granularities and must not be merged.
pub fn snap_step(room: &Room) -> i64 {
    room.snap_step
        .filter(|s| *s > 0)
        .or(room.slot_step.filter(|s| *s > 0))
        .unwrap_or_else(|| default_snap_step(room.category))
}

/// Snap a grid minute down to the room's snap granularity.
pub fn snap_to_step(room: &Room, minutes: i64) -> i64 {
    let step = snap_step(room);
    (minutes / step) * step
}
