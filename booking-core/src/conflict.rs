//! Conflict Detector
//!
//! Classifies an arbitrary candidate window against existing bookings and
//! other users' holds. Overlap in *user* time is a hard conflict
//! (`Blocked`); overlap that only falls in *buffer* (turnaround) time is a
//! soft one (`Conflict`). Adjacency is not a user conflict — back-to-back
//! bookings are fine — but buffer time is enforced uniformly, with no
//! back-to-back carve-outs.
//!
//! Pure and synchronous: callers load the collections and convert them to
//! [`BlockSpan`]s, then re-run [`evaluate`] whenever day, duration, room or
//! either collection changes.

use serde::{Deserialize, Serialize};
use shared::models::{Booking, PendingReservation, Room};

use crate::grid::{DayGrid, TimeWindow};
use crate::policy;

/// Whether an overlap falls in the other entity's user time or only in
/// buffer time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictKind {
    User,
    Buffer,
}

/// One overlapping sub-interval, tagged by kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRange {
    pub window: TimeWindow,
    pub kind: ConflictKind,
}

/// Overall classification of a candidate window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityStatus {
    Available,
    Conflict,
    Blocked,
}

/// Result of evaluating a candidate window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    pub status: AvailabilityStatus,
    pub conflict_ranges: Vec<ConflictRange>,
    /// Percentage of the candidate's blocked span free of conflicts,
    /// clamped to 0..=100
    pub availability_score: u8,
    /// Gate for creating a soft lock
    pub can_confirm: bool,
}

/// An existing entity's footprint on the grid: its user window, its block
/// window (user window plus buffer) and its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    pub user: TimeWindow,
    pub block: TimeWindow,
    pub owner: i64,
}

impl BlockSpan {
    /// Footprint of a durable booking on `grid`'s day.
    ///
    /// Cancelled bookings have no footprint. The persisted block window is
    /// preferred; legacy records without one get a block window derived
    /// from *current* category policy.
    pub fn from_booking(grid: &DayGrid, room: &Room, booking: &Booking) -> Option<Self> {
        if !booking.is_conflict_relevant() {
            return None;
        }
        let user = match grid.window_from_millis(booking.start_time, booking.end_time) {
            Ok(w) => w,
            Err(_) => {
                tracing::warn!(booking_id = booking.id, "skipping booking with invalid window");
                return None;
            }
        };
        let block = match (booking.block_start_time, booking.block_end_time) {
            (Some(bs), Some(be)) => grid.window_from_millis(bs, be).unwrap_or(user),
            _ => TimeWindow {
                start: user.start - policy::buffer_before(room.category),
                end: user.end + policy::buffer_after(room.category),
            },
        };
        Some(Self {
            user,
            block,
            owner: booking.user_id,
        })
    }

    /// Footprint of a soft lock on `grid`'s day. Expired holds have none.
    pub fn from_hold(grid: &DayGrid, hold: &PendingReservation, now: i64) -> Option<Self> {
        if hold.is_expired(now) {
            return None;
        }
        let user = match grid.window_from_millis(hold.start_time, hold.end_time) {
            Ok(w) => w,
            Err(_) => {
                tracing::warn!(hold_id = hold.id, "skipping hold with invalid window");
                return None;
            }
        };
        let block = grid
            .window_from_millis(hold.block_start_time, hold.block_end_time)
            .unwrap_or(user);
        Some(Self {
            user,
            block,
            owner: hold.user_id,
        })
    }
}

/// Convert a day's bookings into spans, dropping cancelled records.
pub fn booking_spans(grid: &DayGrid, room: &Room, bookings: &[Booking]) -> Vec<BlockSpan> {
    bookings
        .iter()
        .filter_map(|b| BlockSpan::from_booking(grid, room, b))
        .collect()
}

/// Convert a day's holds into spans, dropping expired records.
pub fn hold_spans(grid: &DayGrid, holds: &[PendingReservation], now: i64) -> Vec<BlockSpan> {
    holds
        .iter()
        .filter_map(|h| BlockSpan::from_hold(grid, h, now))
        .collect()
}

/// Evaluate a candidate window against existing bookings and other users'
/// holds.
///
/// Holds owned by `exclude_owner` are skipped — a user never conflicts
/// with their own hold. Bookings are never skipped, regardless of owner.
pub fn evaluate(
    room: &Room,
    candidate: TimeWindow,
    bookings: &[BlockSpan],
    holds: &[BlockSpan],
    exclude_owner: Option<i64>,
) -> Availability {
    let buffer_before = policy::buffer_before(room.category);
    let buffer_after = policy::buffer_after(room.category);
    let candidate_block = TimeWindow {
        start: candidate.start - buffer_before,
        end: candidate.end + buffer_after,
    };

    let mut ranges: Vec<ConflictRange> = Vec::new();
    let mut classify = |span: &BlockSpan| {
        let user_overlap = candidate.intersect(&span.user);
        if let Some(w) = user_overlap {
            ranges.push(ConflictRange {
                window: w,
                kind: ConflictKind::User,
            });
        }
        if let Some(block_overlap) = candidate_block.intersect(&span.block) {
            for w in subtract(block_overlap, user_overlap) {
                ranges.push(ConflictRange {
                    window: w,
                    kind: ConflictKind::Buffer,
                });
            }
        }
    };

    for span in bookings {
        classify(span);
    }
    for span in holds {
        if exclude_owner == Some(span.owner) {
            continue;
        }
        classify(span);
    }

    ranges.sort_by_key(|r| (r.window.start, r.window.end, r.kind == ConflictKind::Buffer));

    let has_user = ranges.iter().any(|r| r.kind == ConflictKind::User);
    let has_buffer = ranges.iter().any(|r| r.kind == ConflictKind::Buffer);
    let status = if has_user {
        AvailabilityStatus::Blocked
    } else if has_buffer {
        AvailabilityStatus::Conflict
    } else {
        AvailabilityStatus::Available
    };

    Availability {
        status,
        availability_score: score(candidate_block, &ranges),
        can_confirm: status == AvailabilityStatus::Available,
        conflict_ranges: ranges,
    }
}

/// Interval subtraction: the parts of `from` not covered by `remove`.
fn subtract(from: TimeWindow, remove: Option<TimeWindow>) -> Vec<TimeWindow> {
    let Some(cut) = remove.and_then(|r| from.intersect(&r)) else {
        return vec![from];
    };
    let mut out = Vec::new();
    if cut.start > from.start {
        out.push(TimeWindow {
            start: from.start,
            end: cut.start,
        });
    }
    if cut.end < from.end {
        out.push(TimeWindow {
            start: cut.end,
            end: from.end,
        });
    }
    out
}

/// 0–100 share of the candidate's blocked span free of conflicts.
///
/// Overlapping ranges are merged first so double-reported minutes (a user
/// overlap seen against two bookings, say) count once.
fn score(candidate_block: TimeWindow, ranges: &[ConflictRange]) -> u8 {
    let total = candidate_block.duration_minutes();
    if total <= 0 {
        return 0;
    }
    let conflict_minutes = merged_minutes(candidate_block, ranges);
    let ratio = 1.0 - (conflict_minutes as f64) / (total as f64);
    ((ratio * 100.0).round()).clamp(0.0, 100.0) as u8
}

/// Total minutes covered by the union of all ranges, clipped to `within`.
fn merged_minutes(within: TimeWindow, ranges: &[ConflictRange]) -> i64 {
    let mut clipped: Vec<TimeWindow> = ranges
        .iter()
        .filter_map(|r| r.window.intersect(&within))
        .collect();
    clipped.sort_by_key(|w| w.start);

    let mut sum = 0;
    let mut cursor = i64::MIN;
    for w in clipped {
        let start = w.start.max(cursor);
        if w.end > start {
            sum += w.end - start;
            cursor = w.end;
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{BookingStatus, RoomCategory};

    fn meeting_room() -> Room {
        Room {
            id: 1,
            name: "Monteriggioni".to_string(),
            category: RoomCategory::Meeting,
            capacity: 10,
            description: None,
            min_duration: 30,
            hourly_rate: 20.0,
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

    fn span(user_start: i64, user_end: i64, buffer_after: i64, owner: i64) -> BlockSpan {
        BlockSpan {
            user: TimeWindow {
                start: user_start,
                end: user_end,
            },
            block: TimeWindow {
                start: user_start,
                end: user_end + buffer_after,
            },
            owner,
        }
    }

    fn window(start: i64, end: i64) -> TimeWindow {
        TimeWindow { start, end }
    }

    #[test]
    fn empty_day_is_available() {
        let a = evaluate(&meeting_room(), window(0, 60), &[], &[], None);
        assert_eq!(a.status, AvailabilityStatus::Available);
        assert!(a.can_confirm);
        assert_eq!(a.availability_score, 100);
        assert!(a.conflict_ranges.is_empty());
    }

    #[test]
    fn buffer_only_overlap_is_soft_conflict() {
        // Booking user [120,180), block [120,195). Candidate [90,120):
        // user windows merely touch, but candidate block [90,135) reaches
        // into the booking's block at 120.
        let booking = span(120, 180, 15, 2);
        let a = evaluate(&meeting_room(), window(90, 120), &[booking], &[], None);
        assert_eq!(a.status, AvailabilityStatus::Conflict);
        assert!(!a.can_confirm);
        assert_eq!(a.conflict_ranges.len(), 1);
        assert_eq!(a.conflict_ranges[0].kind, ConflictKind::Buffer);
        assert_eq!(a.conflict_ranges[0].window, window(120, 135));
        // 15 conflicted of 45 blocked minutes
        assert_eq!(a.availability_score, 67);
    }

    #[test]
    fn user_overlap_is_blocked() {
        let booking = span(120, 180, 15, 2);
        let a = evaluate(&meeting_room(), window(135, 180), &[booking], &[], None);
        assert_eq!(a.status, AvailabilityStatus::Blocked);
        assert!(!a.can_confirm);
        assert!(
            a.conflict_ranges
                .iter()
                .any(|r| r.kind == ConflictKind::User && r.window == window(135, 180))
        );
    }

    #[test]
    fn back_to_back_without_buffer_is_available() {
        // Open-space rooms have no turnaround: adjacency is clean.
        let mut room = meeting_room();
        room.category = RoomCategory::OpenSpace;
        let booking = span(120, 180, 0, 2);
        let a = evaluate(&room, window(60, 120), &[booking], &[], None);
        assert_eq!(a.status, AvailabilityStatus::Available);
        assert_eq!(a.availability_score, 100);
    }

    #[test]
    fn own_hold_is_excluded_other_holds_are_not() {
        let hold = span(60, 120, 15, 42);
        let mine = evaluate(&meeting_room(), window(60, 120), &[], &[hold], Some(42));
        assert_eq!(mine.status, AvailabilityStatus::Available);
        assert!(mine.conflict_ranges.is_empty());

        let theirs = evaluate(&meeting_room(), window(60, 120), &[], &[hold], Some(7));
        assert_eq!(theirs.status, AvailabilityStatus::Blocked);
    }

    #[test]
    fn own_booking_is_not_excluded() {
        let booking = span(60, 120, 15, 42);
        let a = evaluate(&meeting_room(), window(60, 120), &[booking], &[], Some(42));
        assert_eq!(a.status, AvailabilityStatus::Blocked);
    }

    #[test]
    fn translation_invariance() {
        let booking = span(120, 180, 15, 2);
        let base = evaluate(&meeting_room(), window(90, 120), &[booking], &[], None);

        let offset = 240;
        let shifted_booking = span(120 + offset, 180 + offset, 15, 2);
        let shifted = evaluate(
            &meeting_room(),
            window(90 + offset, 120 + offset),
            &[shifted_booking],
            &[],
            None,
        );

        assert_eq!(base.status, shifted.status);
        assert_eq!(base.availability_score, shifted.availability_score);
        assert_eq!(base.conflict_ranges.len(), shifted.conflict_ranges.len());
    }

    #[test]
    fn overlapping_conflicts_count_once_in_score() {
        // Two bookings both covering [60,120): conflict minutes must not
        // double to 120.
        let b1 = span(60, 120, 15, 2);
        let b2 = span(60, 120, 15, 3);
        let a = evaluate(&meeting_room(), window(60, 120), &[b1, b2], &[], None);
        assert_eq!(a.status, AvailabilityStatus::Blocked);
        // Candidate block [60,135): 75 total, [60,135) fully conflicted
        // (user 60..120 + buffer 120..135).
        assert_eq!(a.availability_score, 0);
    }

    #[test]
    fn fully_blocked_scores_zero() {
        let booking = span(0, 840, 0, 2);
        let a = evaluate(&meeting_room(), window(60, 120), &[booking], &[], None);
        assert_eq!(a.availability_score, 0);
    }

    #[test]
    fn spans_skip_cancelled_and_expired() {
        let grid = DayGrid::new(chrono::NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        let room = meeting_room();

        let mut booking = Booking {
            id: 10,
            room_id: 1,
            user_id: 2,
            start_time: grid.to_millis(120),
            end_time: grid.to_millis(180),
            block_start_time: Some(grid.to_millis(120)),
            block_end_time: Some(grid.to_millis(195)),
            buffer_before: Some(0),
            buffer_after: Some(15),
            status: BookingStatus::Confirmed,
            price: 20.0,
            notes: None,
            room_name: None,
            user_name: None,
            created_at: 0,
            updated_at: 0,
        };
        assert_eq!(booking_spans(&grid, &room, &[booking.clone()]).len(), 1);

        booking.status = BookingStatus::Cancelled;
        assert!(booking_spans(&grid, &room, &[booking]).is_empty());

        let hold = PendingReservation {
            id: 11,
            room_id: 1,
            user_id: 3,
            start_time: grid.to_millis(300),
            end_time: grid.to_millis(360),
            block_start_time: grid.to_millis(300),
            block_end_time: grid.to_millis(375),
            buffer_before: 0,
            buffer_after: 15,
            price: 20.0,
            notes: None,
            room_name: None,
            user_name: None,
            created_at: 0,
            expires_at: 180_000,
        };
        assert_eq!(hold_spans(&grid, &[hold.clone()], 0).len(), 1);
        assert!(hold_spans(&grid, &[hold], 180_000).is_empty());
    }

    #[test]
    fn availability_serializes_with_screaming_snake_case_tags() {
        let booking = span(120, 180, 15, 2);
        let a = evaluate(&meeting_room(), window(90, 120), &[booking], &[], None);
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["status"], "CONFLICT");
        assert_eq!(json["conflict_ranges"][0]["kind"], "BUFFER");
        assert_eq!(json["can_confirm"], false);
    }

    #[test]
    fn legacy_booking_gets_policy_buffer() {
        let grid = DayGrid::new(chrono::NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        let room = meeting_room();
        let legacy = Booking {
            id: 12,
            room_id: 1,
            user_id: 2,
            start_time: grid.to_millis(120),
            end_time: grid.to_millis(180),
            block_start_time: None,
            block_end_time: None,
            buffer_before: None,
            buffer_after: None,
            status: BookingStatus::Pending,
            price: 20.0,
            notes: None,
            room_name: None,
            user_name: None,
            created_at: 0,
            updated_at: 0,
        };
        let spans = booking_spans(&grid, &room, &[legacy]);
        assert_eq!(spans[0].block, window(120, 195));
    }
}
