//! Pricing Engine
//!
//! Pure function of duration, hourly rate and an optional threshold
//! discount. Uses rust_decimal internally, returns f64; no rounding is
//! imposed here — the presentation layer rounds for display.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use shared::models::Room;

/// Comparison duration for the informational "full day" reference price
pub const REFERENCE_DURATION_MINUTES: i64 = 8 * 60;

const MINUTES_PER_HOUR: i64 = 60;

/// Convert f64 to Decimal for calculation
#[inline]
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64
#[inline]
fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Price for a duration at an hourly rate, with an optional discount that
/// kicks in at `discount_threshold_minutes`.
///
/// Base = rate × minutes/60. The discount applies only when both the
/// percentage and the threshold are present and the duration reaches the
/// threshold. Never negative.
pub fn price(
    duration_minutes: i64,
    hourly_rate: f64,
    discount_pct: Option<f64>,
    discount_threshold_minutes: Option<i64>,
) -> f64 {
    let base = to_decimal(hourly_rate) * Decimal::from(duration_minutes.max(0))
        / Decimal::from(MINUTES_PER_HOUR);

    let amount = match (discount_pct, discount_threshold_minutes) {
        (Some(pct), Some(threshold)) if duration_minutes >= threshold => {
            let multiplier = Decimal::ONE - to_decimal(pct) / Decimal::ONE_HUNDRED;
            base * multiplier
        }
        _ => base,
    };

    to_f64(amount.max(Decimal::ZERO))
}

/// Price for a duration using the room's rate and discount fields.
pub fn price_for_room(room: &Room, duration_minutes: i64) -> f64 {
    price(
        duration_minutes,
        room.hourly_rate,
        room.discount_percentage,
        room.discount_min_duration,
    )
}

/// Informational quote: the amount plus a fixed-duration reference price
/// and the absolute savings against paying the reference rate pro-rata.
/// Straightforward evaluation of [`price`] at two durations, nothing more.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub amount: f64,
    /// Price of [`REFERENCE_DURATION_MINUTES`] at the same rate/discount
    pub reference_amount: f64,
    /// Undiscounted amount minus the discounted amount (0 when no
    /// discount applied)
    pub savings: f64,
}

/// Build a [`PriceQuote`] for a room and duration.
pub fn quote(room: &Room, duration_minutes: i64) -> PriceQuote {
    let amount = price_for_room(room, duration_minutes);
    let undiscounted = price(duration_minutes, room.hourly_rate, None, None);
    PriceQuote {
        amount,
        reference_amount: price_for_room(room, REFERENCE_DURATION_MINUTES),
        savings: (undiscounted - amount).max(0.0),
    }
}
