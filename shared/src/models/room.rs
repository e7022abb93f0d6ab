//! Room Model

use serde::{Deserialize, Serialize};

/// Room category enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomCategory {
    Meeting,
    Office,
    Booth,
    OpenSpace,
}

/// Room entity (read-only to the booking core)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
    pub category: RoomCategory,
    pub capacity: i32,
    pub description: Option<String>,
    /// Minimum booking duration in minutes
    pub min_duration: i64,
    pub hourly_rate: f64,
    pub daily_rate: Option<f64>,
    pub weekly_rate: Option<f64>,
    /// Discount percentage (e.g. 20 = 20% off)
    pub discount_percentage: Option<f64>,
    /// Minimum duration in minutes before the discount applies
    pub discount_min_duration: Option<i64>,
    /// Slot enumeration granularity in minutes (falls back to a category
    /// default when absent)
    pub slot_step: Option<i64>,
    /// Fine-grained drag/positioning granularity in minutes (falls back to
    /// the slot step when absent)
    pub snap_step: Option<i64>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}
