//! Booking availability and soft-lock scheduling core
//!
//! Reserves shared rooms for time windows without double-booking, with
//! mandatory post-use turnaround ("cleaning") time per room category.
//!
//! # Module structure
//!
//! ```text
//! booking-core/src/
//! ├── grid.rs      # Bounded minute axis for a day, wall-clock conversion
//! ├── policy.rs    # Category → buffer / slot-step / snap-step tables
//! ├── pricing.rs   # Duration + threshold-discount pricing
//! ├── slots.rs     # Fixed-duration candidate slot enumeration
//! ├── conflict.rs  # User-time vs buffer-time conflict classification
//! ├── holds/       # Soft-lock manager, hold session, periodic sweeper
//! └── store/       # Async store traits + in-memory implementation
//! ```
//!
//! The detector and generator are pure once given their input collections;
//! everything touching a store is async. The soft lock is advisory — the
//! commit-time re-validation in [`holds::HoldManager::commit`] is the real
//! correctness backstop.

pub mod conflict;
pub mod grid;
pub mod holds;
pub mod policy;
pub mod pricing;
pub mod slots;
pub mod store;

// Re-export public types
pub use conflict::{Availability, AvailabilityStatus, BlockSpan, ConflictKind, ConflictRange};
pub use grid::{DayGrid, TimeWindow};
pub use holds::{HoldManager, HoldSession, Sweeper};
pub use pricing::PriceQuote;
pub use slots::Slot;
pub use store::{BookingStore, HoldStore, MemoryStore, RoomStore};

// Re-export error types from shared
pub use shared::{BookingError, BookingResult};
