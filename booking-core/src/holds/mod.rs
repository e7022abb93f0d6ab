//! Soft locks
//!
//! Short-lived, TTL-bound holds that let one user keep a window while they
//! decide, without committing a durable booking. The lock is advisory:
//! nothing stops a misbehaving writer from creating a booking directly, so
//! commit-time re-validation is the real correctness backstop.

mod manager;
mod session;
mod sweeper;

pub use manager::{HOLD_TTL_MILLIS, HoldManager};
pub use session::HoldSession;
pub use sweeper::{SWEEP_INTERVAL, Sweeper};
