//! Hold session
//!
//! Caller-owned handle for one active hold. Bundles the hold's identity
//! and expiry with a `CancellationToken` so countdown UI or renewal timers
//! can be torn down deterministically: explicit release cancels the token
//! and best-effort deletes the record, and merely dropping the session
//! cancels the token too. No implicit teardown hooks.

use std::sync::Arc;

use shared::BookingResult;
use shared::models::{Booking, PendingReservation};
use tokio_util::sync::CancellationToken;

use super::HoldManager;

/// Owned handle to one soft lock
pub struct HoldSession {
    hold: PendingReservation,
    manager: Arc<HoldManager>,
    cancel: CancellationToken,
}

impl HoldSession {
    pub fn new(manager: Arc<HoldManager>, hold: PendingReservation) -> Self {
        Self {
            hold,
            manager,
            cancel: CancellationToken::new(),
        }
    }

    pub fn hold_id(&self) -> i64 {
        self.hold.id
    }

    pub fn expires_at(&self) -> i64 {
        self.hold.expires_at
    }

    /// Whole seconds until expiry, never negative. Callers poll this; the
    /// core pushes no expiry notifications.
    pub fn remaining_seconds(&self, now: i64) -> i64 {
        self.hold.remaining_seconds(now)
    }

    /// Token for timer tasks tied to this session's lifetime.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Push the expiry forward by the full TTL.
    pub async fn renew(&mut self) -> BookingResult<i64> {
        let expires_at = self.manager.renew(self.hold.id).await?;
        self.hold.expires_at = expires_at;
        Ok(expires_at)
    }

    /// Finalize into a durable booking. On conflict the hold stays in
    /// place and the session remains usable (retry or release).
    pub async fn commit(&self) -> BookingResult<Booking> {
        let booking = self.manager.commit(self.hold.id).await?;
        self.cancel.cancel();
        Ok(booking)
    }

    /// Cancel timers and delete the hold. Best-effort: a failing store
    /// delete is logged inside the manager, and local timer state is
    /// cleared regardless.
    pub async fn release(self) {
        self.cancel.cancel();
        self.manager.release(self.hold.id).await;
    }
}

impl Drop for HoldSession {
    fn drop(&mut self) {
        // Timer teardown must not depend on an explicit release call.
        self.cancel.cancel();
    }
}
