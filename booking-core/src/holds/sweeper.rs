//! Periodic sweep
//!
//! Routine maintenance, not error recovery: every interval, delete holds
//! whose expiry has passed. Runs independently of user actions and
//! tolerates concurrent creates and renews (the sweep is a per-record
//! expiry check).

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use shared::util::now_millis;
use std::panic::AssertUnwindSafe;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::HoldManager;

/// Default sweep cadence: once a minute
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Handle to the background sweep task
pub struct Sweeper {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

impl Sweeper {
    /// Start sweeping on `interval`. The task is panic-isolated: a panic
    /// is logged as a bug, it never takes the process down.
    pub fn spawn(manager: Arc<HoldManager>, interval: Duration) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let run = async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        manager.sweep_expired(now_millis()).await;
                    }
                }
            }
            tracing::debug!("hold sweeper stopped");
        };

        let wrapped = async move {
            if let Err(panic_info) = AssertUnwindSafe(run).catch_unwind().await {
                let panic_msg: String = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    (*s).to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                tracing::error!(
                    panic = %panic_msg,
                    "Hold sweeper panicked! This is a bug that should be reported."
                );
            }
        };

        let handle = tokio::spawn(wrapped);
        tracing::debug!("hold sweeper started");
        Self { handle, cancel }
    }

    /// Graceful shutdown: signal and wait for the task to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(err) = self.handle.await
            && !err.is_cancelled()
        {
            tracing::error!(error = ?err, "hold sweeper join failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{DayGrid, TimeWindow};
    use crate::store::MemoryStore;
    use chrono::NaiveDate;
    use shared::models::{Room, RoomCategory};

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
    async fn sweeper_removes_holds_created_in_the_past() {
        let store = Arc::new(MemoryStore::new());
        store.put_room(room());
        let manager = Arc::new(HoldManager::with_store(store.clone()));
        let grid = DayGrid::new(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());

        // Created far enough in the past that its TTL is already over.
        manager
            .create_at(
                now_millis() - 600_000,
                7,
                1,
                &grid,
                TimeWindow { start: 0, end: 30 },
                None,
            )
            .await
            .unwrap();
        assert_eq!(store.hold_count(), 1);

        let sweeper = Sweeper::spawn(manager, Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(100)).await;
        sweeper.shutdown().await;

        assert_eq!(store.hold_count(), 0);
    }
}
