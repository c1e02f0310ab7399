use time::OffsetDateTime;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::bounds::elapsed_seconds;

/// Background task republishing the elapsed seconds of a running timer
/// once per second.
///
/// Every tick recomputes the value from the anchor timestamp instead of
/// incrementing the previous one, so the feed self-corrects after a stall
/// or missed ticks. Dropping the driver aborts the task; the session drops
/// it on every path that leaves the running phase.
pub struct TickDriver {
    handle: JoinHandle<()>,
}

impl TickDriver {
    pub fn spawn(anchor: OffsetDateTime, tx: watch::Sender<i64>) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(1));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let elapsed = elapsed_seconds(anchor, OffsetDateTime::now_utc());
                if tx.send(elapsed).is_err() {
                    break;
                }
            }
        });

        Self { handle }
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn publishes_full_wall_clock_elapsed() {
        // An anchor 100s in the past must yield ~100 on the first tick,
        // not 1: the value is derived, not counted.
        let anchor = OffsetDateTime::now_utc() - time::Duration::seconds(100);
        let (tx, mut rx) = watch::channel(0i64);
        let _driver = TickDriver::spawn(anchor, tx);

        rx.changed().await.unwrap();
        let published = *rx.borrow();
        assert!((100..=102).contains(&published), "published {}", published);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_aborts_the_task() {
        let (tx, rx) = watch::channel(0i64);
        let driver = TickDriver::spawn(OffsetDateTime::now_utc(), tx);

        drop(driver);
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        // The task held the only sender; an aborted task drops it.
        assert!(rx.has_changed().is_err());
    }
}
