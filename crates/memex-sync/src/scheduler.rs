//! Scheduling (§4.7 "Scheduling"): a single-threaded 120 s timer whose
//! ticks are serialized — a still-running cycle skips the next tick rather
//! than overlapping. Grounded on the corpus's `tokio` (full features)
//! dependency already being present for async work elsewhere in the stack,
//! even though no single crate in the corpus shows a scheduler loop verbatim
//! (SPEC_FULL.md §4.7).

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use memex_core::constants::REPLICATION_TICK_SECONDS;

/// Runs `tick` every `REPLICATION_TICK_SECONDS`, skipping a tick if the
/// previous one is still in flight. Spawned as a plain `tokio::task` — the
/// caller holding no `JoinHandle` means the scheduler never keeps the
/// process alive on its own, per §4.7.
pub fn spawn<F, Fut>(tick: F) -> tokio::task::JoinHandle<()>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let busy = Arc::new(AtomicBool::new(false));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(REPLICATION_TICK_SECONDS));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if busy.swap(true, Ordering::SeqCst) {
                continue;
            }
            let busy = Arc::clone(&busy);
            let fut = tick();
            tokio::spawn(async move {
                fut.await;
                busy.store(false, Ordering::SeqCst);
            });
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test(start_paused = true)]
    async fn spawn_ticks_at_the_configured_interval() {
        let count = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&count);
        let handle = spawn(move || {
            let counted = Arc::clone(&counted);
            async move {
                counted.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::advance(Duration::from_secs(REPLICATION_TICK_SECONDS * 2 + 1)).await;
        tokio::task::yield_now().await;

        handle.abort();
        assert!(count.load(Ordering::SeqCst) >= 1);
    }
}
