use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// A manually-driven substitute for a chore's `tokio::time::interval`, so
/// tests can advance a long-lived loop deterministically instead of racing
/// real wall-clock sleeps.
///
/// `pause`/`resume` gate whether a `trigger` actually runs the chore body;
/// `trigger_wait` blocks until that run has finished, so assertions can
/// follow it immediately without a sleep.
#[derive(Clone)]
pub struct Cycle {
    notify: Arc<Notify>,
    ack: Arc<Notify>,
    paused: Arc<AtomicBool>,
    shutdown: CancellationToken,
}

impl Cycle {
    pub fn new() -> Self {
        Self {
            notify: Arc::new(Notify::new()),
            ack: Arc::new(Notify::new()),
            paused: Arc::new(AtomicBool::new(false)),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    /// Wake the loop for one iteration without waiting for it to finish.
    pub fn trigger(&self) {
        self.notify.notify_one();
    }

    /// Wake the loop and wait for that iteration to complete.
    pub async fn trigger_wait(&self) {
        self.notify.notify_one();
        self.ack.notified().await;
    }

    /// Stop the loop; a `run` in progress finishes its current body first.
    pub fn close(&self) {
        self.shutdown.cancel();
        self.notify.notify_waiters();
    }

    /// Drive `body` once per `trigger`, until `close`. Mirrors the
    /// production chore's `tokio::select!` shape with the real interval
    /// replaced by this cycle's notify.
    pub async fn run<F, Fut>(&self, mut body: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => return,
                _ = self.notify.notified() => {
                    if !self.paused.load(Ordering::SeqCst) {
                        body().await;
                    }
                    self.ack.notify_waiters();
                }
            }
        }
    }
}

impl Default for Cycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    #[tokio::test]
    async fn trigger_wait_runs_exactly_one_iteration() {
        let cycle = Cycle::new();
        let count = Arc::new(AtomicU32::new(0));

        let runner = {
            let cycle = cycle.clone();
            let count = count.clone();
            tokio::spawn(async move {
                cycle
                    .run(|| {
                        let count = count.clone();
                        async move {
                            count.fetch_add(1, Ordering::SeqCst);
                        }
                    })
                    .await;
            })
        };

        cycle.trigger_wait().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        cycle.trigger_wait().await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        cycle.close();
        runner.await.unwrap();
    }

    #[tokio::test]
    async fn paused_trigger_does_not_run_body() {
        let cycle = Cycle::new();
        let count = Arc::new(AtomicU32::new(0));
        cycle.pause();

        let runner = {
            let cycle = cycle.clone();
            let count = count.clone();
            tokio::spawn(async move {
                cycle
                    .run(|| {
                        let count = count.clone();
                        async move {
                            count.fetch_add(1, Ordering::SeqCst);
                        }
                    })
                    .await;
            })
        };

        cycle.trigger_wait().await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        cycle.close();
        runner.await.unwrap();
    }
}
