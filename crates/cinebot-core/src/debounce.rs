//! Trailing-edge debouncer
//!
//! A [`Debouncer`] owns a background task that watches the latest pushed
//! value and emits it once it has been stable for the configured delay.
//! Bursts collapse into one trailing emission; nothing is emitted on the
//! leading edge. Dropping the debouncer aborts the task, so a pending
//! emission never outlives its owner.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Debounces a stream of values of type `T`
pub struct Debouncer<T> {
    input: watch::Sender<Option<T>>,
    settled: mpsc::UnboundedReceiver<T>,
    task: JoinHandle<()>,
    delay: Duration,
}

impl<T> Debouncer<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Spawn the debounce task on the current tokio runtime.
    pub fn new(delay: Duration) -> Self {
        let (input, rx) = watch::channel(None);
        let (tx, settled) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(rx, tx, delay));

        Self {
            input,
            settled,
            task,
            delay,
        }
    }

    /// Record a new input value, restarting the quiet window.
    pub fn push(&self, value: T) {
        self.input.send_replace(Some(value));
    }

    /// Wait for the next settled value.
    ///
    /// Returns `None` only if the task has stopped.
    pub async fn settled(&mut self) -> Option<T> {
        self.settled.recv().await
    }

    /// Configured quiet window
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<T>(mut rx: watch::Receiver<Option<T>>, tx: mpsc::UnboundedSender<T>, delay: Duration)
where
    T: Clone + Send + Sync + 'static,
{
    while rx.changed().await.is_ok() {
        // Restart the window on every change until it elapses quietly.
        loop {
            tokio::select! {
                _ = sleep(delay) => break,
                changed = rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
        }

        let Some(value) = rx.borrow_and_update().clone() else {
            continue;
        };

        if tx.send(value).is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn test_emits_after_quiet_window() {
        let mut debouncer = Debouncer::new(DELAY);
        let start = tokio::time::Instant::now();

        debouncer.push("bat".to_string());
        assert_eq!(debouncer.settled().await.as_deref(), Some("bat"));
        assert!(start.elapsed() >= DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last_value() {
        let mut debouncer = Debouncer::new(DELAY);

        for text in ["b", "ba", "bat", "batm", "batma", "batman"] {
            debouncer.push(text.to_string());
            sleep(Duration::from_millis(100)).await;
        }

        assert_eq!(debouncer.settled().await.as_deref(), Some("batman"));

        // Nothing else is queued behind the trailing emission.
        let next = tokio::time::timeout(Duration::from_secs(5), debouncer.settled()).await;
        assert!(next.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_leading_edge_emission() {
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.push(1u32);

        let early = tokio::time::timeout(Duration::from_millis(400), debouncer.settled()).await;
        assert!(early.is_err());
        assert_eq!(debouncer.settled().await, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_emit_separately() {
        let mut debouncer = Debouncer::new(DELAY);

        debouncer.push("bat".to_string());
        assert_eq!(debouncer.settled().await.as_deref(), Some("bat"));

        debouncer.push("batm".to_string());
        sleep(Duration::from_millis(100)).await;
        debouncer.push("batman".to_string());
        assert_eq!(debouncer.settled().await.as_deref(), Some("batman"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_emission() {
        let debouncer = Debouncer::new(DELAY);
        debouncer.push(7u32);

        let handle = debouncer.task.abort_handle();
        drop(debouncer);
        sleep(DELAY * 2).await;

        assert!(handle.is_finished());
    }
}
