//! Trailing-edge debounce primitive.
//!
//! A `Debouncer` holds a timer and a single pending-call slot: of all the
//! calls made within one quiet window, only the last fires, with the
//! latest arguments. Intended for presentation-side use (search boxes,
//! resize handlers); the coordinator's own intent coalescing is a
//! leading-edge window, since optimistic voting must fire immediately.

use std::time::Duration;

use tokio::sync::mpsc;

/// Debounces calls to a callback.
///
/// Dropping the debouncer tears down its timer task; a call still
/// pending inside the window is discarded, not flushed.
pub struct Debouncer<T: Send + 'static> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Creates a debouncer invoking `callback` once per quiet window.
    pub fn new<F>(window: Duration, mut callback: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();
        tokio::spawn(async move {
            while let Some(mut latest) = rx.recv().await {
                loop {
                    match tokio::time::timeout(window, rx.recv()).await {
                        // A newer call inside the window supersedes the
                        // pending one and restarts the timer.
                        Ok(Some(next)) => latest = next,
                        // Sender dropped mid-window: discard the pending call.
                        Ok(None) => return,
                        // Window elapsed with no newer call: fire.
                        Err(_) => {
                            callback(latest);
                            break;
                        }
                    }
                }
            }
        });
        Self { tx }
    }

    /// Schedules a call with the given arguments, superseding any call
    /// still pending inside the window.
    pub fn call(&self, args: T) {
        // Send fails only when the task is gone, which means the
        // debouncer is being torn down; the call is dropped by design
        // of the teardown path.
        let _ = self.tx.send(args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording_debouncer(window: Duration) -> (Debouncer<u32>, Arc<Mutex<Vec<u32>>>) {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = fired.clone();
        let debouncer = Debouncer::new(window, move |value| {
            sink.lock().unwrap().push(value);
        });
        (debouncer, fired)
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_call_in_window_fires() {
        let (debouncer, fired) = recording_debouncer(Duration::from_millis(300));

        debouncer.call(1);
        debouncer.call(2);
        debouncer.call(3);
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(*fired.lock().unwrap(), vec![3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_calls_each_fire() {
        let (debouncer, fired) = recording_debouncer(Duration::from_millis(300));

        debouncer.call(1);
        tokio::time::sleep(Duration::from_millis(400)).await;
        debouncer.call(2);
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(*fired.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_inside_window_restarts_timer() {
        let (debouncer, fired) = recording_debouncer(Duration::from_millis(300));

        debouncer.call(1);
        tokio::time::sleep(Duration::from_millis(200)).await;
        debouncer.call(2);
        tokio::time::sleep(Duration::from_millis(200)).await;
        // 400ms elapsed in total but the second call restarted the timer.
        assert!(fired.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(*fired.lock().unwrap(), vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_discards_pending_call() {
        let (debouncer, fired) = recording_debouncer(Duration::from_millis(300));

        debouncer.call(1);
        drop(debouncer);
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert!(fired.lock().unwrap().is_empty());
    }
}
