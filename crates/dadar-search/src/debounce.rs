//! Trailing-edge debounce on the tokio timer.

use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs only the most recently scheduled action, once input has been quiet
/// for `delay`.
///
/// Scheduling aborts the pending timer. Cancellation covers only the wait: an
/// action that has started runs to completion. Must be used inside a tokio
/// runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace any pending action with `action`, to run after the delay.
    pub fn schedule<F>(&mut self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        }));
    }

    /// Drop the pending action, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tokio::time::sleep;

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> Box<dyn FnOnce() + Send>) {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&fired);
        let make = move |text: &str| -> Box<dyn FnOnce() + Send> {
            let sink = Arc::clone(&sink);
            let text = text.to_string();
            Box::new(move || sink.lock().unwrap().push(text))
        };
        (fired, make)
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_schedules_coalesce_into_last() {
        let (fired, make) = recorder();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        for text in ["d", "da", "dad"] {
            debouncer.schedule(make(text));
            sleep(Duration::from_millis(100)).await;
        }
        assert!(fired.lock().unwrap().is_empty());

        sleep(Duration::from_millis(600)).await;
        assert_eq!(*fired.lock().unwrap(), ["dad"]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn action_waits_for_full_delay() {
        let (fired, make) = recorder();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        debouncer.schedule(make("x"));
        sleep(Duration::from_millis(499)).await;
        assert!(fired.lock().unwrap().is_empty());
        assert!(debouncer.is_pending());

        sleep(Duration::from_millis(2)).await;
        assert_eq!(*fired.lock().unwrap(), ["x"]);
    }

    #[tokio::test(start_paused = true)]
    async fn separated_inputs_each_fire() {
        let (fired, make) = recorder();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        debouncer.schedule(make("a"));
        sleep(Duration::from_millis(600)).await;
        debouncer.schedule(make("b"));
        sleep(Duration::from_millis(600)).await;
        assert_eq!(*fired.lock().unwrap(), ["a", "b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_and_drop_prevent_firing() {
        let (fired, make) = recorder();

        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        debouncer.schedule(make("cancelled"));
        debouncer.cancel();

        {
            let mut dropped = Debouncer::new(Duration::from_millis(500));
            dropped.schedule(make("dropped"));
        }

        sleep(Duration::from_secs(2)).await;
        assert!(fired.lock().unwrap().is_empty());
    }
}
