//! # Debouncer
//! Generic trailing-edge debounce: rapid calls within a quiet interval
//! collapse into a single invocation carrying the latest value.
//!
//! Reusable over any async action; nothing here knows about search boxes
//! or sliders. Note the two-tier discipline at call sites: cosmetic state
//! is applied synchronously by the caller, only the expensive
//! network-triggering work goes through the debouncer.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

type Action<T> = Arc<dyn Fn(T) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Wraps an async action so that repeated [`Debouncer::call`]s within
/// `quiet` collapse into one trailing invocation.
pub struct Debouncer<T> {
    quiet: Duration,
    action: Action<T>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F, Fut>(quiet: Duration, action: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            quiet,
            action: Arc::new(move |value| Box::pin(action(value))),
            pending: Mutex::new(None),
        }
    }

    /// Schedule the action with `value`. Any invocation still waiting out
    /// the quiet period is cancelled and the timer restarts, so the action
    /// runs exactly once, `quiet` after the last call, with the latest
    /// value. Must be called from within a tokio runtime.
    pub fn call(&self, value: T) {
        let mut pending = self.pending.lock().expect("debounce mutex poisoned");
        if let Some(handle) = pending.take() {
            handle.abort();
        }
        let action = Arc::clone(&self.action);
        let quiet = self.quiet;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            action(value).await;
        }));
    }

    /// Drop any pending invocation without running it.
    pub fn cancel(&self) {
        if let Some(handle) = self
            .pending
            .lock()
            .expect("debounce mutex poisoned")
            .take()
        {
            handle.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    // The timer task must not outlive its owner.
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(handle) = pending.take() {
                handle.abort();
            }
        }
    }
}
