//! Cancelable delayed delivery.
//!
//! Each call to [`Debouncer::schedule`] aborts whatever is still pending and
//! starts a fresh quiet window. Only work scheduled after the last reset,
//! and left alone for the whole window, reaches the channel.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

pub struct Debouncer<T> {
    window: Duration,
    tx: mpsc::Sender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    #[must_use]
    pub fn new(window: Duration, tx: mpsc::Sender<T>) -> Self {
        Self {
            window,
            tx,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Deliver `value` once the window passes without another call.
    pub fn push(&mut self, value: T) {
        self.schedule(async move { value });
    }

    /// Run `work` once the window passes without another call and deliver
    /// its output. Work still running when the debouncer is reset is
    /// dropped along with the timer.
    pub fn schedule<F>(&mut self, work: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        self.cancel();
        let deadline = Instant::now() + self.window;
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            sleep_until(deadline).await;
            let value = work.await;
            // receiver gone means the session is shutting down
            let _ = tx.send(value).await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
