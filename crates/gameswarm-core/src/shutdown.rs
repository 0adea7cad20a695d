//! One-shot shutdown bridge between a process-level interrupt and the
//! orchestrator's cleanup path.
//!
//! [`ShutdownController`] turns an asynchronous interrupt (operator
//! Ctrl+C, or the background run signalling its own completion) into a
//! single notification the foreground supervisor can await. `trigger`
//! is idempotent: the first call fires the notification, every later
//! call is a no-op, so a second interrupt arriving while cleanup is
//! already running never re-enters it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Idempotent one-shot shutdown notification.
#[derive(Debug, Default)]
pub struct ShutdownController {
    fired: AtomicBool,
    notify: Notify,
}

impl ShutdownController {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fire the shutdown notification.
    ///
    /// Returns `true` only for the call that actually fired it.
    pub fn trigger(&self) -> bool {
        let first = self
            .fired
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if first {
            self.notify.notify_waiters();
        }
        first
    }

    /// Wait until the notification fires. Resolves immediately when it
    /// already has.
    pub async fn triggered(&self) {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        // Register the waiter first, then re-check the flag: a trigger
        // landing in between is observed by the flag, one landing after
        // is observed by the registered waiter.
        notified.as_mut().enable();
        if self.fired.load(Ordering::SeqCst) {
            return;
        }
        notified.await;
    }

    pub fn is_triggered(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_is_one_shot() {
        let controller = ShutdownController::new();
        assert!(controller.trigger());
        assert!(!controller.trigger());
        assert!(!controller.trigger());
        assert!(controller.is_triggered());
    }

    #[tokio::test]
    async fn test_triggered_resolves_after_trigger() {
        let controller = ShutdownController::new();
        let waiter = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.triggered().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        controller.trigger();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should resolve")
            .expect("join");
    }

    #[tokio::test]
    async fn test_triggered_resolves_immediately_when_already_fired() {
        let controller = ShutdownController::new();
        controller.trigger();
        tokio::time::timeout(Duration::from_millis(100), controller.triggered())
            .await
            .expect("already-fired wait must not block");
    }
}
