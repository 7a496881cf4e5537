//! Delivery of operator interrupts to in-flight waits.

use std::sync::Arc;

use tokio::sync::watch;

use crate::trace_categories;

/// Hub through which operator interrupts (Ctrl-C) are delivered.
///
/// Every interrupt bumps a generation counter. A waiter only observes
/// interrupts raised after it subscribed, so a stray Ctrl-C between two
/// operations never cancels the next one.
#[derive(Clone)]
pub struct Interrupts {
    sender: Arc<watch::Sender<u64>>,
}

impl Default for Interrupts {
    fn default() -> Self {
        Self::new()
    }
}

impl Interrupts {
    /// Creates a hub that is only fed through [`Interrupts::raise`].
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Creates a hub fed by the process's Ctrl-C signal.
    ///
    /// Must be called from within a tokio runtime.
    pub fn from_ctrl_c() -> Self {
        let interrupts = Self::new();
        let forwarder = interrupts.clone();

        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!(target: trace_categories::EXECUTION, "received interrupt");
                forwarder.raise();
            }
        });

        interrupts
    }

    /// Raises an interrupt, waking every current waiter.
    pub fn raise(&self) {
        self.sender.send_modify(|generation| *generation += 1);
    }

    /// Returns a waiter that fires on the next interrupt raised from now on.
    pub fn subscribe(&self) -> InterruptWaiter {
        InterruptWaiter {
            receiver: self.sender.subscribe(),
        }
    }
}

/// Waits for a single interrupt from an [`Interrupts`] hub.
pub struct InterruptWaiter {
    receiver: watch::Receiver<u64>,
}

impl InterruptWaiter {
    /// Completes once an interrupt is raised. Never completes if the hub is gone.
    pub async fn wait(&mut self) {
        if self.receiver.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// Returns whether an interrupt was raised since this waiter was created
    /// and has not yet been observed through [`InterruptWaiter::wait`].
    pub fn has_fired(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn waiter_sees_later_interrupt() {
        let interrupts = Interrupts::new();
        let mut waiter = interrupts.subscribe();

        interrupts.raise();

        let fired = tokio::time::timeout(Duration::from_secs(5), waiter.wait()).await;
        assert!(fired.is_ok());
    }

    #[tokio::test]
    async fn waiter_ignores_earlier_interrupt() {
        let interrupts = Interrupts::new();
        interrupts.raise();

        let mut waiter = interrupts.subscribe();
        let fired = tokio::time::timeout(Duration::from_millis(50), waiter.wait()).await;
        assert!(fired.is_err());
    }

    #[test]
    fn has_fired_tracks_unobserved_interrupts() {
        let interrupts = Interrupts::new();
        let waiter = interrupts.subscribe();
        assert!(!waiter.has_fired());

        interrupts.raise();
        assert!(waiter.has_fired());
        assert!(!interrupts.subscribe().has_fired());
    }

    #[tokio::test]
    async fn every_waiter_is_woken() {
        let interrupts = Interrupts::new();
        let mut first = interrupts.subscribe();
        let mut second = interrupts.subscribe();

        interrupts.raise();

        let both = tokio::time::timeout(Duration::from_secs(5), async {
            first.wait().await;
            second.wait().await;
        })
        .await;
        assert!(both.is_ok());
    }
}
