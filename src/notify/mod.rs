//! Cross-table refresh notification.
//!
//! A zero-payload broadcast: any holder of a [`TableUpdateNotifier`] may
//! trigger it, and every live [`TableUpdateSubscription`] observes it at
//! least once. Subscribers are not ordered relative to each other.

use log::debug;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

const CHANNEL_CAPACITY: usize = 16;

#[derive(Clone)]
pub struct TableUpdateNotifier {
    sender: broadcast::Sender<()>,
}

impl Default for TableUpdateNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl TableUpdateNotifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Ask every subscribed table to re-fetch.
    pub fn trigger(&self) {
        // An error only means nobody is listening.
        let delivered = self.sender.send(()).unwrap_or(0);
        debug!("Table update triggered for {} subscriber(s)", delivered);
    }

    pub fn subscribe(&self) -> TableUpdateSubscription {
        TableUpdateSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// A registered listener. Dropping it unsubscribes.
pub struct TableUpdateSubscription {
    receiver: broadcast::Receiver<()>,
}

impl TableUpdateSubscription {
    /// Wait for the next notification. Returns `false` once every notifier
    /// has been dropped.
    pub async fn notified(&mut self) -> bool {
        match self.receiver.recv().await {
            Ok(()) => true,
            // Missed notifications collapse into one.
            Err(RecvError::Lagged(skipped)) => {
                debug!("Table update listener lagged by {}", skipped);
                true
            }
            Err(RecvError::Closed) => false,
        }
    }

    /// Drain pending notifications without waiting. Returns how many were
    /// pending, counting ones dropped while lagging.
    pub fn take_pending(&mut self) -> usize {
        let mut pending = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(()) => pending += 1,
                Err(TryRecvError::Lagged(skipped)) => pending += skipped as usize,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return pending,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_subscriber_is_notified() {
        let notifier = TableUpdateNotifier::new();
        let mut installed = notifier.subscribe();
        let mut marketplace = notifier.subscribe();

        notifier.trigger();

        assert!(installed.notified().await);
        assert!(marketplace.notified().await);
    }

    #[tokio::test]
    async fn test_trigger_without_subscribers_is_harmless() {
        let notifier = TableUpdateNotifier::new();
        notifier.trigger();
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn test_dropping_subscription_unsubscribes() {
        let notifier = TableUpdateNotifier::new();
        let subscription = notifier.subscribe();
        assert_eq!(notifier.subscriber_count(), 1);

        drop(subscription);
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn test_take_pending_drains() {
        let notifier = TableUpdateNotifier::new();
        let mut subscription = notifier.subscribe();

        assert_eq!(subscription.take_pending(), 0);

        notifier.trigger();
        notifier.trigger();
        assert_eq!(subscription.take_pending(), 2);
        assert_eq!(subscription.take_pending(), 0);
    }

    #[test]
    fn test_lagged_subscriber_still_sees_notification() {
        let notifier = TableUpdateNotifier::new();
        let mut subscription = notifier.subscribe();

        for _ in 0..(CHANNEL_CAPACITY * 2) {
            notifier.trigger();
        }

        assert_eq!(subscription.take_pending(), CHANNEL_CAPACITY * 2);
    }

    #[tokio::test]
    async fn test_closed_when_notifiers_dropped() {
        let notifier = TableUpdateNotifier::new();
        let mut subscription = notifier.subscribe();
        drop(notifier);

        assert!(!subscription.notified().await);
    }
}
