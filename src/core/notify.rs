//! Store-changed notifications.
//!
//! Listeners subscribe and receive a zero-payload [`StoreChanged`] after every
//! committed mutation. Receivers that were dropped without unsubscribing are
//! pruned on the next broadcast.

use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};

/// Signal that the session store's contents may have changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreChanged;

/// Handle identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A live subscription.
#[derive(Debug)]
pub struct Subscription {
    /// Pass to [`ChangeNotifier::unsubscribe`] to stop receiving.
    pub id: SubscriptionId,

    /// Receives one [`StoreChanged`] per committed mutation.
    pub receiver: Receiver<StoreChanged>,
}

impl Subscription {
    /// Drain pending signals, returning how many arrived.
    #[must_use]
    pub fn drain(&self) -> usize {
        self.receiver.try_iter().count()
    }
}

#[derive(Debug, Default)]
struct Subscribers {
    next_id: u64,
    senders: Vec<(SubscriptionId, Sender<StoreChanged>)>,
}

/// Fan-out of store-changed signals.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    inner: Mutex<Subscribers>,
}

impl ChangeNotifier {
    /// Create a notifier with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new listener.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();
        let mut subs = self.lock();
        let id = SubscriptionId(subs.next_id);
        subs.next_id += 1;
        subs.senders.push((id, tx));
        Subscription { id, receiver: rx }
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.lock();
        let before = subs.senders.len();
        subs.senders.retain(|(sid, _)| *sid != id);
        subs.senders.len() != before
    }

    /// Send one signal to every live listener.
    pub fn broadcast(&self) {
        let mut subs = self.lock();
        subs.senders.retain(|(_, tx)| tx.send(StoreChanged).is_ok());
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock().senders.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Subscribers> {
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_reaches_every_subscriber() {
        let notifier = ChangeNotifier::new();
        let a = notifier.subscribe();
        let b = notifier.subscribe();

        notifier.broadcast();
        notifier.broadcast();

        assert_eq!(a.drain(), 2);
        assert_eq!(b.drain(), 2);
    }

    #[test]
    fn no_subscribers_is_fine() {
        let notifier = ChangeNotifier::new();
        notifier.broadcast();
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let notifier = ChangeNotifier::new();
        let a = notifier.subscribe();
        let b = notifier.subscribe();

        assert!(notifier.unsubscribe(a.id));
        assert!(!notifier.unsubscribe(a.id));

        notifier.broadcast();
        assert_eq!(a.drain(), 0);
        assert_eq!(b.drain(), 1);
    }

    #[test]
    fn dropped_receivers_are_pruned() {
        let notifier = ChangeNotifier::new();
        let kept = notifier.subscribe();
        drop(notifier.subscribe());
        assert_eq!(notifier.subscriber_count(), 2);

        notifier.broadcast();
        assert_eq!(notifier.subscriber_count(), 1);
        assert_eq!(kept.drain(), 1);
    }

    #[test]
    fn ids_are_not_reused() {
        let notifier = ChangeNotifier::new();
        let a = notifier.subscribe();
        notifier.unsubscribe(a.id);
        let b = notifier.subscribe();
        assert_ne!(a.id, b.id);
    }
}
