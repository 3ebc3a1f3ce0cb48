//! Fan-out of formatted log lines to observers
//!
//! Every logger of a registry publishes the line it formats for each message
//! here, on its worker thread, before handing the message to its appenders.
//! Observers such as an in-app console subscribe with a callback or pull
//! lines from a channel.

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Callback receiving formatted lines
pub type Subscriber = Arc<dyn Fn(&str) + Send + Sync>;

/// Handle returned by [`Broadcaster::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

enum Target {
    Callback(Subscriber),
    Channel(Sender<String>),
}

impl Clone for Target {
    fn clone(&self) -> Self {
        match self {
            Target::Callback(callback) => Target::Callback(Arc::clone(callback)),
            Target::Channel(sender) => Target::Channel(sender.clone()),
        }
    }
}

/// Publish/subscribe channel for formatted log lines.
///
/// Subscribers are called synchronously on the publishing thread. The list is
/// snapshotted before each publish, so subscribing or unsubscribing while a
/// publish is running never disturbs it (the change applies from the next
/// publish on). A panicking subscriber is isolated: the remaining subscribers
/// still get the line and the publisher keeps running.
///
/// # Which broadcaster to subscribe to
///
/// There is no process-wide broadcaster. Each [`LogRegistry`] owns one,
/// shared by its global logger and every logger it creates; subscribe through
/// [`LogRegistry::broadcaster`] of the registry whose loggers you want to
/// see. [`LogRegistry::instance`] has its own broadcaster, distinct from that
/// of any registry built with `new()` or `builder()`. A standalone
/// [`AsyncLogger`] gets a private broadcaster unless one is passed to its
/// builder. To collect several registries on one console, build them with
/// the same `Arc<Broadcaster>` through
/// [`LogRegistryBuilder::broadcaster`](crate::core::LogRegistryBuilder::broadcaster).
///
/// [`LogRegistry`]: crate::core::LogRegistry
/// [`LogRegistry::broadcaster`]: crate::core::LogRegistry::broadcaster
/// [`LogRegistry::instance`]: crate::core::LogRegistry::instance
/// [`AsyncLogger`]: crate::core::AsyncLogger
pub struct Broadcaster {
    subscribers: RwLock<Vec<(SubscriptionId, Target)>>,
    next_id: AtomicU64,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn insert(&self, target: Target) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.write().push((id, target));
        id
    }

    /// Register a callback for every published line
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.insert(Target::Callback(Arc::new(callback)))
    }

    /// Register a channel receiving every published line.
    ///
    /// The subscription goes away by itself once the receiver is dropped.
    pub fn subscribe_channel(&self) -> (SubscriptionId, Receiver<String>) {
        let (sender, receiver) = unbounded();
        (self.insert(Target::Channel(sender)), receiver)
    }

    /// Remove a subscription; returns `false` if it was not registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Deliver `line` to every current subscriber.
    ///
    /// Returns the number of callbacks that panicked.
    pub fn publish(&self, line: &str) -> usize {
        let snapshot: Vec<(SubscriptionId, Target)> = self.subscribers.read().clone();
        if snapshot.is_empty() {
            return 0;
        }

        let mut failures = 0;
        let mut disconnected = Vec::new();

        for (id, target) in &snapshot {
            match target {
                Target::Callback(callback) => {
                    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                        callback(line)
                    }));
                    if let Err(panic_info) = result {
                        let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                            s.to_string()
                        } else if let Some(s) = panic_info.downcast_ref::<String>() {
                            s.clone()
                        } else {
                            "Unknown panic".to_string()
                        };
                        eprintln!(
                            "[LOGGER CRITICAL] Broadcast subscriber {:?} panicked: {}. \
                             Other subscribers continue to receive lines.",
                            id, panic_msg
                        );
                        failures += 1;
                    }
                }
                Target::Channel(sender) => {
                    if sender.send(line.to_string()).is_err() {
                        disconnected.push(*id);
                    }
                }
            }
        }

        if !disconnected.is_empty() {
            self.subscribers
                .write()
                .retain(|(id, _)| !disconnected.contains(id));
        }

        failures
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Broadcaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broadcaster")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_publish_reaches_all_subscribers() {
        let broadcaster = Broadcaster::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["a", "b"] {
            let seen = Arc::clone(&seen);
            broadcaster.subscribe(move |line| seen.lock().push(format!("{}:{}", tag, line)));
        }

        assert_eq!(broadcaster.publish("[I]A - 1"), 0);
        assert_eq!(*seen.lock(), vec!["a:[I]A - 1", "b:[I]A - 1"]);
    }

    #[test]
    fn test_publish_without_subscribers() {
        assert_eq!(Broadcaster::new().publish("nobody listens"), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let broadcaster = Broadcaster::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);
        let id = broadcaster.subscribe(move |_| {
            count_clone.fetch_add(1, Ordering::Relaxed);
        });

        broadcaster.publish("one");
        assert!(broadcaster.unsubscribe(id));
        assert!(!broadcaster.unsubscribe(id));
        broadcaster.publish("two");

        assert_eq!(count.load(Ordering::Relaxed), 1);
        assert_eq!(broadcaster.subscriber_count(), 0);
    }

    #[test]
    fn test_panicking_subscriber_is_isolated() {
        let broadcaster = Broadcaster::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = Arc::clone(&seen);

        broadcaster.subscribe(|_| panic!("console closed"));
        broadcaster.subscribe(move |_| {
            seen_clone.fetch_add(1, Ordering::Relaxed);
        });

        assert_eq!(broadcaster.publish("line"), 1);
        assert_eq!(seen.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_channel_subscription() {
        let broadcaster = Broadcaster::new();
        let (_id, receiver) = broadcaster.subscribe_channel();

        broadcaster.publish("first");
        broadcaster.publish("second");

        assert_eq!(receiver.try_recv().unwrap(), "first");
        assert_eq!(receiver.try_recv().unwrap(), "second");
    }

    #[test]
    fn test_dropped_channel_is_pruned() {
        let broadcaster = Broadcaster::new();
        let (_id, receiver) = broadcaster.subscribe_channel();
        drop(receiver);

        broadcaster.publish("gone");
        assert_eq!(broadcaster.subscriber_count(), 0);
    }

    #[test]
    fn test_subscribe_during_publish() {
        let broadcaster = Arc::new(Broadcaster::new());
        let inner = Arc::clone(&broadcaster);
        broadcaster.subscribe(move |_| {
            inner.subscribe(|_| {});
        });

        broadcaster.publish("grow");
        assert_eq!(broadcaster.subscriber_count(), 2);
    }
}
