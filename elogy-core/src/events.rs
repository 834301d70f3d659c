//! A small publish/subscribe hub used for cross-view invalidation, e.g. an
//! editor announcing that a logbook's entries changed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    LogbookReloaded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    LogbookReloaded { logbook_id: u64 },
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::LogbookReloaded { .. } => Topic::LogbookReloaded,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Arc<dyn Fn(&Event) + Send + Sync>;

#[derive(Default)]
struct Registry {
    topics: HashMap<Topic, Vec<(SubscriptionId, Callback)>>,
}

#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
    next_id: Arc<AtomicU64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, topic: Topic, callback: impl Fn(&Event) + Send + Sync + 'static) -> Subscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut reg) = self.registry.lock() {
            reg.topics.entry(topic).or_default().push((id, Arc::new(callback)));
        }
        debug!(?topic, ?id, "subscribed");
        Subscription { id, registry: Arc::downgrade(&self.registry) }
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        remove(&self.registry, id)
    }

    /// Calls every subscriber of the event's topic; returns how many ran.
    pub fn publish(&self, event: &Event) -> usize {
        // snapshot so callbacks may (un)subscribe without deadlocking
        let callbacks: Vec<Callback> = match self.registry.lock() {
            Ok(reg) => reg.topics.get(&event.topic()).map(|subs| subs.iter().map(|(_, cb)| cb.clone()).collect()).unwrap_or_default(),
            Err(_) => Vec::new(),
        };
        debug!(?event, subscribers = callbacks.len(), "publish");
        for cb in &callbacks {
            cb(event);
        }
        callbacks.len()
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.registry.lock().map(|reg| reg.topics.get(&topic).map_or(0, Vec::len)).unwrap_or(0)
    }
}

fn remove(registry: &Mutex<Registry>, id: SubscriptionId) -> bool {
    let Ok(mut reg) = registry.lock() else { return false };
    let mut removed = false;
    for subs in reg.topics.values_mut() {
        let before = subs.len();
        subs.retain(|(sid, _)| *sid != id);
        removed |= subs.len() != before;
    }
    removed
}

/// Keeps a callback registered; dropping it unsubscribes.
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            remove(&registry, self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn publish_reaches_subscribers_of_topic() {
        let bus = EventBus::new();
        let (tx, rx) = mpsc::channel();
        let tx = Mutex::new(tx);
        let _sub = bus.subscribe(Topic::LogbookReloaded, move |e| {
            let _ = tx.lock().unwrap().send(e.clone());
        });
        assert_eq!(bus.publish(&Event::LogbookReloaded { logbook_id: 4 }), 1);
        assert_eq!(rx.try_recv().unwrap(), Event::LogbookReloaded { logbook_id: 4 });
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let bus = EventBus::new();
        let sub = bus.subscribe(Topic::LogbookReloaded, |_| {});
        assert_eq!(bus.subscriber_count(Topic::LogbookReloaded), 1);
        drop(sub);
        assert_eq!(bus.subscriber_count(Topic::LogbookReloaded), 0);
        assert_eq!(bus.publish(&Event::LogbookReloaded { logbook_id: 1 }), 0);
    }

    #[test]
    fn explicit_unsubscribe() {
        let bus = EventBus::new();
        let sub = bus.subscribe(Topic::LogbookReloaded, |_| {});
        assert!(bus.unsubscribe(sub.id()));
        assert!(!bus.unsubscribe(sub.id()));
    }

    #[test]
    fn callback_may_subscribe_during_publish() {
        let bus = EventBus::new();
        let inner = bus.clone();
        let kept = Arc::new(Mutex::new(Vec::new()));
        let kept2 = kept.clone();
        let _sub = bus.subscribe(Topic::LogbookReloaded, move |_| {
            kept2.lock().unwrap().push(inner.subscribe(Topic::LogbookReloaded, |_| {}));
        });
        assert_eq!(bus.publish(&Event::LogbookReloaded { logbook_id: 1 }), 1);
        assert_eq!(bus.subscriber_count(Topic::LogbookReloaded), 2);
    }
}
