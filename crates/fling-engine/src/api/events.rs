//! Synchronous same-thread publish/subscribe channel.
//!
//! `emit` invokes every handler subscribed to the event's topic, in
//! subscription order, before returning. Each handler sees each emit at most
//! once. A handler that returns an error or panics is logged and skipped; the
//! remaining handlers still receive the event.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::api::types::{GameEvent, Topic};

/// Error returned by an event handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerError {
    pub message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event handler failed: {}", self.message)
    }
}

impl std::error::Error for HandlerError {}

pub type EventHandler = Box<dyn FnMut(&GameEvent) -> Result<(), HandlerError>>;

/// Returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

struct Subscription {
    id: SubscriptionId,
    topic: Topic,
    handler: EventHandler,
}

pub struct EventBus {
    subscriptions: Vec<Subscription>,
    next_id: u32,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
            next_id: 1,
        }
    }

    pub fn subscribe(
        &mut self,
        topic: Topic,
        handler: impl FnMut(&GameEvent) -> Result<(), HandlerError> + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            topic,
            handler: Box::new(handler),
        });
        id
    }

    /// Subscribe the same handler body to every topic.
    pub fn subscribe_all(
        &mut self,
        mut make_handler: impl FnMut() -> EventHandler,
    ) -> Vec<SubscriptionId> {
        Topic::ALL
            .iter()
            .map(|&topic| {
                let handler = make_handler();
                self.subscribe(topic, handler)
            })
            .collect()
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Deliver `event` to every handler on its topic. Returns how many handlers succeeded.
    pub fn emit(&mut self, event: &GameEvent) -> usize {
        let topic = event.topic();
        let mut delivered = 0;
        for sub in self.subscriptions.iter_mut().filter(|s| s.topic == topic) {
            let result = panic::catch_unwind(AssertUnwindSafe(|| (sub.handler)(event)));
            match result {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(err)) => log::warn!("{} handler {:?}: {}", topic, sub.id, err),
                Err(_) => log::warn!("{} handler {:?} panicked", topic, sub.id),
            }
        }
        delivered
    }

    pub fn handler_count(&self, topic: Topic) -> usize {
        self.subscriptions.iter().filter(|s| s.topic == topic).count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn delivers_only_to_matching_topic() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        bus.subscribe(Topic::TargetKilled, move |e| {
            sink.borrow_mut().push(*e);
            Ok(())
        });

        bus.emit(&GameEvent::LevelReset);
        bus.emit(&GameEvent::TargetKilled { target: EntityId(3) });

        assert_eq!(*seen.borrow(), vec![GameEvent::TargetKilled { target: EntityId(3) }]);
    }

    #[test]
    fn failing_handler_does_not_block_others() {
        let mut bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));
        bus.subscribe(Topic::LevelReset, |_| Err(HandlerError::new("boom")));
        bus.subscribe(Topic::LevelReset, |_| panic!("handler bug"));
        let c = count.clone();
        bus.subscribe(Topic::LevelReset, move |_| {
            *c.borrow_mut() += 1;
            Ok(())
        });

        let delivered = bus.emit(&GameEvent::LevelReset);
        assert_eq!(delivered, 1);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let id = bus.subscribe(Topic::AimStart, move |_| {
            *c.borrow_mut() += 1;
            Ok(())
        });
        bus.emit(&GameEvent::AimStart);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(&GameEvent::AimStart);
        assert_eq!(*count.borrow(), 1);
        assert_eq!(bus.handler_count(Topic::AimStart), 0);
    }

    #[test]
    fn subscribe_all_covers_every_topic() {
        let mut bus = EventBus::new();
        let ids = bus.subscribe_all(|| Box::new(|_| Ok(())));
        assert_eq!(ids.len(), Topic::ALL.len());
        assert_eq!(bus.emit(&GameEvent::ProjectileSettled), 1);
    }
}
