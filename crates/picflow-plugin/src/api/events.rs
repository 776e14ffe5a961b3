//! Event subscription API for callers and plugins.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::trace;

use picflow_core::events::PicEvent;

/// Identifies one subscription so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback listener.
pub type Listener = Arc<dyn Fn(&PicEvent) + Send + Sync>;

enum Sink {
    Callback(Listener),
    Channel(mpsc::UnboundedSender<PicEvent>),
}

struct Subscription {
    id: SubscriptionId,
    sink: Sink,
}

/// Delivers every emitted event to each subscriber exactly once, in
/// subscription order, at the point the event is raised.
#[derive(Default)]
pub struct EventBus {
    /// Active subscriptions in subscription order.
    subscriptions: Vec<Subscription>,
    /// Next subscription id.
    next_id: u64,
}

impl EventBus {
    /// Creates an event bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes a callback.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&PicEvent) + Send + Sync + 'static,
    {
        self.push(Sink::Callback(Arc::new(listener)))
    }

    /// Subscribes a channel receiving a copy of every event.
    pub fn subscribe_channel(&mut self) -> (SubscriptionId, mpsc::UnboundedReceiver<PicEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.push(Sink::Channel(tx));
        (id, rx)
    }

    /// Removes a subscription. Returns whether it existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Delivers an event to every subscriber.
    pub fn emit(&self, event: &PicEvent) {
        trace!(event = event.name(), subscribers = self.subscriptions.len(), "Emitting event");
        for subscription in &self.subscriptions {
            match &subscription.sink {
                Sink::Callback(listener) => listener(event),
                Sink::Channel(tx) => {
                    // A dropped receiver is pruned on the next subscribe.
                    let _ = tx.send(event.clone());
                }
            }
        }
    }

    /// Returns the number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions
            .iter()
            .filter(|s| match &s.sink {
                Sink::Callback(_) => true,
                Sink::Channel(tx) => !tx.is_closed(),
            })
            .count()
    }

    fn push(&mut self, sink: Sink) -> SubscriptionId {
        self.subscriptions.retain(|s| match &s.sink {
            Sink::Callback(_) => true,
            Sink::Channel(tx) => !tx.is_closed(),
        });
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, sink });
        id
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriptions.len())
            .finish()
    }
}
