use crate::collector::Collector;
use crate::events::{Event, EventType};
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, RwLock};

/// Registry state behind the hub's lock.
///
/// Collector identity is the stable [`Collector::name`]; `registered` keeps
/// registration order and `routes` keeps per-type subscription order, both
/// name-unique.
#[derive(Default)]
struct Registry {
    registered: Vec<Arc<dyn Collector>>,
    routes: HashMap<EventType, Vec<Arc<dyn Collector>>>,
    default_collector: Option<Arc<dyn Collector>>,
}

impl Registry {
    fn is_registered(&self, name: &str) -> bool {
        self.registered.iter().any(|c| c.name() == name)
    }
}

/// Routes recorded events to collectors by event type.
///
/// The hub holds the set of known collectors, an optional default collector,
/// and a routing table from event type to subscribed collectors. Recording
/// an event delivers it to every collector subscribed to the event's type,
/// then to the default collector unless it already received the event as a
/// subscriber — each collector sees a given event at most once per record.
///
/// All methods take `&self`; share a hub across threads by reference or in
/// an [`Arc`]. Registry mutation and event recording may race freely: a
/// record in flight sees either the pre- or post-mutation routing table,
/// never a torn one.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use analytics_hub::{AnalyticsHub, Event, EventType, LogCollector};
///
/// let hub = AnalyticsHub::new();
/// hub.set_default_collector(Arc::new(LogCollector::default()));
///
/// let mut event = Event::new("page_view", EventType::engagement());
/// event.increment_counter("views");
/// hub.record_event(&event);
/// ```
#[derive(Default)]
pub struct AnalyticsHub {
    registry: RwLock<Registry>,
}

impl AnalyticsHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a collector to the register without subscribing it to any event
    /// type. Idempotent: a collector whose name is already registered is
    /// left as-is.
    pub fn register_collector(&self, collector: Arc<dyn Collector>) {
        let mut registry = self.registry.write().unwrap();
        if !registry.is_registered(collector.name()) {
            registry.registered.push(collector);
        }
    }

    /// Removes a collector from the register and from every event type's
    /// subscriber list. Idempotent; does not touch the default collector.
    pub fn unregister_collector(&self, name: &str) {
        let mut registry = self.registry.write().unwrap();
        registry.registered.retain(|c| c.name() != name);
        for subscribers in registry.routes.values_mut() {
            subscribers.retain(|c| c.name() != name);
        }
    }

    /// Names of all registered collectors, in registration order.
    #[must_use]
    pub fn registered_collector_names(&self) -> Vec<String> {
        let registry = self.registry.read().unwrap();
        registry
            .registered
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Subscribes a collector to an event type, creating the type's
    /// subscriber list if this is its first collector. A collector already
    /// subscribed to the type is left as-is. The collector is registered as
    /// a side effect if it was not already.
    pub fn add_collector_to_event_type(
        &self,
        event_type: impl Into<EventType>,
        collector: Arc<dyn Collector>,
    ) {
        let mut registry = self.registry.write().unwrap();
        if !registry.is_registered(collector.name()) {
            registry.registered.push(Arc::clone(&collector));
        }
        let subscribers = registry.routes.entry(event_type.into()).or_default();
        if !subscribers.iter().any(|c| c.name() == collector.name()) {
            subscribers.push(collector);
        }
    }

    /// Unsubscribes a collector from one event type, leaving its other
    /// subscriptions and its registration alone. Logs a warning when the
    /// event type has no subscriber list at all; removing a collector that
    /// is not subscribed is a no-op.
    pub fn remove_collector_from_event_type(&self, event_type: impl Into<EventType>, name: &str) {
        let event_type = event_type.into();
        let mut registry = self.registry.write().unwrap();
        match registry.routes.get_mut(&event_type) {
            Some(subscribers) => subscribers.retain(|c| c.name() != name),
            None => log::warn!(
                "trying to remove collector '{name}' from event type '{event_type}' without any collectors subscribed"
            ),
        }
    }

    /// Subscribes an already-registered collector, looked up by name, to an
    /// event type. Logs a warning when no such collector is registered.
    pub fn add_registered_collector_to_event_type(
        &self,
        event_type: impl Into<EventType>,
        name: &str,
    ) {
        let event_type = event_type.into();
        let collector = {
            let registry = self.registry.read().unwrap();
            registry
                .registered
                .iter()
                .find(|c| c.name() == name)
                .map(Arc::clone)
        };
        match collector {
            Some(collector) => self.add_collector_to_event_type(event_type, collector),
            None => log::warn!(
                "attempting to add collector '{name}' to event type '{event_type}' but no such collector has been registered"
            ),
        }
    }

    /// Unsubscribes an already-registered collector, looked up by name, from
    /// an event type. Logs a warning when no such collector is registered.
    pub fn remove_registered_collector_from_event_type(
        &self,
        event_type: impl Into<EventType>,
        name: &str,
    ) {
        let event_type = event_type.into();
        let registered = {
            let registry = self.registry.read().unwrap();
            registry.is_registered(name)
        };
        if registered {
            self.remove_collector_from_event_type(event_type, name);
        } else {
            log::warn!(
                "attempting to remove collector '{name}' from event type '{event_type}' but no such collector has been registered"
            );
        }
    }

    /// Snapshot of the collectors subscribed to an event type, in
    /// subscription order; empty when the type has never been subscribed to.
    #[must_use]
    pub fn collectors_for_event_type(
        &self,
        event_type: impl Into<EventType>,
    ) -> Vec<Arc<dyn Collector>> {
        let registry = self.registry.read().unwrap();
        registry
            .routes
            .get(&event_type.into())
            .cloned()
            .unwrap_or_default()
    }

    /// The collector that receives every event regardless of type, if one is
    /// set.
    #[must_use]
    pub fn default_collector(&self) -> Option<Arc<dyn Collector>> {
        self.registry.read().unwrap().default_collector.clone()
    }

    /// Sets the default collector. Replacing the default does not touch any
    /// type-specific subscriptions the previous default holds.
    pub fn set_default_collector(&self, collector: Arc<dyn Collector>) {
        self.registry.write().unwrap().default_collector = Some(collector);
    }

    /// Clears the default collector; subsequent records deliver only to
    /// type subscribers.
    pub fn clear_default_collector(&self) {
        self.registry.write().unwrap().default_collector = None;
    }

    /// Delivers an event to every collector subscribed to its type, in
    /// subscription order, then to the default collector unless the default
    /// already received it as a subscriber.
    ///
    /// Dispatch is synchronous: this returns once every resolved collector
    /// has been invoked. A collector that returns an error or panics is
    /// logged and skipped; the remaining collectors still receive the event
    /// and the producer never sees a failure. Collectors are invoked outside
    /// the registry lock, so a sink may itself mutate the hub.
    pub fn record_event(&self, event: &Event) {
        let (subscribers, default_collector) = {
            let registry = self.registry.read().unwrap();
            let subscribers = registry
                .routes
                .get(event.event_type())
                .cloned()
                .unwrap_or_default();
            (subscribers, registry.default_collector.clone())
        };

        let mut recorded_in_default = false;
        for collector in &subscribers {
            if let Some(default) = &default_collector
                && collector.name() == default.name()
            {
                recorded_in_default = true;
            }
            Self::dispatch(collector.as_ref(), event);
        }
        if !recorded_in_default
            && let Some(default) = &default_collector
        {
            Self::dispatch(default.as_ref(), event);
        }
    }

    fn dispatch(collector: &dyn Collector, event: &Event) {
        match catch_unwind(AssertUnwindSafe(|| collector.record_event(event))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                log::error!(
                    "collector '{}' failed to record event '{}': {e}",
                    collector.name(),
                    event.name()
                );
            }
            Err(_) => {
                log::error!(
                    "collector '{}' panicked while recording event '{}'",
                    collector.name(),
                    event.name()
                );
            }
        }
    }
}
