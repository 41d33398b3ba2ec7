use crate::error::AnalyticsError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The type of an event, used as the routing key by the hub.
///
/// Event types form an open set: any caller can mint a new type from a
/// string without touching this crate. A few well-known types are provided
/// as constructors.
///
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventType(String);

impl EventType {
    /// User engagement events (clicks, views, session activity).
    #[must_use]
    pub fn engagement() -> Self {
        Self("ENGAGEMENT".into())
    }

    /// Operational events (latency, availability, resource usage).
    #[must_use]
    pub fn operational() -> Self {
        Self("OPERATIONAL".into())
    }

    /// Fallback type for events recorded without a meaningful type.
    #[must_use]
    pub fn unknown() -> Self {
        Self("UNKNOWN".into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventType {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EventType {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How time-sensitive an event is.
///
/// Carried through dispatch untouched; it is up to individual collectors to
/// honour it (e.g. batch `Normal` events but transmit `High` immediately and
/// reserve storage for `Critical`).
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    #[default]
    Normal,
    High,
    Critical,
}

/// A custom metric value attached to an event.
///
/// Opaque to the hub; collectors decide how to interpret it.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<bool> for MetricValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A named, mutable bundle of telemetry data.
///
/// Identity fields (`name`, `source`, `event_type`, `priority`) are fixed at
/// construction; the four keyed stores (`data`, `counters`, `timers`,
/// `metrics`) are accumulated by producer code until the event is submitted
/// to the hub. Keys are unique within each store and writing an existing key
/// overwrites it; removing an absent key is a no-op, never an error.
///
/// Timer values are elapsed milliseconds.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    name: String,
    source: String,
    #[serde(rename = "type")]
    event_type: EventType,
    priority: Priority,
    data: BTreeMap<String, String>,
    counters: BTreeMap<String, f64>,
    timers: BTreeMap<String, f64>,
    metrics: BTreeMap<String, MetricValue>,
}

impl Event {
    /// Creates an event with the default source (`"unknown"`) and `Normal`
    /// priority.
    #[must_use]
    pub fn new(name: &str, event_type: impl Into<EventType>) -> Self {
        Self {
            name: name.to_string(),
            source: "unknown".into(),
            event_type: event_type.into(),
            priority: Priority::default(),
            data: BTreeMap::new(),
            counters: BTreeMap::new(),
            timers: BTreeMap::new(),
            metrics: BTreeMap::new(),
        }
    }

    /// Sets the originating component of this event.
    #[must_use]
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    /// Sets the priority of this event.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub const fn event_type(&self) -> &EventType {
        &self.event_type
    }

    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    #[must_use]
    pub const fn data(&self) -> &BTreeMap<String, String> {
        &self.data
    }

    #[must_use]
    pub const fn counters(&self) -> &BTreeMap<String, f64> {
        &self.counters
    }

    #[must_use]
    pub const fn timers(&self) -> &BTreeMap<String, f64> {
        &self.timers
    }

    #[must_use]
    pub const fn metrics(&self) -> &BTreeMap<String, MetricValue> {
        &self.metrics
    }

    /// Adds a key/value pair to the event, replacing any existing value for
    /// the key.
    pub fn add_data(&mut self, key: &str, value: &str) -> &mut Self {
        self.data.insert(key.to_string(), value.to_string());
        self
    }

    /// Removes a key/value pair; no-op if the key is absent.
    pub fn remove_data(&mut self, key: &str) -> &mut Self {
        self.data.remove(key);
        self
    }

    /// Sets a counter to `count`, replacing any existing value.
    pub fn add_counter(&mut self, key: &str, count: f64) -> &mut Self {
        self.counters.insert(key.to_string(), count);
        self
    }

    /// Increments a counter by 1, creating it at zero first if absent.
    pub fn increment_counter(&mut self, key: &str) -> &mut Self {
        self.increment_counter_by(key, 1.0)
    }

    /// Increments a counter by `delta`, creating it at zero first if absent.
    pub fn increment_counter_by(&mut self, key: &str, delta: f64) -> &mut Self {
        *self.counters.entry(key.to_string()).or_insert(0.0) += delta;
        self
    }

    /// Removes a counter; no-op if the key is absent.
    pub fn remove_counter(&mut self, key: &str) -> &mut Self {
        self.counters.remove(key);
        self
    }

    /// Sets a timer to `elapsed_ms` milliseconds, replacing any existing
    /// value.
    pub fn add_timer(&mut self, key: &str, elapsed_ms: f64) -> &mut Self {
        self.timers.insert(key.to_string(), elapsed_ms);
        self
    }

    /// Adds `delta_ms` milliseconds to a timer, creating it at zero first if
    /// absent.
    pub fn increment_timer(&mut self, key: &str, delta_ms: f64) -> &mut Self {
        *self.timers.entry(key.to_string()).or_insert(0.0) += delta_ms;
        self
    }

    /// Removes a timer; no-op if the key is absent.
    pub fn remove_timer(&mut self, key: &str) -> &mut Self {
        self.timers.remove(key);
        self
    }

    /// Attaches a custom metric, replacing any existing value for the key.
    pub fn add_metric(&mut self, key: &str, value: impl Into<MetricValue>) -> &mut Self {
        self.metrics.insert(key.to_string(), value.into());
        self
    }

    /// Removes a custom metric; no-op if the key is absent.
    pub fn remove_metric(&mut self, key: &str) -> &mut Self {
        self.metrics.remove(key);
        self
    }
}

impl TryFrom<&Vec<u8>> for Event {
    type Error = AnalyticsError;

    fn try_from(buffer: &Vec<u8>) -> Result<Self, Self::Error> {
        rmp_serde::from_slice(buffer).map_err(AnalyticsError::from)
    }
}

impl TryFrom<Event> for Vec<u8> {
    type Error = AnalyticsError;

    fn try_from(event: Event) -> Result<Self, Self::Error> {
        rmp_serde::to_vec(&event).map_err(AnalyticsError::from)
    }
}

/// Stamps out events that share a source and, optionally, a type and
/// priority.
///
/// Convenient for a component that records many events: configure the
/// factory once, then create events by name.
///
#[derive(Debug, Clone)]
pub struct EventFactory {
    source: String,
    event_type: Option<EventType>,
    priority: Option<Priority>,
}

impl EventFactory {
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            event_type: None,
            priority: None,
        }
    }

    /// Sets the type stamped on events created without an explicit type.
    #[must_use]
    pub fn with_event_type(mut self, event_type: impl Into<EventType>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    /// Sets the priority stamped on created events.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Creates an event carrying the factory's source, type, and priority.
    ///
    /// Falls back to [`EventType::unknown`] when the factory has no
    /// configured type.
    #[must_use]
    pub fn create_event(&self, name: &str) -> Event {
        let event_type = self.event_type.clone().unwrap_or_else(EventType::unknown);
        self.create_event_of_type(name, event_type)
    }

    /// Creates an event of an explicit type, overriding the factory's type.
    #[must_use]
    pub fn create_event_of_type(&self, name: &str, event_type: impl Into<EventType>) -> Event {
        let event = Event::new(name, event_type).with_source(&self.source);
        match self.priority {
            Some(priority) => event.with_priority(priority),
            None => event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_upserts_and_removes() {
        let mut event = Event::new("page_view", EventType::engagement());
        event.add_data("page", "home").add_data("page", "checkout");
        assert_eq!(event.data().get("page").map(String::as_str), Some("checkout"));

        event.remove_data("page");
        assert!(!event.data().contains_key("page"));
        // removing again is a no-op
        event.remove_data("page");
        assert!(event.data().is_empty());
    }

    #[test]
    fn increment_creates_counter_from_zero() {
        let mut event = Event::new("clicks", EventType::engagement());
        event.increment_counter("taps");
        assert_eq!(event.counters().get("taps"), Some(&1.0));

        event.increment_counter_by("taps", 4.0);
        assert_eq!(event.counters().get("taps"), Some(&5.0));
    }

    #[test]
    fn add_counter_resets_existing_value() {
        let mut event = Event::new("clicks", EventType::engagement());
        event.increment_counter_by("taps", 7.0);
        event.add_counter("taps", 2.0);
        assert_eq!(event.counters().get("taps"), Some(&2.0));
    }

    #[test]
    fn timers_accumulate_on_increment() {
        let mut event = Event::new("load", EventType::operational());
        event.increment_timer("render", 12.5);
        event.increment_timer("render", 7.5);
        assert_eq!(event.timers().get("render"), Some(&20.0));

        event.add_timer("render", 3.0);
        assert_eq!(event.timers().get("render"), Some(&3.0));

        event.remove_timer("render");
        event.remove_timer("render");
        assert!(event.timers().is_empty());
    }

    #[test]
    fn metric_values_convert_from_primitives() {
        let mut event = Event::new("session", EventType::engagement());
        event
            .add_metric("logged_in", true)
            .add_metric("build", "1.4.2")
            .add_metric("battery", 0.83);
        assert_eq!(event.metrics().get("logged_in"), Some(&MetricValue::Bool(true)));
        assert_eq!(
            event.metrics().get("build"),
            Some(&MetricValue::Text("1.4.2".into()))
        );
        assert_eq!(event.metrics().get("battery"), Some(&MetricValue::Number(0.83)));

        event.remove_metric("battery");
        assert!(!event.metrics().contains_key("battery"));
    }

    #[test]
    fn identity_fields_default_sensibly() {
        let event = Event::new("boot", "STARTUP");
        assert_eq!(event.name(), "boot");
        assert_eq!(event.source(), "unknown");
        assert_eq!(event.event_type(), &EventType::from("STARTUP"));
        assert_eq!(event.priority(), Priority::Normal);
    }

    #[test]
    fn event_survives_byte_conversion() {
        let mut event = Event::new("crash", EventType::operational())
            .with_source("reporter")
            .with_priority(Priority::Critical);
        event
            .add_data("thread", "main")
            .increment_counter("crashes")
            .add_timer("uptime", 1500.0)
            .add_metric("fatal", true);

        let bytes: Vec<u8> = event.clone().try_into().unwrap();
        let decoded = Event::try_from(&bytes).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn factory_stamps_source_type_and_priority() {
        let factory = EventFactory::new("checkout")
            .with_event_type(EventType::engagement())
            .with_priority(Priority::High);

        let event = factory.create_event("purchase");
        assert_eq!(event.source(), "checkout");
        assert_eq!(event.event_type(), &EventType::engagement());
        assert_eq!(event.priority(), Priority::High);

        let other = factory.create_event_of_type("disk_full", EventType::operational());
        assert_eq!(other.event_type(), &EventType::operational());
        assert_eq!(other.source(), "checkout");
    }

    #[test]
    fn factory_without_type_falls_back_to_unknown() {
        let factory = EventFactory::new("background");
        assert_eq!(
            factory.create_event("tick").event_type(),
            &EventType::unknown()
        );
    }
}
