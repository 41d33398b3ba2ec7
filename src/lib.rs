#![warn(clippy::pedantic, clippy::nursery, clippy::cargo, clippy::perf)]

//! # `analytics_hub`
//!
//! An event aggregation hub: producers build structured [`Event`]s carrying
//! counters, timers, and arbitrary metrics, and an [`AnalyticsHub`] routes
//! each recorded event to the [`Collector`]s subscribed to its type, plus an
//! optional default collector that receives everything. Each collector
//! receives a given event at most once per record, even when it is both a
//! subscriber and the default.
//!
//! Collectors and routing rules can be added and removed at runtime from any
//! thread; dispatch is synchronous on the recording thread and a failing
//! collector never blocks delivery to the others.
//!
//! ```
//! use std::sync::Arc;
//! use analytics_hub::{AnalyticsHub, Event, EventType, LogCollector, TimerMetric};
//!
//! let hub = AnalyticsHub::new();
//! hub.add_collector_to_event_type(EventType::engagement(), Arc::new(LogCollector::default()));
//!
//! let mut event = Event::new("checkout", EventType::engagement()).with_source("cart");
//! event.increment_counter("purchases").add_data("currency", "EUR");
//!
//! let mut timer = TimerMetric::with_parent("checkout_time", &mut event);
//! timer.start();
//! // ... work ...
//! timer.record();
//!
//! hub.record_event(&event);
//! ```
//!
//! Events serialize to MessagePack (`TryFrom<Event> for Vec<u8>` and back)
//! so platform bridges can marshal them across runtime boundaries.

mod collector;
mod error;
mod events;
mod hub;
mod timer;

pub use collector::{Collector, LogCollector, MetricsCollector};
pub use error::AnalyticsError;
pub use events::{Event, EventFactory, EventType, MetricValue, Priority};
pub use hub::AnalyticsHub;
pub use timer::{TimerMetric, TimerState};
