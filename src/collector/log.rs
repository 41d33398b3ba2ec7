use crate::collector::Collector;
use crate::error::AnalyticsError;
use crate::events::Event;

/// Writes a one-line summary of each event through the `log` facade.
///
/// Useful during development and as a default collector that makes every
/// recorded event visible. Not a substitute for a real analytics backend.
///
pub struct LogCollector {
    name: String,
}

impl Default for LogCollector {
    fn default() -> Self {
        Self { name: "log".into() }
    }
}

impl LogCollector {
    /// Creates a log collector with a custom name, for hubs that route more
    /// than one of them.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Collector for LogCollector {
    fn name(&self) -> &str {
        &self.name
    }

    fn record_event(&self, event: &Event) -> Result<(), AnalyticsError> {
        log::info!(
            "event name={} source={} type={} priority={:?} data={:?} counters={:?} timers={:?} metrics={:?}",
            event.name(),
            event.source(),
            event.event_type(),
            event.priority(),
            event.data(),
            event.counters(),
            event.timers(),
            event.metrics(),
        );
        Ok(())
    }
}
