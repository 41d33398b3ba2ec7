mod log;
mod metrics;

pub use self::log::LogCollector;
pub use self::metrics::MetricsCollector;

use crate::error::AnalyticsError;
use crate::events::Event;

/// A sink that consumes dispatched events.
///
/// Collectors form an open set: any log writer, network exporter, or
/// in-memory test spy plugs into the hub by implementing this trait. The
/// hub never needs to change for a new sink.
///
/// The `name` is the collector's identity within a hub: registration,
/// routing, and default-collector de-duplication all compare names, so it
/// must be stable for the lifetime of the collector.
///
/// Ingestion failures are contained by the hub (logged, never propagated to
/// the producer) and never prevent delivery to other collectors.
///
/// # Example
/// ```
/// use analytics_hub::{AnalyticsError, Collector, Event};
///
/// struct Stdout;
///
/// impl Collector for Stdout {
///     fn name(&self) -> &str {
///         "stdout"
///     }
///
///     fn record_event(&self, event: &Event) -> Result<(), AnalyticsError> {
///         println!("{event:?}");
///         Ok(())
///     }
/// }
/// ```
pub trait Collector: Send + Sync {
    /// Stable identity of this collector.
    fn name(&self) -> &str;

    /// Consumes one dispatched event.
    ///
    /// # Errors
    /// Returns an error when the sink cannot ingest the event; the hub logs
    /// it and carries on with the remaining collectors.
    fn record_event(&self, event: &Event) -> Result<(), AnalyticsError>;
}
