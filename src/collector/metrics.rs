use crate::collector::Collector;
use crate::error::AnalyticsError;
use crate::events::Event;

/// Forwards event counters and timers into the [`metrics`] facade.
///
/// Counters become `metrics::counter!` increments and timers become
/// `metrics::histogram!` samples (milliseconds), labeled with the event's
/// name and source. Custom metrics and freeform data carry no numeric
/// contract, so they are not forwarded. Pair with any exporter from the
/// `metrics` ecosystem to get events into an existing metrics pipeline.
///
pub struct MetricsCollector {
    name: String,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            name: "metrics".into(),
        }
    }
}

impl MetricsCollector {
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Collector for MetricsCollector {
    fn name(&self) -> &str {
        &self.name
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn record_event(&self, event: &Event) -> Result<(), AnalyticsError> {
        let labels: Vec<_> = [
            ("event".to_string(), event.name().to_string()),
            ("source".to_string(), event.source().to_string()),
        ]
        .into();

        for (key, value) in event.counters() {
            metrics::counter!(key.clone(), &labels).increment(value.round() as u64);
        }
        for (key, value) in event.timers() {
            metrics::histogram!(key.clone(), &labels).record(*value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventType;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};

    #[test]
    fn forwards_counters_and_timers_with_labels() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        let mut event = Event::new("page_load", EventType::operational()).with_source("webview");
        event
            .increment_counter_by("loads", 3.0)
            .add_timer("render_ms", 120.0)
            .add_data("page", "home")
            .add_metric("cached", true);

        metrics::with_local_recorder(&recorder, || {
            MetricsCollector::default().record_event(&event).unwrap();
        });

        let snapshot = snapshotter.snapshot().into_vec();
        assert_eq!(snapshot.len(), 2);
        for (key, _, _, value) in &snapshot {
            let labels: Vec<_> = key.key().labels().collect();
            assert!(labels.iter().any(|l| l.key() == "event" && l.value() == "page_load"));
            assert!(labels.iter().any(|l| l.key() == "source" && l.value() == "webview"));
            match key.key().name() {
                "loads" => assert_eq!(*value, DebugValue::Counter(3)),
                "render_ms" => match value {
                    DebugValue::Histogram(samples) => {
                        assert_eq!(samples.len(), 1);
                        assert!((samples[0].into_inner() - 120.0).abs() < f64::EPSILON);
                    }
                    other => panic!("expected histogram, got {other:?}"),
                },
                other => panic!("unexpected metric {other}"),
            }
        }
    }
}
