use crate::events::Event;
use std::time::{Duration, Instant};

/// Where a [`TimerMetric`] is in its start/stop cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Stopped,
}

/// A stopwatch that folds measured elapsed time into event timer stores.
///
/// Recording lives here rather than on [`Event`] so the event model never
/// needs to know about timers. A timer may go through several start/stop
/// cycles before recording; the intervals accumulate. Recording writes the
/// accumulated total (in milliseconds) under the timer's name and does not
/// reset it, so recording again without an intervening [`start`] writes the
/// same value again.
///
/// # Example
/// ```
/// use analytics_hub::{Event, EventType, TimerMetric};
///
/// let mut event = Event::new("page_load", EventType::operational());
/// {
///     let mut timer = TimerMetric::with_parent("render", &mut event);
///     timer.start();
///     // ... work ...
///     timer.record();
/// }
/// assert!(event.timers().contains_key("render"));
/// ```
///
/// [`start`]: TimerMetric::start
#[derive(Debug)]
pub struct TimerMetric<'a> {
    name: String,
    parent: Option<&'a mut Event>,
    state: TimerState,
    started_at: Option<Instant>,
    total: Duration,
}

impl<'a> TimerMetric<'a> {
    /// Creates a detached timer; [`record`](Self::record) will have nowhere
    /// to write, but [`record_in_events`](Self::record_in_events) works.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            state: TimerState::Idle,
            started_at: None,
            total: Duration::ZERO,
        }
    }

    /// Creates a timer bound to the event it records into by default.
    #[must_use]
    pub fn with_parent(name: &str, parent: &'a mut Event) -> Self {
        Self {
            name: name.to_string(),
            parent: Some(parent),
            state: TimerState::Idle,
            started_at: None,
            total: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn state(&self) -> TimerState {
        self.state
    }

    /// Starts the timer if not already running.
    pub fn start(&mut self) {
        if self.started_at.is_none() {
            self.state = TimerState::Running;
            self.started_at = Some(Instant::now());
        }
    }

    /// Stops the timer and folds the interval into the accumulated total.
    ///
    /// Does not record, so the timer can be started again to accumulate a
    /// further interval. Stopping a timer that is not running logs a warning
    /// and changes nothing.
    pub fn stop(&mut self) {
        match self.started_at.take() {
            Some(started_at) => {
                self.total += started_at.elapsed();
                self.state = TimerState::Stopped;
            }
            None => log::warn!("trying to stop timer '{}' without starting it", self.name),
        }
    }

    /// Total accumulated duration, including the in-flight interval when
    /// running.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(started_at) => self.total + started_at.elapsed(),
            None => self.total,
        }
    }

    /// Accumulated elapsed time in milliseconds, the unit written into event
    /// timer stores.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }

    /// Stops the timer (if running) and writes the accumulated elapsed time
    /// into the parent event under this timer's name, replacing any previous
    /// value.
    ///
    /// Logs a warning and leaves every event untouched when the timer has no
    /// parent.
    pub fn record(&mut self) -> &mut Self {
        self.stop_if_running();
        self.state = TimerState::Stopped;
        let elapsed_ms = self.total.as_secs_f64() * 1000.0;
        let name = self.name.clone();
        match self.parent.as_mut() {
            Some(parent) => {
                parent.remove_timer(&name);
                parent.add_timer(&name, elapsed_ms);
            }
            None => log::warn!("could not record timer '{name}': no parent event is defined"),
        }
        self
    }

    /// Stops the timer (if running) and writes the accumulated elapsed time
    /// into every supplied event, in order. The parent event is not touched
    /// unless it is among the supplied events.
    pub fn record_in_events<'e>(&mut self, events: impl IntoIterator<Item = &'e mut Event>) {
        self.stop_if_running();
        self.state = TimerState::Stopped;
        let elapsed_ms = self.total.as_secs_f64() * 1000.0;
        for event in events {
            event.remove_timer(&self.name);
            event.add_timer(&self.name, elapsed_ms);
        }
    }

    fn stop_if_running(&mut self) {
        if let Some(started_at) = self.started_at.take() {
            self.total += started_at.elapsed();
            self.state = TimerState::Stopped;
        }
    }
}
