//! Historical events plotted next to the sales chart.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEvent {
    /// Instrument the event belongs to
    pub name: String,
    pub text: String,
    pub short_text: String,
    pub year: i32,
    /// Shown as a labelled event on the chart
    pub show: bool,
}

impl TimelineEvent {
    /// Event box caption, e.g. `1700 - Cristofori builds the first piano`.
    pub fn caption(&self) -> String {
        format!("{} - {}", self.year, self.text)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    events: Vec<TimelineEvent>,
}

impl Timeline {
    pub fn new(events: Vec<TimelineEvent>) -> Self {
        Self { events }
    }

    /// First event recorded for an instrument.
    pub fn find(&self, name: &str) -> Option<&TimelineEvent> {
        self.events.iter().find(|e| e.name == name)
    }

    pub fn visible(&self) -> impl Iterator<Item = &TimelineEvent> {
        self.events.iter().filter(|e| e.show)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
