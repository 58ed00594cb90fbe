use std::sync::{Arc, Mutex};

use crate::sweep::state::{AttemptEvent, SweepSummary};

/// Presentation sink for sweep events. The core never formats output itself.
pub trait ResultReporter {
    /// Called once per processed pair, before any escalation prompt.
    fn report(&mut self, event: &AttemptEvent);

    fn finished(&mut self, _summary: &SweepSummary) {}
}

/// Keeps every event in memory; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<AttemptEvent>>>,
    summary: Arc<Mutex<Option<SweepSummary>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AttemptEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn summary(&self) -> Option<SweepSummary> {
        self.summary.lock().ok().and_then(|s| s.clone())
    }
}

impl ResultReporter for RecordingReporter {
    fn report(&mut self, event: &AttemptEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }

    fn finished(&mut self, summary: &SweepSummary) {
        if let Ok(mut slot) = self.summary.lock() {
            *slot = Some(summary.clone());
        }
    }
}
