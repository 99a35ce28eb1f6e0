//! Event publisher adapters.

use crate::events::{LedgerEvent, LedgerEventKind};
use crate::ports::outbound::{LedgerEventPublisher, PublishError};
use parking_lot::Mutex;

/// No-op publisher for running without an event sink.
#[derive(Debug, Clone, Default)]
pub struct NoOpPublisher;

impl LedgerEventPublisher for NoOpPublisher {
    fn publish(&self, _event: LedgerEvent) -> Result<(), PublishError> {
        Ok(())
    }
}

/// Publisher that keeps every event in order.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<LedgerEvent>>,
}

impl RecordingPublisher {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events.
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.lock().clone()
    }

    /// Recorded payloads, without envelopes.
    pub fn kinds(&self) -> Vec<LedgerEventKind> {
        self.events.lock().iter().map(|e| e.kind.clone()).collect()
    }
}

impl LedgerEventPublisher for RecordingPublisher {
    fn publish(&self, event: LedgerEvent) -> Result<(), PublishError> {
        self.events.lock().push(event);
        Ok(())
    }
}
