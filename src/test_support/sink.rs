use std::sync::Mutex;

use crate::aggregate::{Attributes, EventSink};

/// Sink that keeps every emitted event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(String, Attributes)>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<(String, Attributes)> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event_name: &str, attributes: Attributes) {
        self.events
            .lock()
            .unwrap()
            .push((event_name.to_string(), attributes));
    }
}
