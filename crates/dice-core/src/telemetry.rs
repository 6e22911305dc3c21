#![forbid(unsafe_code)]

//! Bounded in-process event log for diagnostics export.
//!
//! Holds the last [`MAX_EVENTS`] events. Every event is also emitted at
//! `debug` level through `tracing`.

use std::collections::VecDeque;

use serde::Serialize;
use serde_json::{Value, json};
use web_time::{SystemTime, UNIX_EPOCH};

pub const MAX_EVENTS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryEvent {
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    pub kind: String,
    pub payload: Value,
}

#[derive(Debug, Clone, Default)]
pub struct Telemetry {
    events: VecDeque<TelemetryEvent>,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}

impl Telemetry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, kind: impl Into<String>, payload: Value) {
        let event = TelemetryEvent {
            timestamp_ms: now_ms(),
            kind: kind.into(),
            payload,
        };
        tracing::debug!(kind = %event.kind, payload = %event.payload, "telemetry");
        if self.events.len() == MAX_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Record a failure as `error:<kind>`, merging `context` into the payload.
    pub fn log_error(&mut self, kind: &str, error: &dyn std::error::Error, context: Value) {
        let mut payload = json!({ "message": error.to_string() });
        if let (Some(target), Value::Object(extra)) = (payload.as_object_mut(), context) {
            target.extend(extra);
        }
        self.log(format!("error:{kind}"), payload);
    }

    #[must_use]
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Count of events of one kind.
    #[must_use]
    pub fn count(&self, kind: &str) -> usize {
        self.events.iter().filter(|event| event.kind == kind).count()
    }

    /// Pretty JSON document `{ "events": [...] }`.
    pub fn export(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&json!({ "events": self.events }))
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
