use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::offer::SessionId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationEventType {
    RoundEvaluated,
    CounterOffered,
    SessionClosed,
    AnomalyDetected,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TelemetryContext {
    pub session_id: SessionId,
    pub correlation_id: String,
}

impl TelemetryContext {
    pub fn new(session_id: SessionId, correlation_id: impl Into<String>) -> Self {
        Self { session_id, correlation_id: correlation_id.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationTelemetryEvent {
    pub event_id: String,
    pub session_id: SessionId,
    pub correlation_id: String,
    pub event_type: NegotiationEventType,
    pub round: u8,
    pub metadata: BTreeMap<String, String>,
    pub occurred_at: DateTime<Utc>,
}

impl NegotiationTelemetryEvent {
    pub fn new(context: &TelemetryContext, event_type: NegotiationEventType, round: u8) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            session_id: context.session_id.clone(),
            correlation_id: context.correlation_id.clone(),
            event_type,
            round,
            metadata: BTreeMap::new(),
            occurred_at: Utc::now(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

pub trait TelemetrySink: Send + Sync {
    fn emit(&self, event: NegotiationTelemetryEvent);
}

#[derive(Clone, Default)]
pub struct InMemoryTelemetrySink {
    events: Arc<Mutex<Vec<NegotiationTelemetryEvent>>>,
}

impl InMemoryTelemetrySink {
    pub fn events(&self) -> Vec<NegotiationTelemetryEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl TelemetrySink for InMemoryTelemetrySink {
    fn emit(&self, event: NegotiationTelemetryEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
