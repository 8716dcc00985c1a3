//! Dashboard event bus
//!
//! Broadcasts dataset changes to SSE subscribers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

/// Events pushed to `/api/events` subscribers
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum DashEvent {
    /// A new dataset replaced the active one
    DatasetLoaded {
        dataset_id: Uuid,
        name: Option<String>,
        rows: usize,
        timestamp: DateTime<Utc>,
    },
}

impl DashEvent {
    /// SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            DashEvent::DatasetLoaded { .. } => "DatasetLoaded",
        }
    }
}

pub struct EventBus {
    tx: broadcast::Sender<DashEvent>,
}

impl EventBus {
    /// `capacity` events are buffered before slow subscribers lag
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashEvent> {
        self.tx.subscribe()
    }

    /// Emit to all subscribers; having none is fine
    pub fn emit_lossy(&self, event: DashEvent) {
        match self.tx.send(event) {
            Ok(n) => debug!("Event delivered to {} subscriber(s)", n),
            Err(_) => debug!("No event subscribers"),
        }
    }
}
