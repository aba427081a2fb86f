//! Node counts for health and overhead monitoring.

use std::collections::BTreeMap;

use causeway_foundation::EventType;
use serde::{Deserialize, Serialize};

use crate::log::CausalLog;

/// Counts of recorded nodes by kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecorderStats {
    /// Number of declarations.
    pub declarations: usize,
    /// Number of observables ever recorded.
    pub observables: usize,
    /// Number of subscribers ever recorded.
    pub subscribers: usize,
    /// Number of events.
    pub events: usize,
    /// Number of tasks.
    pub tasks: usize,
    /// Observables whose live object is still reachable.
    pub live_observables: usize,
    /// Subscribers whose live object is still reachable.
    pub live_subscribers: usize,
    /// Event counts per event type.
    pub events_by_type: BTreeMap<EventType, usize>,
}

impl RecorderStats {
    /// Collects counts from a log.
    #[must_use]
    pub fn collect(log: &CausalLog, live_observables: usize, live_subscribers: usize) -> Self {
        let mut events_by_type = BTreeMap::new();
        for event in log.events() {
            *events_by_type.entry(event.event_type).or_insert(0) += 1;
        }

        Self {
            declarations: log.declaration_count(),
            observables: log.observable_count(),
            subscribers: log.subscriber_count(),
            events: log.event_count(),
            tasks: log.task_count(),
            live_observables,
            live_subscribers,
            events_by_type,
        }
    }

    /// Total number of graph nodes of every kind.
    #[must_use]
    pub fn total_nodes(&self) -> usize {
        self.declarations + self.observables + self.subscribers + self.events + self.tasks
    }
}
