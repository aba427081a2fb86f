//! Normalized relation tables.
//!
//! A related-hierarchy query touches the same targets, events, and tasks many
//! times. The [`Relations`] tables hold one summary per id so a client can
//! render any row by looking up ids, and so repeated touches cost nothing.

use causeway_foundation::{EventRef, EventType, TargetId, TargetType, TaskRef};
use causeway_recorder::{CausalLog, TargetView};
use im::OrdMap;
use serde::{Deserialize, Serialize};

/// Summary of a target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedTarget {
    /// Target id.
    pub id: u32,
    /// Declaration name.
    pub name: String,
    /// Observable or subscriber.
    #[serde(rename = "type")]
    pub target_type: TargetType,
    /// Labels attached by instrumentation.
    pub tags: Vec<String>,
    /// Time of the target's first event; `None` if it has none.
    pub start_time: Option<u32>,
    /// Time of the target's last event if that event ended it; `None` while
    /// the target is still active.
    pub end_time: Option<u32>,
}

/// Summary of an event, with its causal neighbours by time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedEvent {
    /// The event's time.
    pub time: u32,
    /// What happened.
    pub event_type: EventType,
    /// Event declaration name.
    pub name: String,
    /// What it happened to.
    pub target: TargetId,
    /// Payload of `next`/`error` events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Task id.
    pub task: u32,
    /// Time of the causing event.
    pub preceding_event: Option<u32>,
    /// Times of the events this one caused.
    pub succeeding_events: Vec<u32>,
}

/// Summary of a task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedTask {
    /// Task id.
    pub id: u32,
    /// Task name.
    pub name: String,
}

/// Id-keyed tables of everything a query touched.
///
/// Keys go over the wire as decimal strings so that every codec carries the
/// same object shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Relations {
    /// Observables by id.
    #[serde(with = "string_keys")]
    pub observables: OrdMap<u32, RelatedTarget>,
    /// Subscribers by id.
    #[serde(with = "string_keys")]
    pub subscribers: OrdMap<u32, RelatedTarget>,
    /// Events by time.
    #[serde(with = "string_keys")]
    pub events: OrdMap<u32, RelatedEvent>,
    /// Tasks by id.
    #[serde(with = "string_keys")]
    pub tasks: OrdMap<u32, RelatedTask>,
}

mod string_keys {
    use std::collections::BTreeMap;

    use im::OrdMap;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<V, S>(table: &OrdMap<u32, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        V: Serialize + Clone,
        S: Serializer,
    {
        serializer.collect_map(table.iter().map(|(id, row)| (id.to_string(), row)))
    }

    pub fn deserialize<'de, V, D>(deserializer: D) -> Result<OrdMap<u32, V>, D::Error>
    where
        V: Deserialize<'de> + Clone,
        D: Deserializer<'de>,
    {
        BTreeMap::<String, V>::deserialize(deserializer)?
            .into_iter()
            .map(|(id, row)| {
                id.parse::<u32>()
                    .map(|id| (id, row))
                    .map_err(|e| D::Error::custom(format!("bad id key {id:?}: {e}")))
            })
            .collect()
    }
}

impl Relations {
    /// Creates empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the table for one target type.
    #[must_use]
    pub fn targets(&self, target_type: TargetType) -> &OrdMap<u32, RelatedTarget> {
        match target_type {
            TargetType::Observable => &self.observables,
            TargetType::Subscriber => &self.subscribers,
        }
    }

    fn targets_mut(&mut self, target_type: TargetType) -> &mut OrdMap<u32, RelatedTarget> {
        match target_type {
            TargetType::Observable => &mut self.observables,
            TargetType::Subscriber => &mut self.subscribers,
        }
    }

    /// Returns true if the target has a row.
    #[must_use]
    pub fn contains_target(&self, target: TargetId) -> bool {
        self.targets(target.target_type).contains_key(&target.id)
    }

    /// Adds a row for `target` unless it already has one.
    pub fn add_target(&mut self, log: &CausalLog, target: TargetView<'_>) {
        let table = self.targets_mut(target.target_type());
        if table.contains_key(&target.id()) {
            return;
        }

        let events = target.events();
        let start_time = events.first().map(|e| e.id());
        let end_time = events
            .last()
            .and_then(|&e| log.event(e))
            .filter(|e| e.event_type.is_terminal())
            .map(|e| e.time.id());
        let name = log
            .declaration(target.declaration())
            .map(|d| d.name.clone())
            .unwrap_or_default();

        table.insert(
            target.id(),
            RelatedTarget {
                id: target.id(),
                name,
                target_type: target.target_type(),
                tags: target.tags().to_vec(),
                start_time,
                end_time,
            },
        );
    }

    /// Adds a row for the task unless it already has one.
    pub fn add_task(&mut self, log: &CausalLog, task: TaskRef) {
        if self.tasks.contains_key(&task.id()) {
            return;
        }
        if let Some(task) = log.task(task) {
            self.tasks.insert(
                task.id.id(),
                RelatedTask {
                    id: task.id.id(),
                    name: task.name.clone(),
                },
            );
        }
    }

    /// Adds a row for `event` and for every event in its causal tree, along
    /// with their tasks and targets. Rendering one event row needs its
    /// neighbours, so the whole connected component comes along.
    pub fn add_event(&mut self, log: &CausalLog, event: EventRef, include_data: bool) {
        let mut pending = vec![event];

        while let Some(time) = pending.pop() {
            if self.events.contains_key(&time.id()) {
                continue;
            }
            let Some(event) = log.event(time) else {
                continue;
            };
            let declaration = log.declaration(event.declaration);
            let data = if include_data && event.event_type.carries_data() {
                declaration.and_then(|d| d.args.first().cloned())
            } else {
                None
            };

            self.events.insert(
                time.id(),
                RelatedEvent {
                    time: time.id(),
                    event_type: event.event_type,
                    name: declaration.map(|d| d.name.clone()).unwrap_or_default(),
                    target: event.target.to_id(),
                    data,
                    task: event.task.id(),
                    preceding_event: event.preceding.map(EventRef::id),
                    succeeding_events: event.succeeding.iter().map(|e| e.id()).collect(),
                },
            );

            pending.extend(event.preceding);
            pending.extend(event.succeeding.iter().copied());
            self.add_task(log, event.task);
            if let Some(target) = log.target(event.target) {
                self.add_target(log, target);
            }
        }
    }
}
