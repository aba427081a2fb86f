//! Backward causal traces.
//!
//! A trace answers "how did we get here?" for one event: the event itself,
//! the event that caused it, the event that caused that one, and so on back
//! to an event with no recorded cause.

use causeway_foundation::{EventRef, EventType, Locations, TargetType};
use causeway_recorder::{CausalLog, Event, Recorder};
use serde::{Deserialize, Serialize};

/// A task as shown in a trace frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    /// Task id.
    pub id: u32,
    /// Task name.
    pub name: String,
}

/// An event as shown in a trace frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    /// The event's time.
    pub id: u32,
    /// What happened.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// The event declaration's name.
    pub name: String,
}

/// A target as shown in a trace frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceTarget {
    /// Target id.
    pub id: u32,
    /// Observable or subscriber.
    #[serde(rename = "type")]
    pub target_type: TargetType,
    /// The target declaration's name.
    pub name: String,
    /// Where the target was declared, once known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Locations>,
}

/// One step of a trace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceFrame {
    /// The task the event ran in.
    pub task: TaskSummary,
    /// The event.
    pub event: EventSummary,
    /// The target the event happened to.
    pub target: TraceTarget,
}

impl TraceFrame {
    /// Builds the frame for one event. Returns `None` only if the log does
    /// not contain a node the event refers to.
    #[must_use]
    pub fn for_event(log: &CausalLog, event: &Event) -> Option<Self> {
        let task = log.task(event.task)?;
        let declaration = log.declaration(event.declaration)?;
        let target = log.target(event.target)?;
        let target_declaration = log.declaration(target.declaration())?;

        Some(Self {
            task: TaskSummary {
                id: task.id.id(),
                name: task.name.clone(),
            },
            event: EventSummary {
                id: event.time.id(),
                event_type: event.event_type,
                name: declaration.name.clone(),
            },
            target: TraceTarget {
                id: target.id(),
                target_type: target.target_type(),
                name: target_declaration.name.clone(),
                locations: target_declaration.locations.get().cloned(),
            },
        })
    }
}

/// Returns the causal trace of `event`, most recent first.
///
/// Returns an empty trace when `event` is `None` or unknown. Terminates
/// because every event's predecessor has a strictly smaller time.
#[must_use]
pub fn get_trace(log: &CausalLog, event: Option<EventRef>) -> Vec<TraceFrame> {
    let mut frames = Vec::new();
    let mut cursor = event;

    while let Some(time) = cursor {
        let Some(event) = log.event(time) else {
            break;
        };
        let Some(frame) = TraceFrame::for_event(log, event) else {
            break;
        };
        frames.push(frame);
        cursor = event.preceding;
    }

    frames
}

/// Returns the trace of the event the recorder is currently executing.
#[must_use]
pub fn current_trace(recorder: &Recorder) -> Vec<TraceFrame> {
    get_trace(recorder.log(), recorder.current_event())
}
