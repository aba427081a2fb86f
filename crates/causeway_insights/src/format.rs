//! Trace output formatters.
//!
//! Provides human-readable and JSON formatters for trace frames.

use std::fmt::Write;

use crate::trace::TraceFrame;

// =============================================================================
// Trace Formatter Trait
// =============================================================================

/// Trait for formatting trace frames.
pub trait TraceFormatter {
    /// Formats a single frame to a string.
    fn format_frame(&self, frame: &TraceFrame) -> String;

    /// Formats a whole trace, most recent frame first.
    fn format_trace(&self, frames: &[TraceFrame]) -> String {
        frames
            .iter()
            .map(|f| self.format_frame(f))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// =============================================================================
// Human-Readable Formatter
// =============================================================================

/// Formats frames as `#time type name @ target_type#id`, one per line.
#[derive(Clone, Debug, Default)]
pub struct HumanFormatter {
    /// Whether to append the task.
    pub show_tasks: bool,
    /// Whether to append the target's preferred source location.
    pub show_locations: bool,
}

impl HumanFormatter {
    /// Creates a new human formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to show tasks.
    #[must_use]
    pub fn with_tasks(mut self) -> Self {
        self.show_tasks = true;
        self
    }

    /// Builder method to show source locations.
    #[must_use]
    pub fn with_locations(mut self) -> Self {
        self.show_locations = true;
        self
    }
}

impl TraceFormatter for HumanFormatter {
    fn format_frame(&self, frame: &TraceFrame) -> String {
        let TraceFrame {
            task,
            event,
            target,
        } = frame;
        let mut line = format!(
            "#{} {} {} @ {}#{} {}",
            event.id, event.event_type, event.name, target.target_type, target.id, target.name
        );

        if self.show_tasks {
            let _ = write!(line, " [task#{} {}]", task.id, task.name);
        }
        if self.show_locations {
            match target.locations.as_ref().and_then(|l| l.preferred()) {
                Some(location) => {
                    let _ = write!(line, " ({location})");
                }
                None => line.push_str(" (pending)"),
            }
        }

        line
    }
}

// =============================================================================
// JSON Formatter
// =============================================================================

/// Formats frames as JSON.
#[derive(Clone, Debug, Default)]
pub struct JsonFormatter {
    /// Whether to pretty-print JSON.
    pub pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method for pretty printing.
    #[must_use]
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn to_json<T: serde::Serialize + ?Sized>(&self, value: &T) -> String {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        json.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to format trace as JSON");
            String::from("null")
        })
    }
}

impl TraceFormatter for JsonFormatter {
    fn format_frame(&self, frame: &TraceFrame) -> String {
        self.to_json(frame)
    }

    fn format_trace(&self, frames: &[TraceFrame]) -> String {
        self.to_json(frames)
    }
}

// =============================================================================
// Tests
// =============================================================================
