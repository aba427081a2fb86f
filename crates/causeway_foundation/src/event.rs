//! Event types for recorded pipeline occurrences.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of a recorded event.
///
/// Event declarations are named after the notification they record; the type
/// is derived from that name when the event is recorded.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// A subscriber subscribed to its observable.
    Subscribe,
    /// A subscriber unsubscribed.
    Unsubscribe,
    /// A value was delivered.
    Next,
    /// The stream failed.
    Error,
    /// The stream finished.
    Complete,
    /// A connectable observable was connected.
    Connect,
    /// Anything the recorder does not recognize.
    Other,
}

impl EventType {
    /// Parses an event type from a declaration name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "subscribe" => Self::Subscribe,
            "unsubscribe" => Self::Unsubscribe,
            "next" => Self::Next,
            "error" => Self::Error,
            "complete" => Self::Complete,
            "connect" => Self::Connect,
            _ => Self::Other,
        }
    }

    /// Returns the lowercase name of this event type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Subscribe => "subscribe",
            Self::Unsubscribe => "unsubscribe",
            Self::Next => "next",
            Self::Error => "error",
            Self::Complete => "complete",
            Self::Connect => "connect",
            Self::Other => "other",
        }
    }

    /// Returns true if no further events are expected on the target after
    /// this one.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Error | Self::Complete | Self::Unsubscribe)
    }

    /// Returns true for events that carry values downstream.
    #[must_use]
    pub const fn is_notification(self) -> bool {
        matches!(self, Self::Next | Self::Error | Self::Complete)
    }

    /// Returns true for events that propagate from destination to source.
    #[must_use]
    pub const fn is_subscription(self) -> bool {
        matches!(self, Self::Subscribe | Self::Unsubscribe)
    }

    /// Returns true if the event carries a payload worth showing.
    #[must_use]
    pub const fn carries_data(self) -> bool {
        matches!(self, Self::Next | Self::Error)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
