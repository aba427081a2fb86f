//! Queries over the Causeway causal log.
//!
//! This crate provides:
//! - [`get_trace`] - Backward causal trace of a single event
//! - [`Relations`] - Normalized tables of targets, events, and tasks
//! - [`collect_related`] - Upstream/downstream related-target hierarchies
//! - [`TargetTable`] - Targets currently inspected by a debugging client
//! - [`InsightsServer`] - Request/response surface for the debugging client
//! - [`TraceFormatter`] - Human and JSON rendering of traces

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod codec;
pub mod config;
pub mod format;
pub mod hierarchy;
pub mod relations;
pub mod server;
pub mod state;
pub mod targets;
pub mod trace;

pub use codec::Codec;
pub use config::{HierarchyExpansion, InsightsConfig};
pub use format::{HumanFormatter, JsonFormatter, TraceFormatter};
pub use hierarchy::{Direction, RelatedHierarchyNode, RelatedHierarchyTree, collect_related};
pub use relations::{RelatedEvent, RelatedTarget, RelatedTask, Relations};
pub use server::{InsightsServer, Payload, Request, Response};
pub use state::{TargetState, target_state};
pub use targets::{Target, TargetTable};
pub use trace::{EventSummary, TaskSummary, TraceFrame, TraceTarget, current_trace, get_trace};
