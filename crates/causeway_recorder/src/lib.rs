//! Identity registry and causal event log for Causeway.
//!
//! This crate provides:
//! - [`RefAllocator`] - Monotonic, never-reused ids per ref kind
//! - [`IdentityRegistry`] - Weak object-to-ref association for live objects
//! - [`CausalLog`] - Arena storage for declarations, targets, events, tasks
//! - [`Recorder`] - The recording surface used by instrumentation hooks
//! - [`RecorderStats`] - Node counts for overhead monitoring

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod allocator;
pub mod config;
pub mod identity;
pub mod log;
pub mod recorder;
pub mod stats;

pub use allocator::RefAllocator;
pub use config::RecorderConfig;
pub use identity::IdentityRegistry;
pub use log::{CausalLog, Declaration, Event, Observable, Subscriber, TargetView, Task};
pub use recorder::{DeclarationBuilder, Recorder};
pub use stats::RecorderStats;
