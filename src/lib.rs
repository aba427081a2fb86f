//! Causeway - Causal execution-graph recorder for reactive pipelines
//!
//! This crate re-exports all layers of the Causeway system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: causeway_insights   - Traces, related hierarchies, request surface
//! Layer 1: causeway_recorder   - Identity registry, causal log, recorder
//! Layer 0: causeway_foundation - Typed refs, event types, errors
//! ```

pub use causeway_foundation as foundation;
pub use causeway_insights as insights;
pub use causeway_recorder as recorder;
