//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: typed refs, event types, deferred values, and errors.

mod deferred;
mod refs;
