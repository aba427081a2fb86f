//! Integration tests for Layer 2: Insights
//!
//! Tests for traces, related hierarchies, and the request surface.

mod server;
