//! Integration tests for Layer 1: Recorder
//!
//! Tests for identity correlation, causal log shape, and task/trace contexts.

mod causal_log;
