//! Core types for Causeway.
//!
//! This crate provides:
//! - [`Ref`] - Opaque, kind-tagged handles to causal graph nodes
//! - [`TargetRef`] / [`TargetId`] - Observable-or-subscriber targets
//! - [`EventType`] - The kinds of recorded pipeline events
//! - [`Deferred`] - Write-once cells for values that resolve later
//! - [`Locations`] - Source locations attached to declarations
//! - [`Error`] - Error types for caller-contract violations and codecs

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod deferred;
pub mod error;
pub mod event;
pub mod location;
pub mod refs;

pub use deferred::{Deferred, Resolver};
pub use error::{Error, ErrorKind, Result};
pub use event::EventType;
pub use location::{Location, Locations};
pub use refs::{
    DeclarationRef, EventRef, Kind, ObservableRef, Ref, RefKind, SubscriberRef, TargetId,
    TargetRef, TargetType, TaskRef, kind,
};
