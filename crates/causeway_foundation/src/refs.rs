//! Typed references to causal graph nodes.
//!
//! A [`Ref`] is a small integer tagged at the type level with the kind of node
//! it points at, so a declaration ref can never be passed where an observable
//! ref is expected. Refs carry no ownership of the underlying pipeline object;
//! they stay valid for the whole recording session.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

// =============================================================================
// Ref Kinds
// =============================================================================

/// Runtime tag for the kind of node a ref points at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    /// A named kind of pipeline operation or event.
    Declaration,
    /// An instantiated pipeline stage.
    Observable,
    /// An instantiated subscription.
    Subscriber,
    /// A recorded occurrence.
    Event,
    /// A scheduling unit grouping events.
    Task,
}

impl RefKind {
    /// All kinds, in allocation-slot order.
    pub const ALL: [RefKind; 5] = [
        RefKind::Declaration,
        RefKind::Observable,
        RefKind::Subscriber,
        RefKind::Event,
        RefKind::Task,
    ];

    /// Returns the dense slot index for this kind.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Declaration => 0,
            Self::Observable => 1,
            Self::Subscriber => 2,
            Self::Event => 3,
            Self::Task => 4,
        }
    }

    /// Returns the lowercase name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Declaration => "declaration",
            Self::Observable => "observable",
            Self::Subscriber => "subscriber",
            Self::Event => "event",
            Self::Task => "task",
        }
    }
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marker types used as the type parameter of [`Ref`].
pub mod kind {
    use super::RefKind;

    mod sealed {
        pub trait Sealed {}
    }

    /// A compile-time ref kind.
    pub trait Kind: sealed::Sealed + Copy + Eq + Ord + std::hash::Hash + 'static {
        /// The runtime tag for this kind.
        const KIND: RefKind;
    }

    macro_rules! ref_kind {
        ($($name:ident),* $(,)?) => {
            $(
                #[doc = concat!("Marker for [`RefKind::", stringify!($name), "`] refs.")]
                #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
                pub struct $name;

                impl sealed::Sealed for $name {}

                impl Kind for $name {
                    const KIND: RefKind = RefKind::$name;
                }
            )*
        };
    }

    ref_kind!(Declaration, Observable, Subscriber, Event, Task);
}

pub use kind::Kind;

// =============================================================================
// Ref
// =============================================================================

/// Opaque, typed handle to a node in the causal graph.
///
/// Ids are allocated monotonically per kind and never reused. For events the
/// id doubles as the global `time` of the event.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ref<K: Kind> {
    id: u32,
    kind: PhantomData<K>,
}

impl<K: Kind> Ref<K> {
    /// Creates a ref from a raw id.
    ///
    /// Refs built from untrusted integers must still be dereferenced through
    /// the log, which reports ids it never minted as not found.
    #[must_use]
    pub const fn from_raw(id: u32) -> Self {
        Self {
            id,
            kind: PhantomData,
        }
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn id(self) -> u32 {
        self.id
    }

    /// Returns the id as an arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.id as usize
    }

    /// Returns the runtime kind of this ref.
    #[must_use]
    pub const fn kind(self) -> RefKind {
        K::KIND
    }
}

impl<K: Kind> fmt::Debug for Ref<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", K::KIND, self.id)
    }
}

impl<K: Kind> fmt::Display for Ref<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", K::KIND, self.id)
    }
}

/// Ref to a declaration node.
pub type DeclarationRef = Ref<kind::Declaration>;
/// Ref to an observable node.
pub type ObservableRef = Ref<kind::Observable>;
/// Ref to a subscriber node.
pub type SubscriberRef = Ref<kind::Subscriber>;
/// Ref to an event node. The id is the event's `time`.
pub type EventRef = Ref<kind::Event>;
/// Ref to a task node.
pub type TaskRef = Ref<kind::Task>;

// =============================================================================
// Targets
// =============================================================================

/// The two kinds of node that events happen to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    /// An observable target.
    Observable,
    /// A subscriber target.
    Subscriber,
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Observable => f.write_str("observable"),
            Self::Subscriber => f.write_str("subscriber"),
        }
    }
}

/// A typed ref to either an observable or a subscriber.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetRef {
    /// An observable target.
    Observable(ObservableRef),
    /// A subscriber target.
    Subscriber(SubscriberRef),
}

impl TargetRef {
    /// Returns the target type.
    #[must_use]
    pub const fn target_type(self) -> TargetType {
        match self {
            Self::Observable(_) => TargetType::Observable,
            Self::Subscriber(_) => TargetType::Subscriber,
        }
    }

    /// Returns the raw id within the target's kind.
    #[must_use]
    pub const fn id(self) -> u32 {
        match self {
            Self::Observable(r) => r.id(),
            Self::Subscriber(r) => r.id(),
        }
    }

    /// Returns the untyped wire form of this target.
    #[must_use]
    pub const fn to_id(self) -> TargetId {
        TargetId {
            target_type: self.target_type(),
            id: self.id(),
        }
    }
}

impl From<ObservableRef> for TargetRef {
    fn from(r: ObservableRef) -> Self {
        Self::Observable(r)
    }
}

impl From<SubscriberRef> for TargetRef {
    fn from(r: SubscriberRef) -> Self {
        Self::Subscriber(r)
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Observable(r) => write!(f, "{r}"),
            Self::Subscriber(r) => write!(f, "{r}"),
        }
    }
}

/// Untyped target identity as it appears on the query boundary.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId {
    /// Whether this is an observable or a subscriber.
    #[serde(rename = "type")]
    pub target_type: TargetType,
    /// Raw id within the target type.
    pub id: u32,
}

impl TargetId {
    /// Converts back to a typed ref. The ref may still be unknown to the log.
    #[must_use]
    pub const fn to_ref(self) -> TargetRef {
        match self.target_type {
            TargetType::Observable => TargetRef::Observable(Ref::from_raw(self.id)),
            TargetType::Subscriber => TargetRef::Subscriber(Ref::from_raw(self.id)),
        }
    }
}

impl From<TargetRef> for TargetId {
    fn from(target: TargetRef) -> Self {
        target.to_id()
    }
}
