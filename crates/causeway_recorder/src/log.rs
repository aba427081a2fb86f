//! Arena storage for the causal graph.
//!
//! Every node kind lives in its own `Vec`, indexed by the node's ref id. For
//! events the id is the global `time`, so the event arena is also the total
//! order of everything that happened. Causal links are stored as refs into the
//! arena, never as pointers, and nodes are never removed.

use causeway_foundation::{
    Deferred, DeclarationRef, EventRef, EventType, Locations, ObservableRef, SubscriberRef,
    TargetRef, TargetType, TaskRef,
};

// =============================================================================
// Nodes
// =============================================================================

/// A named kind of pipeline operation or event, shared by every instance
/// created from the same usage site.
#[derive(Clone, Debug)]
pub struct Declaration {
    /// This declaration's ref.
    pub id: DeclarationRef,
    /// Operator or event name, e.g. `"map"` or `"next"`.
    pub name: String,
    /// Name of the function that created the instance, if known.
    pub source_function: Option<String>,
    /// Arguments the operator was called with, or the payload of an event.
    pub args: Vec<serde_json::Value>,
    /// Where the declaration was made. Resolves after recording, if ever.
    pub locations: Deferred<Locations>,
}

/// One instantiated pipeline stage.
#[derive(Clone, Debug)]
pub struct Observable {
    /// This observable's ref.
    pub id: ObservableRef,
    /// The declaration this observable was created from.
    pub declaration: DeclarationRef,
    /// The observable this one was composed from, if any.
    pub source: Option<ObservableRef>,
    /// Labels attached by instrumentation.
    pub tags: Vec<String>,
    /// Events recorded against this observable, in time order.
    pub events: Vec<EventRef>,
}

/// One subscription to an observable.
#[derive(Clone, Debug)]
pub struct Subscriber {
    /// This subscriber's ref.
    pub id: SubscriberRef,
    /// The observable being subscribed to.
    pub observable: ObservableRef,
    /// The declaration of that observable.
    pub declaration: DeclarationRef,
    /// The downstream observable this subscription feeds, if any.
    pub destination: Option<ObservableRef>,
    /// Labels attached by instrumentation.
    pub tags: Vec<String>,
    /// Events recorded against this subscriber, in time order.
    pub events: Vec<EventRef>,
}

/// One recorded occurrence.
#[derive(Clone, Debug)]
pub struct Event {
    /// Global position of this event. Doubles as its id.
    pub time: EventRef,
    /// What happened.
    pub event_type: EventType,
    /// The event declaration (name and payload).
    pub declaration: DeclarationRef,
    /// What it happened to.
    pub target: TargetRef,
    /// The scheduling unit it happened in.
    pub task: TaskRef,
    /// The event that caused this one, if any.
    pub preceding: Option<EventRef>,
    /// Events caused by this one, in time order.
    pub succeeding: Vec<EventRef>,
}

/// A grouping of events executed within one scheduling unit.
#[derive(Clone, Debug)]
pub struct Task {
    /// This task's ref.
    pub id: TaskRef,
    /// Name of the scheduling unit, e.g. `"setTimeout"`.
    pub name: String,
}

// =============================================================================
// Target View
// =============================================================================

/// Borrowed view over either kind of target node.
#[derive(Copy, Clone, Debug)]
pub enum TargetView<'a> {
    /// An observable.
    Observable(&'a Observable),
    /// A subscriber.
    Subscriber(&'a Subscriber),
}

impl<'a> TargetView<'a> {
    /// Returns the typed ref of the target.
    #[must_use]
    pub fn target(self) -> TargetRef {
        match self {
            Self::Observable(o) => TargetRef::Observable(o.id),
            Self::Subscriber(s) => TargetRef::Subscriber(s.id),
        }
    }

    /// Returns the target type.
    #[must_use]
    pub fn target_type(self) -> TargetType {
        self.target().target_type()
    }

    /// Returns the raw id.
    #[must_use]
    pub fn id(self) -> u32 {
        self.target().id()
    }

    /// Returns the declaration that names this target.
    #[must_use]
    pub fn declaration(self) -> DeclarationRef {
        match self {
            Self::Observable(o) => o.declaration,
            Self::Subscriber(s) => s.declaration,
        }
    }

    /// Returns the target's tags in the order they were attached.
    #[must_use]
    pub fn tags(self) -> &'a [String] {
        match self {
            Self::Observable(o) => &o.tags,
            Self::Subscriber(s) => &s.tags,
        }
    }

    /// Returns the target's events in time order.
    #[must_use]
    pub fn events(self) -> &'a [EventRef] {
        match self {
            Self::Observable(o) => &o.events,
            Self::Subscriber(s) => &s.events,
        }
    }
}

// =============================================================================
// Causal Log
// =============================================================================

/// Append-only store for every node the recorder has minted.
#[derive(Clone, Debug, Default)]
pub struct CausalLog {
    declarations: Vec<Declaration>,
    observables: Vec<Observable>,
    subscribers: Vec<Subscriber>,
    events: Vec<Event>,
    tasks: Vec<Task>,
}

impl CausalLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Appends
    // -------------------------------------------------------------------------

    pub(crate) fn push_declaration(&mut self, declaration: Declaration) {
        debug_assert_eq!(declaration.id.index(), self.declarations.len());
        self.declarations.push(declaration);
    }

    pub(crate) fn push_observable(&mut self, observable: Observable) {
        debug_assert_eq!(observable.id.index(), self.observables.len());
        self.observables.push(observable);
    }

    pub(crate) fn push_subscriber(&mut self, subscriber: Subscriber) {
        debug_assert_eq!(subscriber.id.index(), self.subscribers.len());
        self.subscribers.push(subscriber);
    }

    pub(crate) fn push_task(&mut self, task: Task) {
        debug_assert_eq!(task.id.index(), self.tasks.len());
        self.tasks.push(task);
    }

    /// Attaches `tag` to an existing target unless it already carries it.
    pub(crate) fn add_tag(&mut self, target: TargetRef, tag: String) -> bool {
        let tags = match target {
            TargetRef::Observable(o) => &mut self.observables[o.index()].tags,
            TargetRef::Subscriber(s) => &mut self.subscribers[s.index()].tags,
        };
        if tags.contains(&tag) {
            return false;
        }
        tags.push(tag);
        true
    }

    /// Appends an event and links it into the causal tree and its target.
    ///
    /// The caller has already checked that every ref in `event` exists.
    pub(crate) fn push_event(&mut self, event: Event) {
        debug_assert_eq!(event.time.index(), self.events.len());
        let time = event.time;

        if let Some(preceding) = event.preceding {
            self.events[preceding.index()].succeeding.push(time);
        }
        match event.target {
            TargetRef::Observable(o) => self.observables[o.index()].events.push(time),
            TargetRef::Subscriber(s) => self.subscribers[s.index()].events.push(time),
        }
        self.events.push(event);
    }

    // -------------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------------

    /// Returns a declaration, or `None` if it was never recorded.
    #[must_use]
    pub fn declaration(&self, id: DeclarationRef) -> Option<&Declaration> {
        self.declarations.get(id.index())
    }

    /// Returns an observable, or `None` if it was never recorded.
    #[must_use]
    pub fn observable(&self, id: ObservableRef) -> Option<&Observable> {
        self.observables.get(id.index())
    }

    /// Returns a subscriber, or `None` if it was never recorded.
    #[must_use]
    pub fn subscriber(&self, id: SubscriberRef) -> Option<&Subscriber> {
        self.subscribers.get(id.index())
    }

    /// Returns an event, or `None` if it was never recorded.
    #[must_use]
    pub fn event(&self, time: EventRef) -> Option<&Event> {
        self.events.get(time.index())
    }

    /// Returns a task, or `None` if it was never recorded.
    #[must_use]
    pub fn task(&self, id: TaskRef) -> Option<&Task> {
        self.tasks.get(id.index())
    }

    /// Returns a view of either kind of target.
    #[must_use]
    pub fn target(&self, target: TargetRef) -> Option<TargetView<'_>> {
        match target {
            TargetRef::Observable(o) => self.observable(o).map(TargetView::Observable),
            TargetRef::Subscriber(s) => self.subscriber(s).map(TargetView::Subscriber),
        }
    }

    /// Returns the name of the declaration behind a target.
    #[must_use]
    pub fn target_name(&self, target: TargetRef) -> Option<&str> {
        let view = self.target(target)?;
        self.declaration(view.declaration())
            .map(|d| d.name.as_str())
    }

    /// Returns every event in time order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    // -------------------------------------------------------------------------
    // Sizes
    // -------------------------------------------------------------------------

    /// Number of declarations recorded.
    #[must_use]
    pub fn declaration_count(&self) -> usize {
        self.declarations.len()
    }

    /// Number of observables recorded.
    #[must_use]
    pub fn observable_count(&self) -> usize {
        self.observables.len()
    }

    /// Number of subscribers recorded.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Number of events recorded.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Number of tasks recorded.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}
