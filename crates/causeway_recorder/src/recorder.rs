//! The recording surface used by instrumentation hooks.
//!
//! Hooks call into the [`Recorder`] synchronously as the host pipeline
//! creates observables and subscribers and delivers notifications:
//!
//! ```text
//! declaration_ref("map")            ;; operator usage site
//! observable_ref_for(&obs, ..)      ;; instance, deduplicated by identity
//! subscriber_ref_for(&sub, ..)      ;; subscription, deduplicated by identity
//! start_task("setTimeout")          ;; scheduling unit
//! subscriber_event_ref(next, s, p)  ;; event at the next global time
//! end_task()
//! ```
//!
//! # Contract violations
//!
//! Calls that would corrupt the log (refs this recorder never minted,
//! `end_task` with no task started, `leave_event` with no event entered) are
//! rejected: the log is left untouched, a `warn` diagnostic is emitted, and
//! the call returns an error. The recorder never panics on them.

use std::any::Any;
use std::rc::Rc;

use causeway_foundation::{
    Deferred, DeclarationRef, Error, EventRef, EventType, Kind, Locations, ObservableRef, Ref,
    Result, SubscriberRef, TargetRef, TaskRef, kind,
};

use crate::allocator::RefAllocator;
use crate::config::RecorderConfig;
use crate::identity::IdentityRegistry;
use crate::log::{CausalLog, Declaration, Event, Observable, Subscriber, TargetView, Task};
use crate::stats::RecorderStats;

/// Logs and returns a contract violation.
fn violation(error: Error) -> Error {
    tracing::warn!(error = %error, "rejected malformed recorder call");
    error
}

/// Mints the next ref of kind `K`, logging when the kind's ids run out.
fn mint<K: Kind>(allocator: &mut RefAllocator) -> Result<Ref<K>> {
    allocator.next().map_err(|error| {
        tracing::warn!(error = %error, "refusing to record past the id limit");
        error
    })
}

// =============================================================================
// Declaration Builder
// =============================================================================

/// Optional parts of a declaration.
#[derive(Debug, Default)]
pub struct DeclarationBuilder {
    name: String,
    source_function: Option<String>,
    args: Vec<serde_json::Value>,
    locations: Deferred<Locations>,
}

impl DeclarationBuilder {
    /// Starts a declaration with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder method to set the creating function's name.
    #[must_use]
    pub fn with_source_function(mut self, function: impl Into<String>) -> Self {
        self.source_function = Some(function.into());
        self
    }

    /// Builder method to set the call arguments.
    #[must_use]
    pub fn with_args(mut self, args: Vec<serde_json::Value>) -> Self {
        self.args = args;
        self
    }

    /// Builder method to set the (possibly still pending) locations.
    #[must_use]
    pub fn with_locations(mut self, locations: Deferred<Locations>) -> Self {
        self.locations = locations;
        self
    }
}

// =============================================================================
// Recorder
// =============================================================================

/// Records the causal execution graph of an instrumented pipeline runtime.
#[derive(Debug)]
pub struct Recorder {
    config: RecorderConfig,
    allocator: RefAllocator,
    log: CausalLog,
    observable_identities: IdentityRegistry<kind::Observable>,
    subscriber_identities: IdentityRegistry<kind::Subscriber>,
    task_stack: Vec<TaskRef>,
    ambient_task: Option<TaskRef>,
    trace_stack: Vec<EventRef>,
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new(RecorderConfig::default())
    }
}

impl Recorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new(config: RecorderConfig) -> Self {
        let sweep_threshold = config.sweep_threshold;
        Self {
            config,
            allocator: RefAllocator::new(),
            log: CausalLog::new(),
            observable_identities: IdentityRegistry::new(sweep_threshold),
            subscriber_identities: IdentityRegistry::new(sweep_threshold),
            task_stack: Vec::new(),
            ambient_task: None,
            trace_stack: Vec::new(),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Returns the underlying log for read-only queries.
    #[must_use]
    pub fn log(&self) -> &CausalLog {
        &self.log
    }

    // -------------------------------------------------------------------------
    // Declarations and targets
    // -------------------------------------------------------------------------

    /// Records a declaration with only a name.
    ///
    /// # Errors
    ///
    /// Returns an error if declaration ids are exhausted.
    pub fn declaration_ref(&mut self, name: impl Into<String>) -> Result<DeclarationRef> {
        self.declare(DeclarationBuilder::new(name))
    }

    /// Records a declaration. Declarations are never deduplicated by content;
    /// callers reuse the returned ref to share one.
    ///
    /// # Errors
    ///
    /// Returns an error if declaration ids are exhausted.
    pub fn declare(&mut self, builder: DeclarationBuilder) -> Result<DeclarationRef> {
        let id = mint(&mut self.allocator)?;
        tracing::debug!(%id, name = %builder.name, "recorded declaration");
        self.log.push_declaration(Declaration {
            id,
            name: builder.name,
            source_function: builder.source_function,
            args: builder.args,
            locations: builder.locations,
        });
        Ok(id)
    }

    /// Records an observable created from `declaration`, optionally composed
    /// from `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if either ref was not minted by this recorder.
    pub fn observable_ref(
        &mut self,
        declaration: DeclarationRef,
        source: Option<ObservableRef>,
    ) -> Result<ObservableRef> {
        self.check(declaration)?;
        if let Some(source) = source {
            self.check(source)?;
        }

        let id = mint(&mut self.allocator)?;
        tracing::debug!(%id, %declaration, "recorded observable");
        self.log.push_observable(Observable {
            id,
            declaration,
            source,
            tags: Vec::new(),
            events: Vec::new(),
        });
        Ok(id)
    }

    /// Records a subscription to `observable`, optionally feeding
    /// `destination`.
    ///
    /// # Errors
    ///
    /// Returns an error if either ref was not minted by this recorder.
    pub fn subscriber_ref(
        &mut self,
        observable: ObservableRef,
        destination: Option<ObservableRef>,
    ) -> Result<SubscriberRef> {
        let declaration = self
            .log
            .observable(observable)
            .map(|o| o.declaration)
            .ok_or_else(|| violation(Error::unknown_ref(observable.kind(), observable.id())))?;
        if let Some(destination) = destination {
            self.check(destination)?;
        }

        let id = mint(&mut self.allocator)?;
        tracing::debug!(%id, %observable, "recorded subscriber");
        self.log.push_subscriber(Subscriber {
            id,
            observable,
            declaration,
            destination,
            tags: Vec::new(),
            events: Vec::new(),
        });
        Ok(id)
    }

    /// Attaches a label to a target. Returns false if the target already
    /// carried it.
    ///
    /// # Errors
    ///
    /// Returns an error if the target was not minted by this recorder.
    pub fn tag_target(
        &mut self,
        target: impl Into<TargetRef>,
        tag: impl Into<String>,
    ) -> Result<bool> {
        let target = target.into();
        match target {
            TargetRef::Observable(o) => self.check(o)?,
            TargetRef::Subscriber(s) => self.check(s)?,
        }
        let tag = tag.into();
        tracing::debug!(%target, %tag, "tagged target");
        Ok(self.log.add_tag(target, tag))
    }

    /// Returns the observable ref attached to `object`, recording one with
    /// `create` the first time the object is seen.
    ///
    /// # Errors
    ///
    /// Propagates errors from `create`; nothing is attached in that case.
    pub fn observable_ref_for<T, F>(&mut self, object: &Rc<T>, create: F) -> Result<ObservableRef>
    where
        T: Any,
        F: FnOnce(&mut Self) -> Result<ObservableRef>,
    {
        if let Some(existing) = self.observable_identities.get(object) {
            return Ok(existing);
        }
        let reference = create(self)?;
        self.observable_identities.attach(object, reference);
        Ok(reference)
    }

    /// Returns the subscriber ref attached to `object`, recording one with
    /// `create` the first time the object is seen.
    ///
    /// # Errors
    ///
    /// Propagates errors from `create`; nothing is attached in that case.
    pub fn subscriber_ref_for<T, F>(&mut self, object: &Rc<T>, create: F) -> Result<SubscriberRef>
    where
        T: Any,
        F: FnOnce(&mut Self) -> Result<SubscriberRef>,
    {
        if let Some(existing) = self.subscriber_identities.get(object) {
            return Ok(existing);
        }
        let reference = create(self)?;
        self.subscriber_identities.attach(object, reference);
        Ok(reference)
    }

    /// Returns the live object behind an observable ref, or `None` once it
    /// has been dropped (or if it was never attached).
    #[must_use]
    pub fn deref_observable<T: Any>(&self, reference: ObservableRef) -> Option<Rc<T>> {
        self.observable_identities.upgrade(reference)
    }

    /// Returns the live object behind a subscriber ref, or `None` once it has
    /// been dropped (or if it was never attached).
    #[must_use]
    pub fn deref_subscriber<T: Any>(&self, reference: SubscriberRef) -> Option<Rc<T>> {
        self.subscriber_identities.upgrade(reference)
    }

    /// Returns true if the live object behind `target` is still reachable.
    #[must_use]
    pub fn is_live(&self, target: TargetRef) -> bool {
        match target {
            TargetRef::Observable(o) => self.observable_identities.is_live(o),
            TargetRef::Subscriber(s) => self.subscriber_identities.is_live(s),
        }
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Records an event on an observable.
    ///
    /// # Errors
    ///
    /// Returns an error if any ref was not minted by this recorder.
    pub fn observable_event_ref(
        &mut self,
        declaration: DeclarationRef,
        observable: ObservableRef,
        preceding: Option<EventRef>,
    ) -> Result<EventRef> {
        self.check(observable)?;
        self.record_event(declaration, TargetRef::Observable(observable), preceding)
    }

    /// Records an event on a subscriber.
    ///
    /// # Errors
    ///
    /// Returns an error if any ref was not minted by this recorder.
    pub fn subscriber_event_ref(
        &mut self,
        declaration: DeclarationRef,
        subscriber: SubscriberRef,
        preceding: Option<EventRef>,
    ) -> Result<EventRef> {
        self.check(subscriber)?;
        self.record_event(declaration, TargetRef::Subscriber(subscriber), preceding)
    }

    fn record_event(
        &mut self,
        declaration: DeclarationRef,
        target: TargetRef,
        preceding: Option<EventRef>,
    ) -> Result<EventRef> {
        let event_type = self
            .log
            .declaration(declaration)
            .map(|d| EventType::from_name(&d.name))
            .ok_or_else(|| violation(Error::unknown_ref(declaration.kind(), declaration.id())))?;
        if let Some(preceding) = preceding {
            self.check(preceding)?;
        }

        let task = self.event_task()?;
        let time = mint(&mut self.allocator)?;
        tracing::trace!(%time, %event_type, %target, %task, ?preceding, "recorded event");
        self.log.push_event(Event {
            time,
            event_type,
            declaration,
            target,
            task,
            preceding,
            succeeding: Vec::new(),
        });
        Ok(time)
    }

    // -------------------------------------------------------------------------
    // Tasks
    // -------------------------------------------------------------------------

    /// Starts a new task. Events recorded until the matching
    /// [`end_task`](Self::end_task) are tagged with it.
    ///
    /// # Errors
    ///
    /// Returns an error if task ids are exhausted.
    pub fn start_task(&mut self, name: impl Into<String>) -> Result<TaskRef> {
        let id = self.new_task(name.into())?;
        self.task_stack.push(id);
        Ok(id)
    }

    /// Ends the innermost task and returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if no task is active; the stack is left unchanged.
    pub fn end_task(&mut self) -> Result<TaskRef> {
        self.task_stack
            .pop()
            .ok_or_else(|| violation(Error::unbalanced_task()))
    }

    /// Returns the innermost active task.
    #[must_use]
    pub fn current_task(&self) -> Option<TaskRef> {
        self.task_stack.last().copied()
    }

    /// Returns the number of nested active tasks.
    #[must_use]
    pub fn task_depth(&self) -> usize {
        self.task_stack.len()
    }

    fn new_task(&mut self, name: String) -> Result<TaskRef> {
        let id = mint(&mut self.allocator)?;
        tracing::debug!(%id, %name, "started task");
        self.log.push_task(Task { id, name });
        Ok(id)
    }

    /// The active task, or the ambient task when none is active.
    fn event_task(&mut self) -> Result<TaskRef> {
        if let Some(task) = self.current_task() {
            return Ok(task);
        }
        if let Some(ambient) = self.ambient_task {
            return Ok(ambient);
        }
        let ambient = self.new_task(self.config.ambient_task_name.clone())?;
        self.ambient_task = Some(ambient);
        Ok(ambient)
    }

    // -------------------------------------------------------------------------
    // Trace context
    // -------------------------------------------------------------------------

    /// Marks `event` as currently executing. Hooks use this so that events
    /// recorded while it runs can name it as their predecessor.
    ///
    /// # Errors
    ///
    /// Returns an error if the event was not minted by this recorder.
    pub fn enter_event(&mut self, event: EventRef) -> Result<()> {
        self.check(event)?;
        self.trace_stack.push(event);
        Ok(())
    }

    /// Leaves the innermost executing event and returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if no event is executing.
    pub fn leave_event(&mut self) -> Result<EventRef> {
        self.trace_stack
            .pop()
            .ok_or_else(|| violation(Error::unbalanced_trace()))
    }

    /// Returns the innermost executing event, if any.
    #[must_use]
    pub fn current_event(&self) -> Option<EventRef> {
        self.trace_stack.last().copied()
    }

    // -------------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------------

    /// Looks up an observable by raw id.
    #[must_use]
    pub fn observable(&self, id: u32) -> Option<&Observable> {
        self.log.observable(Ref::from_raw(id))
    }

    /// Looks up a subscriber by raw id.
    #[must_use]
    pub fn subscriber(&self, id: u32) -> Option<&Subscriber> {
        self.log.subscriber(Ref::from_raw(id))
    }

    /// Looks up an event by raw time.
    #[must_use]
    pub fn event(&self, time: u32) -> Option<&Event> {
        self.log.event(Ref::from_raw(time))
    }

    /// Looks up a target view.
    #[must_use]
    pub fn target(&self, target: TargetRef) -> Option<TargetView<'_>> {
        self.log.target(target)
    }

    /// Returns node counts.
    #[must_use]
    pub fn stats(&self) -> RecorderStats {
        RecorderStats::collect(
            &self.log,
            self.observable_identities.live_count(),
            self.subscriber_identities.live_count(),
        )
    }

    /// Drops identity entries for objects that have been dropped.
    pub fn sweep(&mut self) -> usize {
        self.observable_identities.sweep() + self.subscriber_identities.sweep()
    }

    fn check<K: Kind>(&self, reference: Ref<K>) -> Result<()> {
        if self.allocator.contains(reference) {
            Ok(())
        } else {
            Err(violation(Error::unknown_ref(reference.kind(), reference.id())))
        }
    }
}
