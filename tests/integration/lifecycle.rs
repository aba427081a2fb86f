//! A small instrumented pipeline driven through its whole lifecycle
//!
//! `source` emits into `mapped`, which emits into a sink subscriber. Hooks
//! resolve live objects through the identity registry, use the trace context
//! to link causes, and open a task per scheduling turn.

use std::rc::Rc;

use causeway::foundation::{DeclarationRef, EventRef, Result, SubscriberRef, TargetRef};
use causeway::insights::{Direction, InsightsConfig, InsightsServer, Relations, collect_related};
use causeway::recorder::Recorder;

use crate::init_logging;

/// Stand-in for a live subscriber object.
struct Sink {
    name: &'static str,
}

struct Declarations {
    interval: DeclarationRef,
    map: DeclarationRef,
    subscribe: DeclarationRef,
    next: DeclarationRef,
    complete: DeclarationRef,
}

impl Declarations {
    fn new(recorder: &mut Recorder) -> Self {
        Self {
            interval: recorder.declaration_ref("interval").unwrap(),
            map: recorder.declaration_ref("map").unwrap(),
            subscribe: recorder.declaration_ref("subscribe").unwrap(),
            next: recorder.declaration_ref("next").unwrap(),
            complete: recorder.declaration_ref("complete").unwrap(),
        }
    }
}

/// Records an event caused by whatever is currently executing, runs `body`
/// with that event as the trace context, and returns the event.
fn emit(
    recorder: &mut Recorder,
    declaration: DeclarationRef,
    subscriber: SubscriberRef,
    body: impl FnOnce(&mut Recorder) -> Result<()>,
) -> Result<EventRef> {
    let cause = recorder.current_event();
    let event = recorder.subscriber_event_ref(declaration, subscriber, cause)?;
    recorder.enter_event(event)?;
    body(recorder)?;
    recorder.leave_event()
}

struct Pipeline {
    source: SubscriberRef,
    mapped: SubscriberRef,
    sink: SubscriberRef,
}

fn build(recorder: &mut Recorder, sink_object: &Rc<Sink>) -> Result<(Declarations, Pipeline)> {
    let d = Declarations::new(recorder);
    let interval = recorder.observable_ref(d.interval, None)?;
    let mapped_observable = recorder.observable_ref(d.map, Some(interval))?;

    let sink =
        recorder.subscriber_ref_for(sink_object, |r| r.subscriber_ref(mapped_observable, None))?;
    let mapped = recorder.subscriber_ref(interval, Some(mapped_observable))?;
    let source = recorder.subscriber_ref(interval, None)?;

    // Subscribing the sink subscribes upstream.
    emit(recorder, d.subscribe, sink, |r| {
        emit(r, d.subscribe, mapped, |r| {
            emit(r, d.subscribe, source, |_| Ok(())).map(drop)
        })
        .map(drop)
    })?;

    Ok((d, Pipeline { source, mapped, sink }))
}

/// Runs one interval turn and returns the sink's `next` event.
fn tick(recorder: &mut Recorder, d: &Declarations, p: &Pipeline) -> Result<Option<EventRef>> {
    recorder.start_task("setInterval").unwrap();
    let mut last = None;
    emit(recorder, d.next, p.source, |r| {
        emit(r, d.next, p.mapped, |r| {
            last = Some(emit(r, d.next, p.sink, |_| Ok(()))?);
            Ok(())
        })
        .map(drop)
    })?;
    recorder.end_task()?;
    Ok(last)
}

#[test]
fn sink_state_spans_the_pipeline() -> Result<()> {
    init_logging();
    let mut recorder = Recorder::default();
    let sink_object = Rc::new(Sink { name: "sink" });
    let (d, pipeline) = build(&mut recorder, &sink_object)?;
    let first = tick(&mut recorder, &d, &pipeline)?.unwrap();
    tick(&mut recorder, &d, &pipeline)?;

    let mut server = InsightsServer::new(recorder, InsightsConfig::default());
    server.inspect(pipeline.sink);
    let state = server
        .get_subscriber_state(pipeline.sink.id())
        .unwrap();

    // Values flow source -> mapped -> sink and subscriptions flow the other
    // way, so every other subscriber is upstream of the sink.
    let sources: Vec<u32> = state
        .hierarchy
        .sources
        .children
        .iter()
        .map(|c| c.target.id)
        .collect();
    assert_eq!(sources, vec![pipeline.mapped.id()]);
    assert_eq!(
        state.hierarchy.sources.children[0].children[0].target.id,
        pipeline.source.id()
    );
    assert!(state.hierarchy.destinations.children.is_empty());
    assert_eq!(state.relations.subscribers.len(), 3);
    assert_eq!(state.relations.tasks.len(), 3);

    let trace = server.get_trace(Some(first.id()));
    let targets: Vec<u32> = trace.iter().map(|f| f.target.id).collect();
    assert_eq!(
        targets,
        vec![pipeline.sink.id(), pipeline.mapped.id(), pipeline.source.id()]
    );
    assert!(trace.iter().all(|f| f.task.name == "setInterval"));

    assert_eq!(
        server
            .recorder()
            .deref_subscriber::<Sink>(pipeline.sink)
            .map(|s| s.name),
        Some("sink")
    );
    Ok(())
}

#[test]
fn dropped_sink_stays_queryable() -> Result<()> {
    init_logging();
    let mut recorder = Recorder::default();
    let sink_object = Rc::new(Sink { name: "sink" });
    let (d, pipeline) = build(&mut recorder, &sink_object)?;
    let last = tick(&mut recorder, &d, &pipeline)?.unwrap();
    recorder.subscriber_event_ref(d.complete, pipeline.sink, Some(last))?;
    drop(sink_object);

    let target = TargetRef::Subscriber(pipeline.sink);
    assert!(!recorder.is_live(target));
    assert!(recorder.deref_subscriber::<Sink>(pipeline.sink).is_none());

    let mut server = InsightsServer::new(recorder, InsightsConfig::default());
    server.inspect(pipeline.sink);
    let state = server
        .get_subscriber_state(pipeline.sink.id())
        .unwrap();
    let row = state
        .relations
        .subscribers
        .get(&pipeline.sink.id())
        .unwrap();
    assert!(row.end_time.is_some());
    assert_eq!(server.get_stats().live_subscribers, 0);

    assert!(server.release_target(target.to_id()));
    assert!(server.get_subscriber_state(pipeline.sink.id()).is_none());
    assert!(server.is_recorded(target.to_id()));
    Ok(())
}

#[test]
fn depth_cap_truncates_long_pipelines() -> Result<()> {
    init_logging();
    let mut recorder = Recorder::default();
    let sink_object = Rc::new(Sink { name: "sink" });
    let (_, pipeline) = build(&mut recorder, &sink_object)?;

    let config = InsightsConfig::new().with_max_depth(1);
    let log = recorder.log();
    let view = log.target(TargetRef::Subscriber(pipeline.sink)).unwrap();
    let node = collect_related(log, view, Direction::Sources, &config, &mut Relations::new());
    assert_eq!(node.depth(), 1);
    assert!(!node.children[0].expanded);
    Ok(())
}
