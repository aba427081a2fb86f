//! Recording-then-querying scenarios with fixed expected answers

use causeway::foundation::{EventType, TargetType};
use causeway::insights::{InsightsConfig, InsightsServer, Payload, Request, Response};
use causeway::recorder::Recorder;

use crate::init_logging;

// =============================================================================
// Round Trip
// =============================================================================

#[test]
fn map_subscriber_round_trip() {
    init_logging();
    let mut recorder = Recorder::default();
    let d1 = recorder.declaration_ref("map").unwrap();
    let subscribe = recorder.declaration_ref("subscribe").unwrap();
    let next = recorder.declaration_ref("next").unwrap();
    let o1 = recorder.observable_ref(d1, None).unwrap();
    let s1 = recorder.subscriber_ref(o1, None).unwrap();

    let e0 = recorder.subscriber_event_ref(subscribe, s1, None).unwrap();
    let e1 = recorder.subscriber_event_ref(next, s1, None).unwrap();
    assert_eq!((e0.id(), e1.id()), (0, 1));

    let mut server = InsightsServer::new(recorder, InsightsConfig::default());
    server.inspect(s1).unwrap();

    let state = server.get_subscriber_state(s1.id()).unwrap();
    assert_eq!(state.hierarchy.sources.target.id, s1.id());
    assert_eq!(
        state.hierarchy.sources.target.target_type,
        TargetType::Subscriber
    );
    assert_eq!(state.hierarchy.destinations.target.id, s1.id());
    assert!(state.relations.events.contains_key(&0));
    assert!(state.relations.events.contains_key(&1));
    assert_eq!(
        state.relations.events.get(&0).map(|e| e.event_type),
        Some(EventType::Subscribe)
    );

    let trace = server.get_trace(Some(1));
    assert_eq!(trace.len(), 1);
    assert_eq!(trace[0].event.id, 1);
    assert_eq!(trace[0].event.event_type, EventType::Next);
    assert_eq!(trace[0].target.id, s1.id());
}

// =============================================================================
// Not Found
// =============================================================================

#[test]
fn never_tracked_observable_is_not_found() {
    init_logging();
    let mut server = InsightsServer::default();
    assert!(server.get_observable_state(999).is_none());
    assert_eq!(
        server.handle(Request::GetObservableState(999)),
        Response::Success(Payload::State(None))
    );
}

#[test]
fn recorded_but_uninspected_target_is_not_found() {
    init_logging();
    let mut recorder = Recorder::default();
    let of = recorder.declaration_ref("of").unwrap();
    let observable = recorder.observable_ref(of, None).unwrap();
    let server = InsightsServer::new(recorder, InsightsConfig::default());

    assert!(server.get_observable_state(observable.id()).is_none());
}

#[test]
fn json_boundary_round_trip() {
    init_logging();
    let mut recorder = Recorder::default();
    let d1 = recorder.declaration_ref("map").unwrap();
    let next = recorder.declaration_ref("next").unwrap();
    let o1 = recorder.observable_ref(d1, None).unwrap();
    recorder.observable_event_ref(next, o1, None).unwrap();
    let mut server = InsightsServer::new(recorder, InsightsConfig::default());
    server.inspect(o1);

    let bytes = server.handle_bytes(br#"{"func":"getObservableState","args":0}"#);
    let response: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let state = &response["success"];
    assert_eq!(state["ref"], serde_json::json!({ "id": 0, "type": "observable", "name": "map" }));
    assert_eq!(state["relations"]["events"]["0"]["eventType"], "next");
    assert_eq!(state["relations"]["observables"]["0"]["startTime"], 0);
    assert_eq!(state["relations"]["observables"]["0"]["endTime"], serde_json::Value::Null);

    let bytes = server.handle_bytes(br#"{"func":"getObservableState","args":999}"#);
    let response: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(response, serde_json::json!({ "success": null }));
}
