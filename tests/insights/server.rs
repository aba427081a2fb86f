//! Integration tests for the request surface
//!
//! Tests request dispatch and byte-level round trips for both codecs.

use causeway_foundation::{SubscriberRef, TargetId, TargetType};
use causeway_insights::{Codec, InsightsConfig, InsightsServer, Payload, Request, Response};
use causeway_recorder::Recorder;
use serde_json::{Value, json};

fn server(codec: Codec) -> (InsightsServer, SubscriberRef) {
    let mut recorder = Recorder::default();
    let interval = recorder.declaration_ref("interval").unwrap();
    let subscribe = recorder.declaration_ref("subscribe").unwrap();
    let next = recorder.declaration_ref("next").unwrap();
    let observable = recorder.observable_ref(interval, None).unwrap();
    let subscriber = recorder.subscriber_ref(observable, None).unwrap();
    recorder.tag_target(subscriber, "ticker").unwrap();
    let s = recorder
        .subscriber_event_ref(subscribe, subscriber, None)
        .unwrap();
    recorder
        .subscriber_event_ref(next, subscriber, Some(s))
        .unwrap();

    let mut server = InsightsServer::new(recorder, InsightsConfig::new().with_codec(codec));
    server.inspect(subscriber);
    (server, subscriber)
}

fn call(server: &mut InsightsServer, codec: Codec, request: &Request) -> Value {
    let bytes = codec.encode(request).unwrap();
    codec.decode(&server.handle_bytes(&bytes)).unwrap()
}

#[test]
fn every_request_succeeds_over_both_codecs() {
    for codec in [Codec::Json, Codec::MessagePack] {
        let (mut server, subscriber) = server(codec);
        let target = TargetId {
            target_type: TargetType::Subscriber,
            id: subscriber.id(),
        };

        let trace = call(&mut server, codec, &Request::GetTrace(Some(1)));
        assert_eq!(trace["success"].as_array().map(Vec::len), Some(2));

        let state = call(
            &mut server,
            codec,
            &Request::GetSubscriberState(subscriber.id()),
        );
        assert_eq!(state["success"]["ref"]["name"], "interval");
        assert_eq!(
            state["success"]["hierarchy"]["sources"]["target"],
            json!({ "type": "subscriber", "id": subscriber.id() })
        );
        let row = &state["success"]["relations"]["subscribers"][subscriber.id().to_string()];
        assert_eq!(row["name"], "interval");
        assert_eq!(row["tags"], json!(["ticker"]));
        assert_eq!(state["success"]["relations"]["events"]["1"]["precedingEvent"], 0);

        let stats = call(&mut server, codec, &Request::GetStats);
        assert_eq!(stats["success"]["events"], 2);
        assert_eq!(stats["success"]["eventsByType"]["next"], 1);

        let targets = call(&mut server, codec, &Request::GetTargets);
        assert_eq!(targets["success"][0]["type"], "subscriber");

        let released = call(&mut server, codec, &Request::ReleaseTarget(target));
        assert_eq!(released["success"], true);

        let gone = call(
            &mut server,
            codec,
            &Request::GetSubscriberState(subscriber.id()),
        );
        assert_eq!(gone["success"], Value::Null);
    }
}

#[test]
fn inspect_queues_notifications() {
    let (mut server, _) = server(Codec::Json);
    let notifications = server.drain_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].name, "interval");
    assert!(server.drain_notifications().is_empty());
}

#[test]
fn garbage_bytes_answer_with_failure() {
    for codec in [Codec::Json, Codec::MessagePack] {
        let (mut server, _) = server(codec);
        let response: Value = codec.decode(&server.handle_bytes(&[0xc1, 0x00])).unwrap();
        assert!(response["failure"].is_string());
    }
}

#[test]
fn handle_never_fails_for_unknown_ids() {
    let (mut server, _) = server(Codec::Json);
    for request in [
        Request::GetTrace(Some(999)),
        Request::GetObservableState(999),
        Request::GetSubscriberState(999),
        Request::ReleaseTarget(TargetId {
            target_type: TargetType::Observable,
            id: 999,
        }),
    ] {
        assert!(matches!(server.handle(request), Response::Success(_)));
    }
    assert_eq!(
        server.handle(Request::GetObservableState(999)),
        Response::Success(Payload::State(None))
    );
}
