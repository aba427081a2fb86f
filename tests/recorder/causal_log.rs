//! Integration tests for the causal log
//!
//! Tests total ordering and the in-tree shape of arbitrary recordings.

use causeway_foundation::{EventRef, EventType};
use causeway_recorder::Recorder;
use proptest::prelude::*;

const NAMES: [&str; 5] = ["subscribe", "next", "error", "complete", "unsubscribe"];

/// Records one event per `(name, target, predecessor)` step. Each index is
/// reduced modulo what exists at that point, and `None` predecessors start a
/// new causal tree.
fn record(steps: &[(usize, usize, Option<usize>)]) -> (Recorder, Vec<EventRef>) {
    let mut recorder = Recorder::default();
    let of = recorder.declaration_ref("of").unwrap();
    let declarations: Vec<_> = NAMES.iter().map(|n| recorder.declaration_ref(*n).unwrap()).collect();
    let observable = recorder.observable_ref(of, None).unwrap();
    let subscribers: Vec<_> = (0..4)
        .map(|_| recorder.subscriber_ref(observable, None).unwrap())
        .collect();

    let mut events = Vec::new();
    for &(name, target, preceding) in steps {
        let preceding = preceding
            .filter(|_| !events.is_empty())
            .map(|p| events[p % events.len()]);
        let event = recorder
            .subscriber_event_ref(
                declarations[name % declarations.len()],
                subscribers[target % subscribers.len()],
                preceding,
            )
            .unwrap();
        events.push(event);
    }

    (recorder, events)
}

fn recording() -> impl Strategy<Value = Vec<(usize, usize, Option<usize>)>> {
    prop::collection::vec((0..5usize, 0..4usize, prop::option::of(0..64usize)), 1..64)
}

proptest! {
    #[test]
    fn times_strictly_increase(steps in recording()) {
        let (_, events) = record(&steps);
        for pair in events.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn links_form_an_in_tree(steps in recording()) {
        let (recorder, _) = record(&steps);
        let log = recorder.log();

        for event in log.events() {
            if let Some(parent) = event.preceding {
                prop_assert!(parent < event.time);
                let parent = log.event(parent).unwrap();
                prop_assert!(parent.succeeding.contains(&event.time));
            }
            for &child in &event.succeeding {
                prop_assert_eq!(log.event(child).unwrap().preceding, Some(event.time));
            }
        }
    }

    #[test]
    fn every_event_is_listed_on_its_target(steps in recording()) {
        let (recorder, events) = record(&steps);
        let log = recorder.log();

        let listed: usize = log
            .events()
            .iter()
            .map(|e| e.target)
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .map(|t| log.target(t).unwrap().events().len())
            .sum();
        prop_assert_eq!(listed, events.len());
    }
}

#[test]
fn event_type_follows_declaration_name() {
    let (recorder, events) = record(&[(0, 0, None), (1, 0, Some(0)), (3, 0, Some(1))]);
    let types: Vec<EventType> = events
        .iter()
        .map(|e| recorder.log().event(*e).unwrap().event_type)
        .collect();
    assert_eq!(
        types,
        vec![EventType::Subscribe, EventType::Next, EventType::Complete]
    );
}

#[test]
fn unknown_predecessor_is_rejected_without_mutation() {
    let mut recorder = Recorder::default();
    let of = recorder.declaration_ref("of").unwrap();
    let next = recorder.declaration_ref("next").unwrap();
    let observable = recorder.observable_ref(of, None).unwrap();

    let result = recorder.observable_event_ref(next, observable, Some(EventRef::from_raw(5)));
    assert!(result.is_err());
    assert_eq!(recorder.stats().events, 0);
}

#[test]
fn stats_count_events_by_type() {
    let (recorder, _) = record(&[(1, 0, None), (1, 1, Some(0)), (3, 1, Some(1))]);
    let stats = recorder.stats();
    assert_eq!(stats.events, 3);
    assert_eq!(stats.events_by_type.get(&EventType::Next), Some(&2));
    assert_eq!(stats.events_by_type.get(&EventType::Complete), Some(&1));
    assert_eq!(stats.subscribers, 4);
}
