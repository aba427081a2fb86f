//! Integration tests for typed refs
//!
//! Tests ref identity, display, and the untyped boundary form.

use causeway_foundation::{
    EventRef, ObservableRef, RefKind, SubscriberRef, TargetId, TargetRef, TargetType,
};

// =============================================================================
// Typed Refs
// =============================================================================

#[test]
fn ref_carries_its_kind() {
    assert_eq!(ObservableRef::from_raw(3).kind(), RefKind::Observable);
    assert_eq!(SubscriberRef::from_raw(3).kind(), RefKind::Subscriber);
    assert_eq!(EventRef::from_raw(3).kind(), RefKind::Event);
}

#[test]
fn ref_display_names_kind_and_id() {
    assert_eq!(SubscriberRef::from_raw(7).to_string(), "subscriber#7");
    assert_eq!(format!("{:?}", EventRef::from_raw(0)), "event#0");
}

#[test]
fn ref_kinds_are_enumerated_once() {
    let indices: Vec<usize> = RefKind::ALL.iter().map(|k| k.index()).collect();
    assert_eq!(indices, (0..RefKind::ALL.len()).collect::<Vec<_>>());
}

// =============================================================================
// Targets
// =============================================================================

#[test]
fn target_ref_converts_from_typed_refs() {
    let observable: TargetRef = ObservableRef::from_raw(1).into();
    let subscriber: TargetRef = SubscriberRef::from_raw(1).into();

    assert_eq!(observable.target_type(), TargetType::Observable);
    assert_eq!(subscriber.target_type(), TargetType::Subscriber);
    assert_ne!(observable, subscriber);
}

#[test]
fn target_id_round_trips_to_ref() {
    let target = TargetRef::Subscriber(SubscriberRef::from_raw(12));
    let id: TargetId = target.into();
    assert_eq!(id.id, 12);
    assert_eq!(id.to_ref(), target);
}

#[test]
fn target_id_wire_shape() {
    let id = TargetRef::Observable(ObservableRef::from_raw(4)).to_id();
    let json = serde_json::to_value(id).unwrap();
    assert_eq!(json, serde_json::json!({ "type": "observable", "id": 4 }));

    let back: TargetId = serde_json::from_value(json).unwrap();
    assert_eq!(back, id);
}
