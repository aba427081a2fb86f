//! Integration tests for deferred values and source locations

use causeway_foundation::{Deferred, Location, Locations};

#[test]
fn pending_reads_as_absent_until_resolved() {
    let (locations, resolver) = Deferred::pending();
    let shared = locations.clone();

    assert!(locations.is_pending());
    assert_eq!(shared.get(), None);

    let resolved = Locations::generated(Location::new("bundle.js", 120, 8))
        .with_original(Location::new("app.ts", 14, 2));
    assert!(resolver.resolve(resolved));

    assert!(!shared.is_pending());
    assert_eq!(
        shared.get().and_then(Locations::preferred),
        Some(&Location::new("app.ts", 14, 2))
    );
}

#[test]
fn absent_reads_as_none() {
    let absent: Deferred<Locations> = Deferred::absent();
    assert_eq!(absent.get(), None);
    assert_eq!(Deferred::<Locations>::default().get(), None);
}

#[test]
fn locations_serialize_camel_case() {
    let locations = Locations::generated(Location::new("bundle.js", 1, 2));
    let json = serde_json::to_value(&locations).unwrap();
    assert_eq!(json["generatedLocation"]["file"], "bundle.js");
    assert!(json.get("originalLocation").is_none());
}
