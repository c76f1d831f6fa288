//! Quoting behavior: destination edits, collaborator failures, and
//! superseded in-flight requests.

use dispatch_core::geo::Coordinate;
use dispatch_core::routing::RouteServiceResource;
use dispatch_core::session::RidePhase;
use dispatch_core::test_helpers::{
    recording_notifier, test_controller, FixedRouteService, NoticeLevel, TEST_DESTINATION,
    TEST_ORIGIN,
};

#[test]
fn destination_pick_produces_a_quote() {
    let mut controller = test_controller(2500.0);
    controller.set_destination(TEST_DESTINATION);

    assert!(controller.run_until(|s| s.phase == RidePhase::Quoted, 10));
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.origin, Some(TEST_ORIGIN));
    assert_eq!(snapshot.destination, Some(TEST_DESTINATION));

    let quote = snapshot.quote.expect("quote");
    assert_eq!(quote.price_estimate, 7.5);
    assert_eq!(quote.distance_meters, 2500.0);
    assert_eq!(quote.path.first(), Some(&TEST_ORIGIN));
    assert_eq!(quote.path.last(), Some(&TEST_DESTINATION));
}

#[test]
fn minimum_fare_applies_to_short_hops() {
    let mut controller = test_controller(400.0);
    controller.set_destination(TEST_DESTINATION);

    assert!(controller.run_until(|s| s.phase == RidePhase::Quoted, 10));
    let quote = controller.snapshot().quote.expect("quote");
    assert_eq!(quote.price_estimate, 3.0);
}

#[test]
fn unroutable_destination_reverts_to_idle_with_a_notification() {
    let mut controller = test_controller(2500.0);
    let messages = recording_notifier(&mut controller);
    controller
        .world
        .insert_resource(RouteServiceResource(Box::new(
            FixedRouteService::unavailable(),
        )));

    controller.set_destination(TEST_DESTINATION);
    assert_eq!(controller.snapshot().phase, RidePhase::Quoting);

    controller.run_until_settled(10);
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, RidePhase::Idle);
    assert!(snapshot.quote.is_none());
    // The destination stays visible so the passenger can adjust it.
    assert_eq!(snapshot.destination, Some(TEST_DESTINATION));

    let messages = messages.lock().expect("messages");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, NoticeLevel::Error);
}

#[test]
fn second_destination_pick_supersedes_the_first_quote_request() {
    let mut controller = test_controller(2500.0);
    let first = Coordinate::new(-7.4700, -38.9650);
    controller.set_destination(first);
    controller.set_destination(TEST_DESTINATION);

    // Both responses are queued; only the one for the latest pick lands.
    controller.run_until_settled(10);
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, RidePhase::Quoted);
    assert_eq!(snapshot.destination, Some(TEST_DESTINATION));
    let quote = snapshot.quote.expect("quote");
    assert_eq!(quote.path.last(), Some(&TEST_DESTINATION));
}

#[test]
fn denied_device_read_keeps_the_origin_and_notifies() {
    let mut controller = test_controller(2500.0);
    let messages = recording_notifier(&mut controller);
    controller
        .world
        .insert_resource(dispatch_core::location::LocationSourceResource(Box::new(
            dispatch_core::location::SimulatedLocationSource::denied(),
        )));

    controller.use_device_location();

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, RidePhase::Idle);
    assert_eq!(snapshot.origin, Some(TEST_ORIGIN));
    let messages = messages.lock().expect("messages");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, NoticeLevel::Error);
}

#[test]
fn destination_without_an_origin_does_not_quote() {
    let mut controller = test_controller(2500.0);
    controller
        .world
        .resource_mut::<dispatch_core::session::RideSession>()
        .origin = None;

    controller.set_destination(TEST_DESTINATION);
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, RidePhase::Idle);
    assert!(snapshot.quote.is_none());
    assert_eq!(snapshot.destination, Some(TEST_DESTINATION));
}
