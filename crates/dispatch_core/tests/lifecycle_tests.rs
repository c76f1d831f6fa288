//! Ride lifecycle: driver matching, the pickup hand-off, and ending rides.

use dispatch_core::drivers::DriverId;
use dispatch_core::error::RideError;
use dispatch_core::session::RidePhase;
use dispatch_core::test_helpers::{
    recording_notifier, test_controller, NoticeLevel, TEST_DESTINATION, TEST_ORIGIN,
};

fn quoted_controller() -> dispatch_core::controller::RideSessionController {
    let mut controller = test_controller(2500.0);
    controller.set_destination(TEST_DESTINATION);
    assert!(controller.run_until(|s| s.phase == RidePhase::Quoted, 10));
    controller
}

#[test]
fn confirm_matches_the_nearest_driver() {
    let mut controller = quoted_controller();
    let roster = controller.driver_roster();

    controller.confirm_ride(None).expect("confirm");
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, RidePhase::Confirmed);
    assert_eq!(snapshot.matched_driver, Some(DriverId(1)));

    let start = roster
        .iter()
        .find(|(id, _)| *id == DriverId(1))
        .map(|(_, position)| *position);
    assert_eq!(snapshot.vehicle_position, start);
}

#[test]
fn confirm_honors_an_explicit_driver_choice() {
    let mut controller = quoted_controller();
    controller.confirm_ride(Some(DriverId(2))).expect("confirm");
    assert_eq!(controller.snapshot().matched_driver, Some(DriverId(2)));
}

#[test]
fn confirm_rejects_an_unknown_driver() {
    let mut controller = quoted_controller();
    let error = controller
        .confirm_ride(Some(DriverId(7)))
        .expect_err("unknown driver");
    assert_eq!(error, RideError::InvalidDriver(7));
    // The quote is still standing.
    assert_eq!(controller.snapshot().phase, RidePhase::Quoted);
}

#[test]
fn pickup_arrival_clears_the_trail_and_restarts_progress() {
    let mut controller = quoted_controller();
    controller.confirm_ride(None).expect("confirm");

    assert!(controller.run_until(|s| s.phase == RidePhase::EnRouteToPickup, 20));
    assert!(controller.run_until(|s| s.phase == RidePhase::PassengerPickedUp, 5000));

    let snapshot = controller.snapshot();
    assert!(snapshot.traveled_trail.is_empty());
    assert_eq!(snapshot.progress_percent, 0.0);
    assert_eq!(snapshot.matched_driver, Some(DriverId(1)));
}

#[test]
fn end_ride_mid_leg_returns_to_idle_and_ignores_leftover_ticks() {
    let mut controller = quoted_controller();
    controller.confirm_ride(None).expect("confirm");
    assert!(controller.run_until(|s| s.phase == RidePhase::EnRouteToPickup, 20));

    // A few ticks in, the passenger bails out.
    for _ in 0..5 {
        controller.step();
    }
    assert!(!controller.snapshot().traveled_trail.is_empty());

    controller.end_ride();
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, RidePhase::Idle);
    assert!(snapshot.destination.is_none());
    assert!(snapshot.matched_driver.is_none());
    assert!(snapshot.traveled_trail.is_empty());
    assert_eq!(snapshot.origin, Some(TEST_ORIGIN));

    // Ticks still queued for the cancelled run change nothing.
    controller.run_until_settled(100);
    assert_eq!(controller.snapshot().phase, RidePhase::Idle);
}

#[test]
fn end_ride_notifications_cover_the_whole_trip() {
    let mut controller = quoted_controller();
    let messages = recording_notifier(&mut controller);
    controller.confirm_ride(None).expect("confirm");
    assert!(controller.run_until(|s| s.phase == RidePhase::Completed, 5000));

    let messages = messages.lock().expect("messages");
    let levels: Vec<NoticeLevel> = messages.iter().map(|(level, _)| *level).collect();
    assert_eq!(
        levels,
        vec![NoticeLevel::Info, NoticeLevel::Success, NoticeLevel::Success]
    );
}

#[test]
fn completed_ride_locks_edits_until_ended() {
    let mut controller = quoted_controller();
    controller.confirm_ride(None).expect("confirm");
    assert!(controller.run_until(|s| s.phase == RidePhase::Completed, 5000));

    controller.set_destination(TEST_ORIGIN);
    assert_eq!(controller.snapshot().phase, RidePhase::Completed);
    assert_eq!(controller.snapshot().destination, Some(TEST_DESTINATION));

    controller.end_ride();
    assert_eq!(controller.snapshot().phase, RidePhase::Idle);
    assert!(controller.snapshot().destination.is_none());
}
