//! One full ride pumped event by event: quote, confirm, pickup leg,
//! drop-off leg, completion.

use dispatch_core::drivers::DriverId;
use dispatch_core::session::RidePhase;
use dispatch_core::test_helpers::{test_controller, TEST_DESTINATION, TEST_ORIGIN};

#[test]
fn full_ride_runs_two_legs_with_single_transitions() {
    let mut controller = test_controller(2500.0);
    controller.set_destination(TEST_DESTINATION);
    assert!(controller.run_until(|s| s.phase == RidePhase::Quoted, 10));
    assert_eq!(
        controller.snapshot().quote.as_ref().map(|q| q.price_estimate),
        Some(7.5)
    );

    controller.confirm_ride(None).expect("confirm");
    assert_eq!(controller.snapshot().matched_driver, Some(DriverId(1)));

    let mut previous = RidePhase::Confirmed;
    let mut pickups = 0;
    let mut completions = 0;
    let mut last_progress = 0.0;
    for _ in 0..10_000 {
        if controller.snapshot().phase == RidePhase::Completed {
            break;
        }
        let stepped = controller.step_with_hook(|snapshot, _event| {
            if snapshot.phase == RidePhase::PassengerPickedUp && previous != snapshot.phase {
                pickups += 1;
            }
            if snapshot.phase == RidePhase::Completed && previous != snapshot.phase {
                completions += 1;
            }
            // Progress never moves backward within a leg; it restarts only
            // on the phase boundary.
            if snapshot.phase == previous {
                assert!(
                    snapshot.progress_percent >= last_progress,
                    "progress went backward"
                );
            }
            previous = snapshot.phase;
            last_progress = snapshot.progress_percent;
        });
        assert!(stepped.is_some(), "queue drained before completion");
    }

    assert_eq!(pickups, 1);
    assert_eq!(completions, 1);

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, RidePhase::Completed);
    assert_eq!(snapshot.progress_percent, 100.0);
    assert!(snapshot.quote.is_none());
    assert!(snapshot.matched_driver.is_none());

    let position = snapshot.vehicle_position.expect("vehicle position");
    assert!((position.latitude - TEST_DESTINATION.latitude).abs() < 2e-5);
    assert!((position.longitude - TEST_DESTINATION.longitude).abs() < 2e-5);

    // Nothing left but silence: stepping further changes no state.
    controller.run_until_settled(10);
    assert_eq!(controller.snapshot().phase, RidePhase::Completed);
}

#[test]
fn a_second_ride_can_follow_a_completed_one() {
    let mut controller = test_controller(2500.0);
    controller.set_destination(TEST_DESTINATION);
    assert!(controller.run_until(|s| s.phase == RidePhase::Quoted, 10));
    controller.confirm_ride(None).expect("confirm");
    assert!(controller.run_until(|s| s.phase == RidePhase::Completed, 10_000));

    controller.end_ride();
    assert_eq!(controller.snapshot().phase, RidePhase::Idle);
    assert_eq!(controller.snapshot().origin, Some(TEST_ORIGIN));

    controller.set_destination(TEST_DESTINATION);
    assert!(controller.run_until(|s| s.phase == RidePhase::Quoted, 10));
    controller.confirm_ride(None).expect("confirm");
    assert!(controller.run_until(|s| s.phase == RidePhase::Completed, 10_000));
    assert_eq!(controller.snapshot().progress_percent, 100.0);
}
