//! Integration test: reweighting an existing region.

use ringweight_engine::{EngineError, Retargeter, SolverError};
use ringweight_integration_tests::{RegionSpec, RingFixture, snapshot_of};
use ringweight_ring::RingMutator;

/// Region 1: 99 devices at 100 (9900). Region 2: 4 devices at 25 (100).
fn two_regions() -> RingFixture {
    RingFixture::new(
        16,
        3,
        &[
            RegionSpec {
                region: 1,
                devices: 99,
                weight: 100.0,
            },
            RegionSpec {
                region: 2,
                devices: 4,
                weight: 25.0,
            },
        ],
    )
}

#[test]
fn test_assign_half_of_ring() {
    let fx = two_regions();
    let mut ring = fx.load_input();
    let retargeter = Retargeter::new();

    let plan = retargeter.plan(&ring.snapshot(), 2, 0.5).unwrap();
    assert_eq!(plan.target_region_weight, 9900.0);
    retargeter.apply(&mut ring, &plan).unwrap();

    let output = fx.path("output.ring");
    ring.persist(&output).unwrap();

    let snap = snapshot_of(&output);
    assert!(snap.region_devices(2).all(|d| d.weight == 2475.0));
    assert!(snap.region_devices(1).all(|d| d.weight == 100.0));
    assert_eq!(snap.region_share(2), Some(0.5));
}

#[test]
fn test_small_ratio_round_trip() {
    let fx = two_regions();
    let mut ring = fx.load_input();
    let retargeter = Retargeter::new();

    for ratio in [0.001, 0.01, 0.05, 0.3] {
        let plan = retargeter.plan(&ring.snapshot(), 2, ratio).unwrap();
        retargeter.apply(&mut ring, &plan).unwrap();

        let snap = ring.snapshot();
        let applied = snap.region_weight(2);
        let shortfall = plan.target_region_weight - applied;
        assert!(
            (-1e-6..=0.04 + 1e-6).contains(&shortfall),
            "ratio {ratio}: shortfall {shortfall}"
        );
        let share = snap.region_share(2).unwrap();
        assert!(share <= ratio + 1e-9, "ratio {ratio}: share {share}");
        // Other region untouched across repeated retargets.
        assert_eq!(snap.region_weight(1), 9900.0);
    }
}

#[test]
fn test_ratio_one_fails_before_any_write() {
    let fx = two_regions();
    let ring = fx.load_input();
    let output = fx.path("output.ring");

    let err = Retargeter::new()
        .plan(&ring.snapshot(), 2, 1.0)
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Solver(SolverError::InvalidRatio(r)) if r == 1.0
    ));
    assert!(!output.exists());
}

#[test]
fn test_unknown_region_is_empty() {
    let fx = two_regions();
    let ring = fx.load_input();
    let err = Retargeter::new()
        .plan(&ring.snapshot(), 3, 0.2)
        .unwrap_err();
    assert!(matches!(err, EngineError::Solver(SolverError::EmptyRegion(3))));
}
