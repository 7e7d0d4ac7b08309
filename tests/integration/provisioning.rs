//! Integration test: adding nodes to a region.
//!
//! Runs the provisioner against ring files on disk and checks the written
//! output.

use ringweight_engine::{EngineError, NodeSet, ProvisionConfig, Provisioner, SolverError};
use ringweight_integration_tests::{RegionSpec, RingFixture, snapshot_of};
use ringweight_ring::RingMutator;

fn nodes(region: u32, ips: &[&str]) -> NodeSet {
    NodeSet {
        region,
        port: 6000,
        ips: ips.iter().map(|s| s.to_string()).collect(),
    }
}

/// Region 1 only: 20 devices of 500 weight, 2^12 partitions, 3 replicas.
fn single_region() -> RingFixture {
    RingFixture::new(
        12,
        3,
        &[RegionSpec {
            region: 1,
            devices: 20,
            weight: 500.0,
        }],
    )
}

/// Two nodes with the default four devices each join a brand-new region.
#[test]
fn test_add_nodes_to_new_region() {
    let fx = single_region();
    let mut ring = fx.load_input();
    let provisioner = Provisioner::default();

    let outcome = provisioner
        .plan(&ring.snapshot(), &nodes(2, &["10.2.0.1", "10.2.0.2"]))
        .unwrap();
    provisioner.apply(&mut ring, &outcome).unwrap();

    let output = fx.path("output.ring");
    ring.persist(&output).unwrap();

    let snap = snapshot_of(&output);
    assert_eq!(snap.devices.len(), 28);
    assert_eq!(snap.region_device_count(2), 8);
    assert_eq!(snap.other_weight(2), 10_000.0);

    // 8 devices, one slot each, out of 4096 * 3 slots:
    // 8 * 10000 / 12280 = 6.514... total, 0.814... per device.
    let slots = snap.slots() as f64;
    let expected_raw = 8.0 * 10_000.0 / (slots - 8.0) / 8.0;
    let expected = (expected_raw * 99.9).floor() / 100.0;
    for d in snap.region_devices(2) {
        assert_eq!(d.weight, expected);
        assert_eq!(d.port, 6000);
        assert_eq!(d.zone, 0);
    }

    // Never more than one slot per device once slots follow weight.
    let region_slots = snap.region_share(2).unwrap() * slots;
    assert!(region_slots <= 8.0, "region would get {region_slots} slots");
}

/// A second batch into a region that already has devices accounts for them.
#[test]
fn test_second_batch_accounts_for_existing_devices() {
    let fx = single_region();
    let mut ring = fx.load_input();
    let provisioner = Provisioner::new(ProvisionConfig {
        device_paths: vec!["sdb1".into(), "sdc1".into()],
        zone: 1,
    });

    let first = provisioner
        .plan(&ring.snapshot(), &nodes(2, &["10.2.0.1"]))
        .unwrap();
    provisioner.apply(&mut ring, &first).unwrap();

    let second = provisioner
        .plan(&ring.snapshot(), &nodes(2, &["10.2.0.2", "10.2.0.3"]))
        .unwrap();
    assert_eq!(second.plan.region_slots, 6);
    assert_eq!(second.plan.current_region_weight, first.plan.weight * 2.0);
    provisioner.apply(&mut ring, &second).unwrap();

    let snap = ring.snapshot();
    let slots = snap.slots() as f64;
    let region_slots = snap.region_share(2).unwrap() * slots;
    assert!(region_slots <= 6.0, "region would get {region_slots} slots");
    assert!(snap.region_devices(2).all(|d| d.zone == 1));
}

/// Planning is a pure function of the input ring and the request.
#[test]
fn test_same_inputs_produce_identical_output_files() {
    let fx = single_region();
    let provisioner = Provisioner::default();
    let request = nodes(3, &["10.3.0.1"]);

    for name in ["a.ring", "b.ring"] {
        let mut ring = fx.load_input();
        let outcome = provisioner.plan(&ring.snapshot(), &request).unwrap();
        provisioner.apply(&mut ring, &outcome).unwrap();
        ring.persist(&fx.path(name)).unwrap();
    }

    let a = std::fs::read(fx.path("a.ring")).unwrap();
    let b = std::fs::read(fx.path("b.ring")).unwrap();
    assert_eq!(a, b);
}

/// Writing the output never touches the input file.
#[test]
fn test_input_ring_unchanged() {
    let fx = single_region();
    let before = fx.input_bytes();

    let mut ring = fx.load_input();
    let provisioner = Provisioner::default();
    let outcome = provisioner
        .plan(&ring.snapshot(), &nodes(2, &["10.2.0.1"]))
        .unwrap();
    provisioner.apply(&mut ring, &outcome).unwrap();
    ring.persist(&fx.path("output.ring")).unwrap();

    assert_eq!(fx.input_bytes(), before);
}

/// More devices than slots in a tiny ring is reported, not clamped.
#[test]
fn test_infeasible_batch_is_rejected() {
    // 2^2 partitions * 2 replicas = 8 slots.
    let fx = RingFixture::new(
        2,
        2,
        &[RegionSpec {
            region: 1,
            devices: 2,
            weight: 10.0,
        }],
    );
    let ring = fx.load_input();
    let err = Provisioner::default()
        .plan(&ring.snapshot(), &nodes(2, &["10.2.0.1", "10.2.0.2"]))
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Solver(SolverError::InfeasibleAllocation {
            requested: 8,
            available: 8
        })
    ));
}

/// A ring with no weight anywhere else cannot anchor a new region.
#[test]
fn test_empty_ring_has_no_base_weight() {
    let fx = RingFixture::new(8, 3, &[]);
    let ring = fx.load_input();
    let err = Provisioner::default()
        .plan(&ring.snapshot(), &nodes(1, &["10.1.0.1"]))
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Solver(SolverError::InsufficientBaseWeight { region: 1 })
    ));
}
