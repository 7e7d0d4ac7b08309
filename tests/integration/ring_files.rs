//! Integration test: ring file persistence behavior seen by the planners.

use ringweight_engine::{EngineError, NodeSet, Provisioner};
use ringweight_integration_tests::{RegionSpec, RingFixture};
use ringweight_ring::{RingBuilder, RingError, RingMutator};

fn fixture() -> RingFixture {
    RingFixture::new(
        10,
        3,
        &[RegionSpec {
            region: 1,
            devices: 6,
            weight: 200.0,
        }],
    )
}

#[test]
fn test_truncated_ring_is_rejected() {
    let fx = fixture();
    let bytes = fx.input_bytes();
    let path = fx.path("truncated.ring");
    std::fs::write(&path, &bytes[..bytes.len() - 5]).unwrap();

    assert!(matches!(
        RingBuilder::load(&path),
        Err(RingError::CorruptRing { .. })
    ));
}

#[test]
fn test_foreign_file_is_rejected() {
    let fx = fixture();
    let path = fx.path("notes.txt");
    std::fs::write(&path, "region 1 is the primary").unwrap();
    assert!(matches!(RingBuilder::load(&path), Err(RingError::BadMagic)));
}

#[test]
fn test_persist_io_error_passes_through() {
    let fx = fixture();
    let ring = fx.load_input();
    // A directory cannot be replaced by a file rename.
    let target = fx.path("occupied");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("keep"), b"x").unwrap();

    let err = ring.persist(&target).unwrap_err();
    assert!(matches!(err, RingError::Io(_)), "got {err:?}");

    // Only the input ring and the untouched directory remain.
    let mut names: Vec<String> = std::fs::read_dir(fx.path(""))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["input.ring", "occupied"]);
    assert!(target.join("keep").exists());

    let engine_err = EngineError::from(err);
    assert!(engine_err.to_string().starts_with("ring error: io error"));
}

#[test]
fn test_reloaded_ring_keeps_allocating_fresh_ids() {
    let fx = fixture();
    let provisioner = Provisioner::default();
    let request = NodeSet {
        region: 2,
        port: 6000,
        ips: vec!["10.2.0.1".to_string()],
    };

    let mut ring = fx.load_input();
    let outcome = provisioner.plan(&ring.snapshot(), &request).unwrap();
    let ids = provisioner.apply(&mut ring, &outcome).unwrap();
    let output = fx.path("output.ring");
    ring.persist(&output).unwrap();

    let reloaded = RingBuilder::load(&output).unwrap();
    let max_existing = reloaded.devices().iter().map(|d| d.id).max().unwrap();
    assert_eq!(max_existing, *ids.last().unwrap());
    assert_eq!(reloaded.devices().len(), 10);
}

#[test]
fn test_input_named_like_a_temp_file_survives_persist() {
    let fx = fixture();
    let input = fx.path("ring.tmp");
    std::fs::copy(fx.input(), &input).unwrap();
    let before = std::fs::read(&input).unwrap();

    let provisioner = Provisioner::default();
    let request = NodeSet {
        region: 2,
        port: 6000,
        ips: vec!["10.2.0.1".to_string()],
    };
    let mut ring = RingBuilder::load(&input).unwrap();
    let outcome = provisioner.plan(&ring.snapshot(), &request).unwrap();
    provisioner.apply(&mut ring, &outcome).unwrap();
    let output = fx.path("ring.out");
    ring.persist(&output).unwrap();

    assert_eq!(std::fs::read(&input).unwrap(), before);
    assert_eq!(RingBuilder::load(&input).unwrap().devices().len(), 6);
    assert_eq!(RingBuilder::load(&output).unwrap().devices().len(), 10);
}
