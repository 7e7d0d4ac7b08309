//! Shared types for ringweight.
//!
//! This crate defines the data model every other crate works against:
//! device identifiers ([`DeviceId`]), device records ([`Device`],
//! [`NewDevice`]) and the read-only view of a ring taken at planning time
//! ([`RingSnapshot`]), including its per-region weight aggregates.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Identifier of a device within a ring.
///
/// Assigned by the ring builder when a device is added. Ids are never reused,
/// so an id removed from the ring cannot silently alias a newer device.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct DeviceId(u32);

impl DeviceId {
    /// Wrap a raw device index.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Return the raw device index.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for DeviceId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceId({})", self.0)
    }
}

/// Region number. Regions are the outermost failure domain.
pub type Region = u32;

/// Zone number, nested inside a region.
pub type Zone = u32;

// ---------------------------------------------------------------------------
// Devices
// ---------------------------------------------------------------------------

/// A physical storage endpoint registered in the ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Unique id within the ring.
    pub id: DeviceId,
    /// Relative capacity. The device's share of the ring is
    /// `weight / total_weight`; a zero weight receives no partitions.
    pub weight: f64,
    /// Region the device belongs to.
    pub region: Region,
    /// Zone within the region.
    pub zone: Zone,
    /// Storage node address.
    pub ip: String,
    /// Port of the storage service on that node.
    pub port: u16,
    /// Mount point / device name on the node (e.g. `sdb1`).
    pub device: String,
    /// Free-form operator note.
    #[serde(default)]
    pub meta: String,
}

/// A device that has not been registered yet (no id assigned).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDevice {
    /// Region the device will join.
    pub region: Region,
    /// Zone within the region.
    pub zone: Zone,
    /// Storage node address.
    pub ip: String,
    /// Port of the storage service.
    pub port: u16,
    /// Mount point / device name on the node.
    pub device: String,
    /// Free-form operator note.
    pub meta: String,
}

impl NewDevice {
    /// Attach an id and weight, producing the registered record.
    pub fn into_device(self, id: DeviceId, weight: f64) -> Device {
        Device {
            id,
            weight,
            region: self.region,
            zone: self.zone,
            ip: self.ip,
            port: self.port,
            device: self.device,
            meta: self.meta,
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Immutable view of a ring at computation time.
///
/// `partitions` and `replicas` are ring-wide constants; changing weights only
/// changes how the `partitions * replicas` slots are spread across devices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingSnapshot {
    /// Devices present before any change.
    pub devices: Vec<Device>,
    /// Total partition count (a power of two in practice).
    pub partitions: u64,
    /// Replication factor.
    pub replicas: u32,
}

impl RingSnapshot {
    /// Create a snapshot from its parts.
    pub fn new(devices: Vec<Device>, partitions: u64, replicas: u32) -> Self {
        Self {
            devices,
            partitions,
            replicas,
        }
    }

    /// Total number of partition-replica slots in the ring.
    pub fn slots(&self) -> u64 {
        self.partitions * u64::from(self.replicas)
    }

    /// Devices belonging to `region`.
    pub fn region_devices(&self, region: Region) -> impl Iterator<Item = &Device> {
        self.devices.iter().filter(move |d| d.region == region)
    }

    /// Number of devices in `region`.
    pub fn region_device_count(&self, region: Region) -> usize {
        self.region_devices(region).count()
    }

    /// Sum of device weights inside `region`.
    pub fn region_weight(&self, region: Region) -> f64 {
        self.region_devices(region).map(|d| d.weight).sum()
    }

    /// Sum of device weights outside `region`.
    pub fn other_weight(&self, region: Region) -> f64 {
        self.devices
            .iter()
            .filter(|d| d.region != region)
            .map(|d| d.weight)
            .sum()
    }

    /// Sum of all device weights.
    pub fn total_weight(&self) -> f64 {
        self.devices.iter().map(|d| d.weight).sum()
    }

    /// Fraction of total ring weight held by `region`.
    ///
    /// Returns `None` when the ring carries no weight at all.
    pub fn region_share(&self, region: Region) -> Option<f64> {
        let total = self.total_weight();
        (total > 0.0).then(|| self.region_weight(region) / total)
    }

    /// Distinct regions present in the ring, ascending.
    pub fn regions(&self) -> Vec<Region> {
        self.devices
            .iter()
            .map(|d| d.region)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
