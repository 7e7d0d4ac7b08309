//! Provisioning: a uniform weight for devices joining a region.

use ringweight_types::{Region, RingSnapshot};
use tracing::debug;

use crate::{Rounding, SolverError};

/// Result of a provisioning computation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionPlan {
    /// Region the devices join.
    pub region: Region,
    /// Number of new devices sharing `weight`.
    pub new_device_count: usize,
    /// Weight to give every new device, after rounding.
    pub weight: f64,
    /// Exact per-device weight before rounding.
    pub raw_weight: f64,
    /// Slots the region should hold (one per device, existing and new).
    pub region_slots: u64,
    /// Slots left for the rest of the ring.
    pub other_slots: u64,
    /// Weight held outside the region, unchanged by the plan.
    pub other_weight: f64,
    /// Weight the region holds before the new devices arrive.
    pub current_region_weight: f64,
    /// Region weight the exact solution asks for.
    pub target_region_weight: f64,
}

impl ProvisionPlan {
    /// Weight the region will hold once the new devices are added with the
    /// rounded weight.
    pub fn resulting_region_weight(&self) -> f64 {
        self.current_region_weight + self.weight * self.new_device_count as f64
    }

    /// Partition-replica slots the region is expected to receive with the
    /// rounded weight, assuming slots follow weight proportionally.
    pub fn expected_region_slots(&self) -> f64 {
        let region = self.resulting_region_weight();
        let total = region + self.other_weight;
        let slots = (self.region_slots + self.other_slots) as f64;
        region / total * slots
    }
}

pub(crate) fn solve(
    snapshot: &RingSnapshot,
    region: Region,
    new_device_count: usize,
) -> Result<ProvisionPlan, SolverError> {
    if new_device_count == 0 {
        return Err(SolverError::InvalidDeviceCount);
    }

    let other_weight = snapshot.other_weight(region);
    if other_weight <= 0.0 {
        return Err(SolverError::InsufficientBaseWeight { region });
    }

    let current_region_weight = snapshot.region_weight(region);
    let current_region_devices = snapshot.region_device_count(region);
    let total_region_devices = (current_region_devices + new_device_count) as u64;

    // One slot per device in the region; everything else goes to the rest.
    let available = snapshot.slots();
    let region_slots = total_region_devices;
    let other_slots = match available.checked_sub(region_slots) {
        Some(n) if n > 0 => n,
        _ => {
            return Err(SolverError::InfeasibleAllocation {
                requested: region_slots,
                available,
            });
        }
    };

    // region_weight / other_weight == region_slots / other_slots
    let target_region_weight = region_slots as f64 * other_weight / other_slots as f64;
    let new_region_weight = target_region_weight - current_region_weight;
    if new_region_weight < 0.0 {
        return Err(SolverError::NegativeWeightDelta {
            current: current_region_weight,
            target: target_region_weight,
        });
    }

    let raw_weight = new_region_weight / new_device_count as f64;
    let weight = Rounding::UnderAssign.apply(raw_weight);

    debug!(
        region,
        other_weight,
        current_region_weight,
        current_region_devices,
        region_slots,
        other_slots,
        target_region_weight,
        raw_weight,
        weight,
        "solved provisioning weight"
    );

    Ok(ProvisionPlan {
        region,
        new_device_count,
        weight,
        raw_weight,
        region_slots,
        other_slots,
        other_weight,
        current_region_weight,
        target_region_weight,
    })
}
