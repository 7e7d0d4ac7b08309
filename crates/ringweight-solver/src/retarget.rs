//! Retargeting: reweight an existing region to a chosen share of the ring.

use std::collections::BTreeMap;

use ringweight_types::{DeviceId, Region, RingSnapshot};
use tracing::debug;

use crate::{Rounding, SolverError};

/// Result of a retargeting computation.
#[derive(Debug, Clone, PartialEq)]
pub struct RetargetPlan {
    /// Region being reweighted.
    pub region: Region,
    /// Share of total ring weight the region should hold.
    pub desired_ratio: f64,
    /// Exact region weight that hits `desired_ratio`.
    pub target_region_weight: f64,
    /// Weight held outside the region, unchanged by the plan.
    pub other_weight: f64,
    /// Rounded weight given to every device in the region.
    pub weight: f64,
    /// New weight per existing device id in the region.
    pub assignments: BTreeMap<DeviceId, f64>,
}

impl RetargetPlan {
    /// Share of total weight the region holds once the rounded weights are
    /// applied. Slightly below `desired_ratio` because of truncation.
    pub fn achieved_ratio(&self) -> f64 {
        let region: f64 = self.assignments.values().sum();
        region / (region + self.other_weight)
    }
}

pub(crate) fn solve(
    snapshot: &RingSnapshot,
    region: Region,
    desired_ratio: f64,
) -> Result<RetargetPlan, SolverError> {
    // Also rejects NaN.
    if !(desired_ratio > 0.0 && desired_ratio < 1.0) {
        return Err(SolverError::InvalidRatio(desired_ratio));
    }

    let other_weight = snapshot.other_weight(region);
    if other_weight <= 0.0 {
        return Err(SolverError::InsufficientBaseWeight { region });
    }

    // desired_ratio == region_weight / (region_weight + other_weight)
    let target_region_weight = desired_ratio * other_weight / (1.0 - desired_ratio);

    let ids: Vec<DeviceId> = snapshot.region_devices(region).map(|d| d.id).collect();
    if ids.is_empty() {
        return Err(SolverError::EmptyRegion(region));
    }

    let raw_weight = target_region_weight / ids.len() as f64;
    let weight = Rounding::Truncate.apply(raw_weight);

    debug!(
        region,
        desired_ratio,
        other_weight,
        target_region_weight,
        devices = ids.len(),
        raw_weight,
        weight,
        "solved retargeting weight"
    );

    let assignments = ids.into_iter().map(|id| (id, weight)).collect();

    Ok(RetargetPlan {
        region,
        desired_ratio,
        target_region_weight,
        other_weight,
        weight,
        assignments,
    })
}
