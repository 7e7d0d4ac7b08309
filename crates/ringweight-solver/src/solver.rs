//! [`WeightSolver`] entry points.

use ringweight_types::{Region, RingSnapshot};

use crate::{ProvisionPlan, RetargetPlan, SolverError, provision, retarget};

/// Derives device weights from a ring snapshot and a distribution goal.
///
/// Borrowing the snapshot keeps the solver tied to one consistent view of the
/// ring: the caller cannot mutate the ring while a plan is being computed.
#[derive(Debug, Clone, Copy)]
pub struct WeightSolver<'a> {
    snapshot: &'a RingSnapshot,
}

impl<'a> WeightSolver<'a> {
    /// Create a solver over `snapshot`.
    pub fn new(snapshot: &'a RingSnapshot) -> Self {
        Self { snapshot }
    }

    /// The snapshot this solver plans against.
    pub fn snapshot(&self) -> &'a RingSnapshot {
        self.snapshot
    }

    /// Compute the uniform weight for `new_device_count` devices joining
    /// `target_region`, aiming at one partition-replica slot per device in
    /// that region (existing plus new).
    ///
    /// Weights outside the region are held fixed. The returned weight is
    /// rounded down with a 0.999 safety factor so the region never overshoots
    /// its slot target.
    pub fn provision(
        &self,
        target_region: Region,
        new_device_count: usize,
    ) -> Result<ProvisionPlan, SolverError> {
        provision::solve(self.snapshot, target_region, new_device_count)
    }

    /// Compute new weights for every existing device in `target_region` so
    /// that the region holds `desired_ratio` of the total ring weight.
    ///
    /// The region weight is spread evenly over its devices and truncated to
    /// two decimals.
    pub fn retarget(
        &self,
        target_region: Region,
        desired_ratio: f64,
    ) -> Result<RetargetPlan, SolverError> {
        retarget::solve(self.snapshot, target_region, desired_ratio)
    }
}
