//! Reweighting an existing region.

use ringweight_ring::RingMutator;
use ringweight_solver::{RetargetPlan, WeightSolver};
use ringweight_types::{Region, RingSnapshot};
use tracing::info;

use crate::EngineError;

/// Plans and applies a new ring share for an existing region.
#[derive(Debug, Clone, Copy, Default)]
pub struct Retargeter;

impl Retargeter {
    /// Create a retargeter.
    pub fn new() -> Self {
        Self
    }

    /// Solve for the weights that give `region` a `ratio` share of the ring.
    pub fn plan(
        &self,
        snapshot: &RingSnapshot,
        region: Region,
        ratio: f64,
    ) -> Result<RetargetPlan, EngineError> {
        let plan = WeightSolver::new(snapshot).retarget(region, ratio)?;
        info!(
            region,
            ratio,
            devices = plan.assignments.len(),
            weight = plan.weight,
            achieved_ratio = plan.achieved_ratio(),
            "planned region weights"
        );
        Ok(plan)
    }

    /// Write the planned weights into `ring`.
    ///
    /// Stops at the first rejected update. The ring is expected to be the one
    /// the plan was computed from, where every id exists.
    pub fn apply<M>(&self, ring: &mut M, plan: &RetargetPlan) -> Result<(), EngineError>
    where
        M: RingMutator + ?Sized,
    {
        for (&id, &weight) in &plan.assignments {
            ring.set_device_weight(id, weight)?;
            info!(device_id = %id, weight, region = plan.region, "setting device weight");
        }
        Ok(())
    }
}
