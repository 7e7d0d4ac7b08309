//! Error types for weight planning.

use ringweight_types::Region;

/// Conditions under which no valid weight can be computed.
///
/// All of them are detected before anything is applied to a ring.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolverError {
    /// The devices outside the target region carry no weight, so there is
    /// nothing to express a ratio against.
    #[error("no weight outside region {region}: cannot derive a ratio from zero base weight")]
    InsufficientBaseWeight {
        /// Region being planned.
        region: Region,
    },

    /// One slot per device needs more slots than the ring has.
    #[error(
        "infeasible allocation: {requested} devices in region need one slot each, \
         but the ring only has {available} partition-replica slots"
    )]
    InfeasibleAllocation {
        /// Devices that would sit in the target region.
        requested: u64,
        /// Partition-replica slots in the whole ring.
        available: u64,
    },

    /// The region already carries more weight than its target.
    #[error(
        "negative weight delta: region already has weight {current}, \
         above the computed target {target}"
    )]
    NegativeWeightDelta {
        /// Weight currently held by the region.
        current: f64,
        /// Total region weight the plan asked for.
        target: f64,
    },

    /// The desired ratio is not strictly between 0 and 1.
    #[error("invalid ratio {0}: must be strictly between 0 and 1")]
    InvalidRatio(f64),

    /// Retargeting a region that has no devices.
    #[error("region {0} has no devices to assign weight to")]
    EmptyRegion(Region),

    /// Provisioning zero new devices.
    #[error("new device count must be at least 1")]
    InvalidDeviceCount,
}
