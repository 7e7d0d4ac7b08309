//! Weight solver for a partition-based storage ring.
//!
//! The ring engine hands out partition-replica slots in proportion to device
//! weight: a region holding `w` out of `W` total weight ends up with roughly
//! `w / W` of the `partitions * replicas` slots. [`WeightSolver`] inverts that
//! relationship to answer two planning questions against a [`RingSnapshot`]:
//!
//! - **Provisioning** ([`WeightSolver::provision`]): which uniform weight should
//!   a batch of new devices get so that their region ends up with about one
//!   slot per device, leaving every other region's weight untouched?
//! - **Retargeting** ([`WeightSolver::retarget`]): which weight should every
//!   existing device of a region get so the region holds a chosen fraction of
//!   the ring?
//!
//! The solver is pure arithmetic. It never mutates the snapshot and never
//! clamps an impossible result into a valid-looking one; the conditions are
//! reported as [`SolverError`] instead.
//!
//! [`RingSnapshot`]: ringweight_types::RingSnapshot

mod error;
mod provision;
mod retarget;
mod rounding;
mod solver;

pub use error::SolverError;
pub use provision::ProvisionPlan;
pub use retarget::RetargetPlan;
pub use rounding::Rounding;
pub use solver::WeightSolver;
