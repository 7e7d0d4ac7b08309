//! Planning use cases for ringweight.
//!
//! Each use case follows the same shape: take a [`RingSnapshot`], let the
//! [`WeightSolver`] compute the new weights, and only then commit them through
//! a [`RingMutator`]. A failed plan leaves the ring untouched.
//!
//! - [`Provisioner`]: add a batch of nodes to a region with a uniform weight.
//! - [`Retargeter`]: reweight an existing region to a share of the ring.
//!
//! [`RingSnapshot`]: ringweight_types::RingSnapshot
//! [`WeightSolver`]: ringweight_solver::WeightSolver
//! [`RingMutator`]: ringweight_ring::RingMutator

mod error;
mod provisioner;
mod retargeter;

pub use error::EngineError;
pub use provisioner::{NodeSet, ProvisionConfig, ProvisionOutcome, Provisioner};
pub use retargeter::Retargeter;

pub use ringweight_solver::{ProvisionPlan, RetargetPlan, SolverError};
