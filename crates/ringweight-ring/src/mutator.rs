//! The seam through which computed weights are applied to a ring.

use std::path::Path;

use ringweight_types::{DeviceId, NewDevice};

use crate::{RingBuilder, RingError};

/// Applies planned weights to a ring and persists the result.
///
/// Implementations must not partially apply a rejected call. Errors from
/// `persist` are I/O-level and are propagated unchanged.
pub trait RingMutator {
    /// Register `devices`, all with `weight`, returning their assigned ids in
    /// the same order.
    fn add_devices(&mut self, weight: f64, devices: &[NewDevice])
    -> Result<Vec<DeviceId>, RingError>;

    /// Update the weight of an existing device in place.
    fn set_device_weight(&mut self, id: DeviceId, weight: f64) -> Result<(), RingError>;

    /// Write the updated ring to `destination`.
    fn persist(&self, destination: &Path) -> Result<(), RingError>;
}

impl RingMutator for RingBuilder {
    fn add_devices(
        &mut self,
        weight: f64,
        devices: &[NewDevice],
    ) -> Result<Vec<DeviceId>, RingError> {
        self.add_devs(weight, devices)
    }

    fn set_device_weight(&mut self, id: DeviceId, weight: f64) -> Result<(), RingError> {
        self.set_dev_weight(id, weight)
    }

    fn persist(&self, destination: &Path) -> Result<(), RingError> {
        self.save(destination)
    }
}
