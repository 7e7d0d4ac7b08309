//! Adding new nodes to a region.

use ringweight_ring::RingMutator;
use ringweight_solver::{ProvisionPlan, WeightSolver};
use ringweight_types::{DeviceId, NewDevice, Region, RingSnapshot, Zone};
use tracing::info;

use crate::EngineError;

/// Device layout used for every node added by a [`Provisioner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionConfig {
    /// Device paths present on each new node (e.g. `sdb1`).
    pub device_paths: Vec<String>,
    /// Zone the new devices are placed in.
    pub zone: Zone,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            device_paths: ["sdb1", "sdc1", "sdd1", "sde1"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            zone: 0,
        }
    }
}

/// The nodes joining the ring in one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSet {
    /// Region the nodes join.
    pub region: Region,
    /// Port of the storage service on every node.
    pub port: u16,
    /// Node addresses.
    pub ips: Vec<String>,
}

/// A computed provisioning plan, ready to be committed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionOutcome {
    /// Solver output, including the uniform weight.
    pub plan: ProvisionPlan,
    /// One record per (node, device path) pair.
    pub devices: Vec<NewDevice>,
}

/// Plans and applies the addition of nodes to a region.
#[derive(Debug, Clone, Default)]
pub struct Provisioner {
    config: ProvisionConfig,
}

impl Provisioner {
    /// Create a provisioner with the given device layout.
    pub fn new(config: ProvisionConfig) -> Self {
        Self { config }
    }

    /// The device layout in use.
    pub fn config(&self) -> &ProvisionConfig {
        &self.config
    }

    /// Expand `nodes` into devices and solve for their weight.
    pub fn plan(
        &self,
        snapshot: &RingSnapshot,
        nodes: &NodeSet,
    ) -> Result<ProvisionOutcome, EngineError> {
        if nodes.ips.is_empty() {
            return Err(EngineError::NoNodes);
        }
        if self.config.device_paths.is_empty() {
            return Err(EngineError::NoDevicePaths);
        }
        if let Some(pos) = self.config.device_paths.iter().position(|p| p.trim().is_empty()) {
            return Err(EngineError::EmptyDevicePath(pos));
        }

        let devices: Vec<NewDevice> = nodes
            .ips
            .iter()
            .flat_map(|ip| {
                self.config.device_paths.iter().map(move |path| NewDevice {
                    region: nodes.region,
                    zone: self.config.zone,
                    ip: ip.clone(),
                    port: nodes.port,
                    device: path.clone(),
                    meta: String::new(),
                })
            })
            .collect();

        let plan = WeightSolver::new(snapshot).provision(nodes.region, devices.len())?;

        info!(
            region = plan.region,
            devices = devices.len(),
            weight = plan.weight,
            region_slots = plan.region_slots,
            other_slots = plan.other_slots,
            other_weight = plan.other_weight,
            "planned new devices"
        );

        Ok(ProvisionOutcome { plan, devices })
    }

    /// Register the planned devices on `ring`.
    pub fn apply<M>(
        &self,
        ring: &mut M,
        outcome: &ProvisionOutcome,
    ) -> Result<Vec<DeviceId>, EngineError>
    where
        M: RingMutator + ?Sized,
    {
        let ids = ring.add_devices(outcome.plan.weight, &outcome.devices)?;
        for (id, device) in ids.iter().zip(&outcome.devices) {
            info!(
                device_id = %id,
                weight = outcome.plan.weight,
                region = device.region,
                zone = device.zone,
                ip = %device.ip,
                port = device.port,
                device = %device.device,
                "adding device"
            );
        }
        Ok(ids)
    }
}
