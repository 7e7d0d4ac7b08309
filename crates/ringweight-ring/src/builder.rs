//! In-memory ring builder with file persistence.

use std::collections::HashSet;
use std::path::Path;

use ringweight_types::{Device, DeviceId, NewDevice, RingSnapshot};
use tracing::debug;

use crate::RingError;
use crate::format::{self, RingFile};

/// Largest supported partition power (2^32 partitions).
const MAX_PART_POWER: u8 = 32;

type Result<T> = std::result::Result<T, RingError>;

/// Device table of a ring plus its partition/replica parameters.
///
/// The builder owns the device records and their weights. Turning weights
/// into partition assignments is left to the ring engine that consumes the
/// saved file.
#[derive(Debug, Clone, PartialEq)]
pub struct RingBuilder {
    part_power: u8,
    replicas: u32,
    /// Next id to hand out. Ids are never reused.
    next_id: u32,
    /// Devices in insertion order.
    devices: Vec<Device>,
}

impl RingBuilder {
    /// Create an empty ring with `2^part_power` partitions and `replicas`
    /// copies of each.
    pub fn new(part_power: u8, replicas: u32) -> Result<Self> {
        validate_params(part_power, replicas)?;
        Ok(Self {
            part_power,
            replicas,
            next_id: 0,
            devices: Vec::new(),
        })
    }

    /// Load a ring from a file written by [`RingBuilder::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file = format::decode(&bytes)?;
        let builder = Self::from_file(file)?;
        debug!(
            path = %path.display(),
            devices = builder.devices.len(),
            part_power = builder.part_power,
            replicas = builder.replicas,
            "loaded ring"
        );
        Ok(builder)
    }

    /// Save the ring to `path` atomically.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = format::encode(&self.to_file())?;
        format::write_atomic(path, &bytes)?;
        debug!(path = %path.display(), size = bytes.len(), "saved ring");
        Ok(())
    }

    /// Partition power of the ring.
    pub fn part_power(&self) -> u8 {
        self.part_power
    }

    /// Number of partitions (`2^part_power`).
    pub fn partitions(&self) -> u64 {
        1u64 << self.part_power
    }

    /// Replication factor.
    pub fn replicas(&self) -> u32 {
        self.replicas
    }

    /// All registered devices, in insertion order.
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Look up a device by id.
    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    /// Take an immutable snapshot of the current state for planning.
    pub fn snapshot(&self) -> RingSnapshot {
        RingSnapshot::new(self.devices.clone(), self.partitions(), self.replicas)
    }

    /// Register a single device.
    pub fn add_dev(&mut self, device: NewDevice, weight: f64) -> Result<DeviceId> {
        let mut ids = self.add_devs(weight, std::slice::from_ref(&device))?;
        Ok(ids.remove(0))
    }

    /// Register a batch of devices, all with `weight`.
    ///
    /// The whole batch is validated before anything is inserted: either every
    /// device is added or none is.
    pub fn add_devs(&mut self, weight: f64, devices: &[NewDevice]) -> Result<Vec<DeviceId>> {
        validate_weight(weight)?;

        let mut seen: HashSet<(&str, u16, &str)> = HashSet::new();
        for (index, new) in devices.iter().enumerate() {
            if let Some(existing) = self.find_by_address(&new.ip, new.port, &new.device) {
                return Err(duplicate(new, existing));
            }
            if !seen.insert((new.ip.as_str(), new.port, new.device.as_str())) {
                return Err(RingError::RepeatedInBatch {
                    ip: new.ip.clone(),
                    port: new.port,
                    device: new.device.clone(),
                    index,
                });
            }
        }

        let last_id = u32::try_from(devices.len())
            .ok()
            .and_then(|n| self.next_id.checked_add(n));
        if last_id.is_none() {
            return Err(RingError::InvalidParameters(format!(
                "cannot allocate {} device ids after {}",
                devices.len(),
                self.next_id
            )));
        }

        let mut ids = Vec::with_capacity(devices.len());
        for new in devices {
            let id = DeviceId::new(self.next_id);
            self.next_id += 1;
            self.devices.push(new.clone().into_device(id, weight));
            debug!(%id, weight, region = new.region, zone = new.zone, "added device");
            ids.push(id);
        }
        Ok(ids)
    }

    /// Change the weight of an existing device.
    pub fn set_dev_weight(&mut self, id: DeviceId, weight: f64) -> Result<()> {
        validate_weight(weight)?;
        let device = self
            .devices
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(RingError::DeviceNotFound(id))?;
        device.weight = weight;
        debug!(%id, weight, "set device weight");
        Ok(())
    }

    fn find_by_address(&self, ip: &str, port: u16, device: &str) -> Option<DeviceId> {
        self.devices
            .iter()
            .find(|d| d.ip == ip && d.port == port && d.device == device)
            .map(|d| d.id)
    }

    fn to_file(&self) -> RingFile {
        RingFile {
            part_power: self.part_power,
            replicas: self.replicas,
            next_id: self.next_id,
            devices: self.devices.clone(),
        }
    }

    fn from_file(file: RingFile) -> Result<Self> {
        validate_params(file.part_power, file.replicas)?;
        let mut ids = HashSet::new();
        for device in &file.devices {
            validate_weight(device.weight)?;
            if !ids.insert(device.id) || device.id.get() >= file.next_id {
                return Err(RingError::InvalidParameters(format!(
                    "device id {} is duplicated or beyond next id {}",
                    device.id, file.next_id
                )));
            }
        }
        Ok(Self {
            part_power: file.part_power,
            replicas: file.replicas,
            next_id: file.next_id,
            devices: file.devices,
        })
    }
}

fn validate_params(part_power: u8, replicas: u32) -> Result<()> {
    if part_power > MAX_PART_POWER {
        return Err(RingError::InvalidParameters(format!(
            "part power {part_power} exceeds {MAX_PART_POWER}"
        )));
    }
    if replicas == 0 {
        return Err(RingError::InvalidParameters(
            "replicas must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn validate_weight(weight: f64) -> Result<()> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(RingError::InvalidWeight(weight))
    }
}

fn duplicate(new: &NewDevice, existing: DeviceId) -> RingError {
    RingError::DuplicateDevice {
        ip: new.ip.clone(),
        port: new.port,
        device: new.device.clone(),
        existing,
    }
}
