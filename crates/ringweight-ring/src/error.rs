//! Error types for ring builder operations.

use ringweight_types::DeviceId;

/// Errors that can occur while loading, mutating, or saving a ring.
#[derive(Debug, thiserror::Error)]
pub enum RingError {
    /// An I/O error occurred reading or writing a ring file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] postcard::Error),

    /// The file does not start with the ring file magic.
    #[error("not a ring file (bad magic)")]
    BadMagic,

    /// The payload does not match its stored checksum.
    #[error("ring file corrupted: expected checksum {expected}, actual {actual}")]
    CorruptRing {
        /// Checksum stored in the header.
        expected: String,
        /// Checksum of the payload actually read.
        actual: String,
    },

    /// A weight was negative, NaN or infinite.
    #[error("invalid weight {0}: must be finite and non-negative")]
    InvalidWeight(f64),

    /// No device with this id exists in the ring.
    #[error("device not found: {0}")]
    DeviceNotFound(DeviceId),

    /// A device with the same address and mount is already registered.
    #[error("duplicate device {ip}:{port}/{device} (already registered as {existing})")]
    DuplicateDevice {
        /// Node address.
        ip: String,
        /// Service port.
        port: u16,
        /// Mount point.
        device: String,
        /// Id of the device already using that triple.
        existing: DeviceId,
    },

    /// The same address and mount appears twice in one batch.
    #[error("device {ip}:{port}/{device} repeated at batch index {index}")]
    RepeatedInBatch {
        /// Node address.
        ip: String,
        /// Service port.
        port: u16,
        /// Mount point.
        device: String,
        /// Position of the repeat within the batch.
        index: usize,
    },

    /// The ring parameters are unusable.
    #[error("invalid ring parameters: {0}")]
    InvalidParameters(String),
}
