//! Ring builder adapter for ringweight.
//!
//! The planning core only reads a [`RingSnapshot`] and hands its results to a
//! [`RingMutator`]. This crate provides that seam plus one concrete
//! implementation, [`RingBuilder`], which keeps the device table in memory and
//! persists it as a single checksummed file:
//!
//! ```text
//! magic (8 bytes) | blake3(payload) (32 bytes) | postcard(payload)
//! ```
//!
//! Files are written atomically (temp file, then rename), and every load
//! re-hashes the payload, so a truncated or corrupted ring is rejected instead
//! of being planned against.
//!
//! [`RingSnapshot`]: ringweight_types::RingSnapshot

mod builder;
mod error;
mod format;
mod mutator;

pub use builder::RingBuilder;
pub use error::RingError;
pub use mutator::RingMutator;
