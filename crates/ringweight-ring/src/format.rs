//! On-disk ring file encoding.

use std::io::Write;
use std::path::Path;

use ringweight_types::Device;
use serde::{Deserialize, Serialize};

use crate::RingError;

/// Leading bytes of every ring file; the last byte is the format version.
pub(crate) const MAGIC: [u8; 8] = *b"RWRING\0\x01";

const HASH_LEN: usize = 32;
const HEADER_LEN: usize = MAGIC.len() + HASH_LEN;

/// Serialized form of a ring builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RingFile {
    pub part_power: u8,
    pub replicas: u32,
    pub next_id: u32,
    pub devices: Vec<Device>,
}

/// Encode `file` as `magic | blake3(payload) | payload`.
pub(crate) fn encode(file: &RingFile) -> Result<Vec<u8>, RingError> {
    let payload = postcard::to_allocvec(file)?;
    let hash = blake3::hash(&payload);

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(hash.as_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Decode and verify a buffer produced by [`encode`].
pub(crate) fn decode(bytes: &[u8]) -> Result<RingFile, RingError> {
    if bytes.len() < HEADER_LEN || bytes[..MAGIC.len()] != MAGIC {
        return Err(RingError::BadMagic);
    }

    let mut stored = [0u8; HASH_LEN];
    stored.copy_from_slice(&bytes[MAGIC.len()..HEADER_LEN]);
    let expected = blake3::Hash::from(stored);

    let payload = &bytes[HEADER_LEN..];
    let actual = blake3::hash(payload);
    // blake3::Hash equality is constant-time.
    if actual != expected {
        return Err(RingError::CorruptRing {
            expected: expected.to_hex().to_string(),
            actual: actual.to_hex().to_string(),
        });
    }

    Ok(postcard::from_bytes(payload)?)
}

/// Write `data` to `path` via a uniquely named temp file in the same
/// directory and a rename, so readers never observe a half-written ring.
///
/// The temp file is removed if any step fails.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}
