use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::models::finance::FinanceData;
use crate::models::settings::SnapshotFormat;

/// Magic bytes at the start of a binary snapshot.
pub const MAGIC: &[u8; 4] = b"FNTK";

/// Current snapshot version.
pub const CURRENT_VERSION: u16 = 1;

/// magic(4) + version(2)
pub const BINARY_HEADER_SIZE: usize = 6;

/// JSON envelope: `{"state": {...collections}, "version": N}`.
#[derive(Serialize)]
struct SnapshotRef<'a> {
    state: &'a FinanceData,
    version: u16,
}

#[derive(Deserialize)]
struct Snapshot {
    state: FinanceData,
    version: u16,
}

/// Encode the full store state.
///
/// Binary layout:
/// ```text
/// [FNTK: 4B] [version: 2B LE] [bincode(FinanceData): variable]
/// ```
pub fn encode(data: &FinanceData, format: SnapshotFormat) -> Result<Vec<u8>, CoreError> {
    match format {
        SnapshotFormat::Json => serde_json::to_vec(&SnapshotRef {
            state: data,
            version: CURRENT_VERSION,
        })
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize snapshot: {e}"))),
        SnapshotFormat::Binary => {
            let body = bincode::serialize(data)
                .map_err(|e| CoreError::Serialization(format!("Failed to serialize snapshot: {e}")))?;
            let mut buf = Vec::with_capacity(BINARY_HEADER_SIZE + body.len());
            buf.extend_from_slice(MAGIC);
            buf.extend_from_slice(&CURRENT_VERSION.to_le_bytes());
            buf.extend_from_slice(&body);
            Ok(buf)
        }
    }
}

/// Detect the encoding of `bytes` from its first bytes.
pub fn detect_format(bytes: &[u8]) -> Result<SnapshotFormat, CoreError> {
    if bytes.starts_with(MAGIC) {
        return Ok(SnapshotFormat::Binary);
    }
    match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') => Ok(SnapshotFormat::Json),
        Some(_) => Err(CoreError::InvalidSnapshot(
            "Unrecognized snapshot encoding".into(),
        )),
        None => Err(CoreError::InvalidSnapshot("Snapshot is empty".into())),
    }
}

/// Decode a snapshot written by [`encode`] in either format.
pub fn decode(bytes: &[u8]) -> Result<FinanceData, CoreError> {
    match detect_format(bytes)? {
        SnapshotFormat::Json => {
            let snapshot: Snapshot = serde_json::from_slice(bytes)?;
            check_version(snapshot.version)?;
            Ok(snapshot.state)
        }
        SnapshotFormat::Binary => {
            if bytes.len() < BINARY_HEADER_SIZE {
                return Err(CoreError::InvalidSnapshot(
                    "Binary snapshot too small to hold a header".into(),
                ));
            }
            let version = u16::from_le_bytes([bytes[4], bytes[5]]);
            check_version(version)?;
            let data: FinanceData = bincode::deserialize(&bytes[BINARY_HEADER_SIZE..])?;
            Ok(data)
        }
    }
}

fn check_version(version: u16) -> Result<(), CoreError> {
    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }
    Ok(())
}
