use tracing::{debug, info};

use crate::errors::CoreError;
use crate::models::finance::FinanceData;
use crate::models::settings::SnapshotFormat;

use super::backend::KeyValueBackend;
use super::format;

/// High-level storage operations: write/read the whole store under one key.
pub struct StorageManager;

impl StorageManager {
    /// Encode `data` and overwrite whatever is stored under `key`.
    ///
    /// Flow: FinanceData → snapshot envelope (JSON or FNTK binary) → backend
    pub fn save(
        backend: &mut dyn KeyValueBackend,
        key: &str,
        data: &FinanceData,
        format: SnapshotFormat,
    ) -> Result<(), CoreError> {
        let bytes = format::encode(data, format)?;
        backend.write(key, &bytes)?;
        debug!(key, bytes = bytes.len(), entities = data.entity_count(), "snapshot written");
        Ok(())
    }

    /// Read the snapshot under `key`. `Ok(None)` when nothing was stored yet.
    pub fn load(backend: &dyn KeyValueBackend, key: &str) -> Result<Option<FinanceData>, CoreError> {
        let Some(bytes) = backend.read(key)? else {
            info!(key, "no snapshot stored, starting empty");
            return Ok(None);
        };
        let data = format::decode(&bytes)?;
        info!(key, entities = data.entity_count(), "snapshot loaded");
        Ok(Some(data))
    }

    /// Drop the snapshot under `key`.
    pub fn clear(backend: &mut dyn KeyValueBackend, key: &str) -> Result<bool, CoreError> {
        backend.remove(key)
    }
}
