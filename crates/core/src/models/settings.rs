use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::CoreError;

/// Storage name under which the whole store snapshot is written.
pub const DEFAULT_STORAGE_KEY: &str = "finance-storage";

/// What update/delete/contribution calls do when the id is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingIdPolicy {
    /// Return `CoreError::NotFound`
    #[default]
    Reject,
    /// Succeed without touching the store
    Ignore,
}

/// Encoding of the persisted snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    #[default]
    Json,
    /// Compact bincode encoding
    Binary,
}

/// Runtime configuration of the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage_key: String,

    pub missing_id_policy: MissingIdPolicy,

    pub snapshot_format: SnapshotFormat,

    /// Cosmetic delay before the assistant answers
    pub response_delay_ms: u64,

    /// Prefix used when the assistant prints money
    pub currency_symbol: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            missing_id_policy: MissingIdPolicy::default(),
            snapshot_format: SnapshotFormat::default(),
            response_delay_ms: 1000,
            currency_symbol: "R$".to_string(),
        }
    }
}

impl Settings {
    /// Read settings from a JSON file. A missing file yields the defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&raw)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize settings: {e}")))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.storage_key.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Storage key must not be empty".into(),
            ));
        }
        if self
            .storage_key
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '\0'))
        {
            return Err(CoreError::ValidationError(format!(
                "Storage key '{}' contains path separators",
                self.storage_key
            )));
        }
        Ok(())
    }
}
