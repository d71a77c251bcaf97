use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::processing::config::MagnitudePolicy;

/// Processing preferences persisted between sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingSettings {
    pub threshold: f64,
    pub auto_save_raw: bool,
    pub magnitude_policy: MagnitudePolicy,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            auto_save_raw: false,
            magnitude_policy: MagnitudePolicy::Signed,
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<ProcessingSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            ProcessingSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn processing(&self) -> ProcessingSettings {
        self.data.read().unwrap().clone()
    }

    pub fn update_processing(&self, settings: ProcessingSettings) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        *guard = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &ProcessingSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        let settings = store.processing();
        assert_eq!(settings.threshold, 0.5);
        assert!(!settings.auto_save_raw);
        assert_eq!(settings.magnitude_policy, MagnitudePolicy::Signed);
    }

    #[test]
    fn update_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::new(path.clone()).unwrap();
        store
            .update_processing(ProcessingSettings {
                threshold: 2.5,
                auto_save_raw: true,
                magnitude_policy: MagnitudePolicy::Absolute,
            })
            .unwrap();

        let reopened = SettingsStore::new(path).unwrap();
        let settings = reopened.processing();
        assert_eq!(settings.threshold, 2.5);
        assert!(settings.auto_save_raw);
        assert_eq!(settings.magnitude_policy, MagnitudePolicy::Absolute);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.processing().threshold, 0.5);
    }
}
