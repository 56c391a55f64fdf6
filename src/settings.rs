use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::joints::JointId;
use crate::session::state::{DEFAULT_DURATION_SECS, DEFAULT_MIN_VISIBILITY};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssessmentSettings {
    /// Length of the observation window.
    pub duration_secs: u32,
    /// Landmarks reported below this visibility are treated as absent.
    pub min_visibility: f32,
    pub default_joint: JointId,
    /// Publish a snapshot every N countdown ticks.
    pub heartbeat_every_ticks: u32,
}

impl Default for AssessmentSettings {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            min_visibility: DEFAULT_MIN_VISIBILITY,
            default_joint: JointId::default(),
            heartbeat_every_ticks: 1,
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<AssessmentSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            AssessmentSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn get(&self) -> AssessmentSettings {
        self.read().clone()
    }

    pub fn update(&self, settings: AssessmentSettings) -> Result<()> {
        let mut guard = self.write();
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: AssessmentSettings = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid settings in {}", self.path.display()))?;
        *self.write() = data;
        Ok(())
    }

    fn persist(&self, data: &AssessmentSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, AssessmentSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, AssessmentSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
