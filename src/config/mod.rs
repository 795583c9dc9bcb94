use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{app_data_dir, config_file},
    errors::FinanceError,
    utils::persistence::{ensure_dir, write_atomic},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub default_account: String,
    pub default_alert_threshold: f64,
    pub backup_retention: usize,
    pub auto_backup: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_opened_ledger: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_account: "default".into(),
            default_alert_threshold: crate::ledger::budget::DEFAULT_ALERT_THRESHOLD,
            backup_retention: 5,
            auto_backup: true,
            data_dir: None,
            last_opened_ledger: None,
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, FinanceError> {
        ensure_dir(&app_data_dir())?;
        Ok(Self {
            path: config_file(),
        })
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the stored configuration, falling back to defaults when none
    /// has been written yet.
    pub fn load(&self) -> Result<Config, FinanceError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), FinanceError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
