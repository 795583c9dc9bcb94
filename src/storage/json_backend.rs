use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{canonical_name, ledgers_dir},
    errors::FinanceError,
    ledger::Ledger,
    utils::persistence::{ensure_dir, write_atomic},
};

use super::{Result, StorageBackend};

const LEDGER_EXTENSION: &str = "json";

/// JSON document store: one pretty-printed file per ledger under the managed
/// data directory, written atomically.
#[derive(Debug, Clone)]
pub struct JsonStore {
    ledgers_dir: PathBuf,
}

impl JsonStore {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let ledgers_dir = root.unwrap_or_else(ledgers_dir);
        ensure_dir(&ledgers_dir)?;
        Ok(Self { ledgers_dir })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn ledger_path(&self, name: &str) -> PathBuf {
        self.ledgers_dir
            .join(format!("{}.{}", canonical_name(name), LEDGER_EXTENSION))
    }

    pub fn save_to_path(ledger: &Ledger, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(ledger)?;
        write_atomic(path, &json)?;
        Ok(())
    }

    pub fn load_from_path(path: &Path) -> Result<Ledger> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

impl StorageBackend for JsonStore {
    fn save(&self, ledger: &Ledger) -> Result<()> {
        let path = self.ledger_path(&ledger.name);
        Self::save_to_path(ledger, &path)?;
        tracing::info!(ledger = %ledger.name, path = %path.display(), "ledger saved");
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Ledger> {
        let path = self.ledger_path(name);
        if !path.exists() {
            return Err(FinanceError::NotFound(format!("ledger `{name}`")));
        }
        Self::load_from_path(&path)
            .map_err(|err| FinanceError::Repository(format!("failed to load `{name}`: {err}")))
    }

    fn delete(&self, name: &str) -> Result<()> {
        let path = self.ledger_path(name);
        if !path.exists() {
            return Err(FinanceError::NotFound(format!("ledger `{name}`")));
        }
        fs::remove_file(&path)?;
        tracing::info!(ledger = %name, "ledger deleted");
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        if !self.ledgers_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.ledgers_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(LEDGER_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
