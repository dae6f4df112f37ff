//! Persisted installation state (`install_state.toml`)
//!
//! A flat TOML document with an `installed` flag. Keys this version doesn't
//! know about are kept when the file is rewritten.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

/// File name of the install state document
pub const INSTALL_STATE_FILE: &str = "install_state.toml";

const INSTALLED_KEY: &str = "installed";

/// Installation state read from disk
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstallState {
    table: Table,
}

impl InstallState {
    /// Default location: `<config dir>/<product>/install_state.toml`
    pub fn default_path(product: &str) -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(product)
            .join(INSTALL_STATE_FILE)
    }

    /// Load the state; a missing file means nothing is installed yet
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let table: Table = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Self { table })
    }

    pub fn installed(&self) -> bool {
        self.table
            .get(INSTALLED_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn set_installed(&mut self, installed: bool) {
        self.table
            .insert(INSTALLED_KEY.to_string(), Value::Boolean(installed));
    }

    /// Write the state, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = toml::to_string(&self.table).context("Failed to serialize install state")?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Record a completed installation, keeping any other keys in the file
    pub fn mark_installed(path: &Path) -> Result<Self> {
        let mut state = Self::load(path)?;
        state.set_installed(true);
        state.save(path)?;
        Ok(state)
    }
}

/// Check the installation state stored at `path`
pub fn check_installation_state(path: &Path) -> bool {
    match InstallState::load(path) {
        Ok(state) => state.installed(),
        Err(e) => {
            tracing::warn!("Ignoring unreadable install state: {:#}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_not_installed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(INSTALL_STATE_FILE);
        assert!(!InstallState::load(&path).unwrap().installed());
        assert!(!check_installation_state(&path));
    }

    #[test]
    fn test_mark_installed_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/launchpad").join(INSTALL_STATE_FILE);

        InstallState::mark_installed(&path).unwrap();

        assert!(check_installation_state(&path));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("installed = true"));
    }

    #[test]
    fn test_mark_installed_preserves_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(INSTALL_STATE_FILE);
        fs::write(&path, "installed = false\nruntime = \"3.11.7\"\n").unwrap();

        let state = InstallState::mark_installed(&path).unwrap();
        assert!(state.installed());

        let reloaded: Table = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded["runtime"].as_str(), Some("3.11.7"));
        assert_eq!(reloaded["installed"].as_bool(), Some(true));
    }

    #[test]
    fn test_corrupt_file_reads_as_not_installed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(INSTALL_STATE_FILE);
        fs::write(&path, "installed = [").unwrap();
        assert!(InstallState::load(&path).is_err());
        assert!(!check_installation_state(&path));
    }
}
