//! Persisted settings and default locations

pub mod install_state;

use anyhow::{Context, Result};
use std::path::PathBuf;

pub use install_state::{check_installation_state, InstallState};

/// Default folder new projects are created in: `~/Documents/GitHub`
pub fn default_project_folder() -> PathBuf {
    dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("GitHub")
}

/// Make sure the project folder exists and return it
pub fn ensure_project_folder(folder: Option<PathBuf>) -> Result<PathBuf> {
    let folder = folder.unwrap_or_else(default_project_folder);
    std::fs::create_dir_all(&folder)
        .with_context(|| format!("Failed to create project folder {}", folder.display()))?;
    Ok(folder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_project_folder_ends_with_github() {
        assert!(default_project_folder().ends_with("GitHub"));
    }

    #[test]
    fn test_ensure_project_folder_creates_it() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("a/b/GitHub");
        let created = ensure_project_folder(Some(folder.clone())).unwrap();
        assert_eq!(created, folder);
        assert!(folder.is_dir());
    }
}
