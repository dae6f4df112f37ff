//! Pinned Python runtime installation through pyenv

use super::tool::{run_streaming, ToolManager};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

/// Building Python from source takes a while
const RUNTIME_INSTALL_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// What `ensure_installed` had to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    AlreadyInstalled,
    Installed,
}

/// Installs a pinned Python version with pyenv and makes it the global default
pub struct RuntimeInstaller {
    pyenv: PathBuf,
    version: String,
}

impl RuntimeInstaller {
    pub fn new(pyenv: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            pyenv: pyenv.into(),
            version: version.into(),
        }
    }

    /// Installer using the pyenv binary a tool manager found
    pub fn from_tool(tool: &ToolManager, version: impl Into<String>) -> Result<Self> {
        let pyenv = tool.executable().with_context(|| {
            format!(
                "{} is not installed. Install it with: {}",
                tool.config().display_name,
                tool.install_command()
            )
        })?;
        Ok(Self::new(pyenv, version))
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Check whether the pinned version is among pyenv's installed versions
    pub fn is_installed(&self) -> Result<bool> {
        let output = Command::new(&self.pyenv)
            .args(["versions", "--bare", "--skip-aliases"])
            .output()
            .with_context(|| format!("Failed to run {}", self.pyenv.display()))?;

        if !output.status.success() {
            anyhow::bail!(
                "pyenv versions failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(has_version(&String::from_utf8_lossy(&output.stdout), &self.version))
    }

    /// Build and install the pinned version, streaming pyenv's output
    pub async fn install(&self) -> Result<()> {
        let cmd = format!("{} install --skip-existing {}", self.pyenv.display(), self.version);
        run_streaming(&cmd, RUNTIME_INSTALL_TIMEOUT)
            .await
            .with_context(|| format!("Failed to install Python {}", self.version))
    }

    /// Make the pinned version pyenv's global default
    pub fn set_global(&self) -> Result<()> {
        let status = Command::new(&self.pyenv)
            .args(["global", &self.version])
            .status()
            .with_context(|| format!("Failed to run {}", self.pyenv.display()))?;
        if !status.success() {
            anyhow::bail!("pyenv global {} failed", self.version);
        }
        Ok(())
    }

    /// Install the pinned version if needed and set it as global
    pub async fn ensure_installed(&self) -> Result<InstallOutcome> {
        let outcome = if self.is_installed()? {
            tracing::info!("Python {} is already installed", self.version);
            InstallOutcome::AlreadyInstalled
        } else {
            self.install().await?;
            InstallOutcome::Installed
        };
        self.set_global()?;
        Ok(outcome)
    }
}

/// Whether `pyenv versions --bare` output lists `version`
fn has_version(listing: &str, version: &str) -> bool {
    listing.lines().any(|line| line.trim() == version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_version() {
        let listing = "3.10.13\n3.11.7\n3.12.1\n";
        assert!(has_version(listing, "3.11.7"));
        assert!(!has_version(listing, "3.11"));
        assert!(!has_version("", "3.11.7"));
    }

    #[test]
    fn test_missing_pyenv_is_an_error() {
        let installer = RuntimeInstaller::new("/nonexistent/pyenv", "3.11.7");
        assert!(installer.is_installed().is_err());
        assert!(installer.set_global().is_err());
    }
}
