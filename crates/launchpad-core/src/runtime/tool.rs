//! Generic tool management for CLI tools
//!
//! Provides a reusable abstraction for checking and installing CLI tools
//! like pyenv that ship an install script, plus the streaming shell runner
//! the runtime installer shares.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// Timeout for running an install script
pub const INSTALL_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for a CLI tool
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Name of the tool binary (e.g., "pyenv")
    pub name: &'static str,
    /// Display name for user-facing messages
    pub display_name: &'static str,
    /// URL to the install script
    pub install_script_url: &'static str,
    /// URL to the documentation
    pub docs_url: &'static str,
    /// Location the install script puts the binary when it isn't on PATH yet
    pub fallback_path: Option<PathBuf>,
}

/// Manager for checking and installing CLI tools
pub struct ToolManager {
    config: ToolConfig,
}

impl ToolManager {
    /// Create a new tool manager with the given configuration
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    /// Get the tool configuration
    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Get the install command string
    pub fn install_command(&self) -> String {
        format!("curl -fsSL {} | bash", self.config.install_script_url)
    }

    /// Path of the tool binary: found on PATH, or at the install location
    pub fn executable(&self) -> Option<PathBuf> {
        let on_path = std::process::Command::new("which")
            .arg(self.config.name)
            .output()
            .ok()
            .filter(|output| output.status.success())
            .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
            .filter(|path| !path.is_empty());

        match on_path {
            Some(path) => Some(PathBuf::from(path)),
            None => self
                .config
                .fallback_path
                .clone()
                .filter(|path| path.is_file()),
        }
    }

    /// Check if the tool is installed
    pub fn is_installed(&self) -> bool {
        self.executable().is_some()
    }

    /// Get the installed tool version (if available)
    pub fn get_version(&self) -> Option<String> {
        let executable = self.executable()?;
        std::process::Command::new(executable)
            .arg("--version")
            .output()
            .ok()
            .and_then(|output| {
                if output.status.success() {
                    String::from_utf8(output.stdout)
                        .ok()
                        .map(|s| s.trim().to_string())
                } else {
                    None
                }
            })
    }

    /// Install the tool using its official install script
    /// Shows the command being executed and streams output
    pub async fn install(&self) -> Result<()> {
        let cmd = self.install_command();
        run_streaming(&cmd, INSTALL_TIMEOUT).await.with_context(|| {
            format!(
                "Failed to install {}. Please try installing manually: {}",
                self.config.display_name, cmd
            )
        })
    }

    /// Open the tool's documentation in the default browser
    pub fn open_docs(&self) -> Result<()> {
        println!(
            "{}",
            format!(
                "Opening {} documentation in your browser...",
                self.config.display_name
            )
            .cyan()
        );
        open::that(self.config.docs_url)?;
        Ok(())
    }
}

/// Run a shell command, streaming its output, and fail on timeout or non-zero exit
pub async fn run_streaming(cmd: &str, limit: Duration) -> Result<()> {
    println!();
    println!("{} {}", "Running:".dimmed(), cmd.yellow());
    println!();
    tracing::debug!("sh -c {:?}", cmd);

    let mut child = TokioCommand::new("sh")
        .arg("-c")
        .arg(cmd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to start: {}", cmd))?;

    let stdout = child
        .stdout
        .take()
        .context("Failed to capture stdout")?;
    let stderr = child
        .stderr
        .take()
        .context("Failed to capture stderr")?;

    let mut stdout_reader = BufReader::new(stdout).lines();
    let mut stderr_reader = BufReader::new(stderr).lines();

    // Stream output until stdout closes
    let output_task = async {
        let mut stderr_open = true;
        loop {
            tokio::select! {
                line = stdout_reader.next_line() => {
                    match line {
                        Ok(Some(line)) => println!("  {}", line),
                        Ok(None) => break,
                        Err(e) => {
                            eprintln!("{} {}", "Error reading stdout:".red(), e);
                            break;
                        }
                    }
                }
                line = stderr_reader.next_line(), if stderr_open => {
                    match line {
                        Ok(Some(line)) => eprintln!("  {}", line.yellow()),
                        Ok(None) => stderr_open = false,
                        Err(e) => {
                            eprintln!("{} {}", "Error reading stderr:".red(), e);
                            stderr_open = false;
                        }
                    }
                }
            }
        }
    };

    if timeout(limit, output_task).await.is_err() {
        let _ = child.kill().await;
        println!();
        anyhow::bail!(
            "Timed out after {} seconds. The server may be unreachable; please try again later.",
            limit.as_secs()
        );
    }

    match timeout(Duration::from_secs(5), child.wait()).await {
        Ok(Ok(status)) => {
            println!();
            if status.success() {
                Ok(())
            } else {
                anyhow::bail!("Command failed with exit code: {}", status.code().unwrap_or(-1));
            }
        }
        Ok(Err(e)) => anyhow::bail!("Failed to wait for command: {}", e),
        Err(_) => {
            let _ = child.kill().await;
            anyhow::bail!("Command hung after closing its output");
        }
    }
}

/// Pre-configured tool manager for pyenv
pub fn pyenv_tool() -> ToolManager {
    let root = std::env::var_os("PYENV_ROOT")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".pyenv")));

    ToolManager::new(ToolConfig {
        name: "pyenv",
        display_name: "pyenv",
        install_script_url: "https://pyenv.run",
        docs_url: "https://github.com/pyenv/pyenv#installation",
        fallback_path: root.map(|root| root.join("bin").join("pyenv")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_tool() -> ToolManager {
        ToolManager::new(ToolConfig {
            name: "launchpad-test-no-such-tool",
            display_name: "nothing",
            install_script_url: "https://example.invalid/install.sh",
            docs_url: "https://example.invalid",
            fallback_path: None,
        })
    }

    #[test]
    fn test_install_command_pipes_script() {
        assert_eq!(pyenv_tool().install_command(), "curl -fsSL https://pyenv.run | bash");
    }

    #[test]
    fn test_missing_tool_not_installed() {
        let tool = missing_tool();
        assert!(!tool.is_installed());
        assert!(tool.get_version().is_none());
    }

    #[test]
    fn test_fallback_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = missing_tool().config().clone();
        config.fallback_path = Some(dir.path().join("bin/tool"));
        assert!(!ToolManager::new(config.clone()).is_installed());

        std::fs::create_dir_all(dir.path().join("bin")).unwrap();
        std::fs::write(dir.path().join("bin/tool"), "#!/bin/sh\n").unwrap();
        assert!(ToolManager::new(config).is_installed());
    }

    #[tokio::test]
    async fn test_run_streaming_reports_exit_code() {
        assert!(run_streaming("true", Duration::from_secs(5)).await.is_ok());
        let err = run_streaming("exit 3", Duration::from_secs(5)).await.unwrap_err();
        assert!(err.to_string().contains("exit code: 3"));
    }
}
