//! Prerequisite detection for git, curl, pyenv and Python

use anyhow::Result;
use std::process::Command;

/// Runtime detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

/// Run `<program> --version` and report what it says
fn probe(name: &'static str, program: &str) -> RuntimeInfo {
    match Command::new(program).arg("--version").output() {
        Ok(out) if out.status.success() => {
            // Some tools (older Pythons) print their version on stderr
            let text = if out.stdout.is_empty() {
                out.stderr
            } else {
                out.stdout
            };
            let version = String::from_utf8_lossy(&text)
                .lines()
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            RuntimeInfo {
                name,
                version: Some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name,
            version: None,
            available: false,
        },
    }
}

/// Check if git is available
pub fn check_git() -> RuntimeInfo {
    probe("git", "git")
}

/// Check if curl is available
pub fn check_curl() -> RuntimeInfo {
    probe("curl", "curl")
}

/// Check if pyenv is available on PATH
pub fn check_pyenv() -> RuntimeInfo {
    probe("pyenv", "pyenv")
}

/// Check if Python 3 is available
pub fn check_python() -> RuntimeInfo {
    probe("Python 3", "python3")
}

/// Check the tools project creation needs; fails listing everything that is missing
///
/// git is required to fetch templates; curl only when pyenv still has to be installed.
/// pyenv and Python are reported when present but never required here.
pub fn check_prerequisites(need_installer: bool) -> Result<Vec<RuntimeInfo>> {
    let mut results = Vec::new();
    let mut missing = Vec::new();

    let git = check_git();
    if !git.available {
        missing.push("git (install from https://git-scm.com)");
    }
    results.push(git);

    if need_installer {
        let curl = check_curl();
        if !curl.available {
            missing.push("curl (install with your system package manager)");
        }
        results.push(curl);
    }

    results.extend(
        [check_pyenv(), check_python()]
            .into_iter()
            .filter(|info| info.available),
    );

    if !missing.is_empty() {
        anyhow::bail!(
            "Missing required tools:\n{}",
            missing
                .iter()
                .map(|m| format!("  - {}", m))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_missing_program() {
        let info = probe("nothing", "launchpad-test-no-such-program");
        assert!(!info.available);
        assert!(info.version.is_none());
        assert_eq!(info.name, "nothing");
    }
}
