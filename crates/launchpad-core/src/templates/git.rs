//! Version-control boundary used by the template cache
//!
//! [`GitClient`] exposes the handful of git operations the resolver and
//! renderer need. [`GitCli`] implements it by running the `git` binary;
//! tests substitute an in-memory fake.

use std::path::Path;
use std::process::{Command, Output};
use thiserror::Error;

/// Remote that template caches track
pub const DEFAULT_REMOTE: &str = "origin";

/// Failure of a single git invocation
#[derive(Debug, Error)]
pub enum GitError {
    /// The git binary could not be started
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    /// git ran and exited unsuccessfully
    #[error("git {command} failed ({status}): {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
}

/// Commit a ref points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub sha: String,
    /// Committer date, as formatted by git
    pub date: String,
}

/// Git operations needed to keep a template cache current
pub trait GitClient {
    /// Whether `path` is the top of a git working tree
    fn is_repository(&self, path: &Path) -> bool;

    /// URL of a named remote, `None` if the remote is not configured
    fn remote_url(&self, repo: &Path, remote: &str) -> Result<Option<String>, GitError>;

    /// Fetch updates from a remote
    fn fetch(&self, repo: &Path, remote: &str) -> Result<(), GitError>;

    /// Resolve a ref (e.g. `origin/v0.1.0`) to a commit, `None` if it doesn't exist
    fn resolve_ref(&self, repo: &Path, reference: &str) -> Result<Option<CommitInfo>, GitError>;

    /// Check out a ref in the working tree
    fn checkout(&self, repo: &Path, reference: &str) -> Result<(), GitError>;

    /// Clone a repository into `dest`
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), GitError>;
}

/// [`GitClient`] backed by the `git` executable
#[derive(Debug, Clone, Default)]
pub struct GitCli;

impl GitCli {
    pub fn new() -> Self {
        Self
    }

    /// Check if git is available in PATH
    pub fn is_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn run(&self, cwd: Option<&Path>, args: &[&str]) -> Result<Output, GitError> {
        tracing::debug!("git {}", args.join(" "));
        let mut cmd = Command::new("git");
        if let Some(dir) = cwd {
            cmd.arg("-C").arg(dir);
        }
        // Never block on a credential prompt
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        Ok(cmd.args(args).output()?)
    }

    fn run_checked(&self, cwd: Option<&Path>, args: &[&str]) -> Result<Output, GitError> {
        let output = self.run(cwd, args)?;
        if output.status.success() {
            Ok(output)
        } else {
            Err(GitError::Failed {
                command: args.first().copied().unwrap_or_default().to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl GitClient for GitCli {
    fn is_repository(&self, path: &Path) -> bool {
        if !path.is_dir() {
            return false;
        }
        // A plain directory nested in some other checkout is not a cache entry
        match self.run(Some(path), &["rev-parse", "--show-toplevel"]) {
            Ok(out) if out.status.success() => {
                let toplevel = String::from_utf8_lossy(&out.stdout).trim().to_string();
                match (
                    Path::new(&toplevel).canonicalize(),
                    path.canonicalize(),
                ) {
                    (Ok(a), Ok(b)) => a == b,
                    _ => false,
                }
            }
            _ => false,
        }
    }

    fn remote_url(&self, repo: &Path, remote: &str) -> Result<Option<String>, GitError> {
        let output = self.run(Some(repo), &["remote", "get-url", remote])?;
        if output.status.success() {
            Ok(Some(
                String::from_utf8_lossy(&output.stdout).trim().to_string(),
            ))
        } else {
            Ok(None)
        }
    }

    fn fetch(&self, repo: &Path, remote: &str) -> Result<(), GitError> {
        self.run_checked(Some(repo), &["fetch", "--quiet", "--tags", remote])?;
        Ok(())
    }

    fn resolve_ref(&self, repo: &Path, reference: &str) -> Result<Option<CommitInfo>, GitError> {
        let output = self.run(
            Some(repo),
            &[
                "log",
                "-1",
                "--format=%H%n%cd",
                "--date=local",
                reference,
                "--",
            ],
        )?;
        if !output.status.success() {
            return Ok(None);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut lines = stdout.lines();
        match (lines.next(), lines.next()) {
            (Some(sha), date) if !sha.is_empty() => Ok(Some(CommitInfo {
                sha: sha.to_string(),
                date: date.unwrap_or_default().to_string(),
            })),
            _ => Ok(None),
        }
    }

    fn checkout(&self, repo: &Path, reference: &str) -> Result<(), GitError> {
        self.run_checked(Some(repo), &["checkout", "--quiet", "--detach", reference])?;
        Ok(())
    }

    fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), GitError> {
        let dest = dest.to_string_lossy();
        self.run_checked(None, &["clone", "--quiet", url, dest.as_ref()])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_directory_is_not_repository() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!GitCli::new().is_repository(dir.path()));
    }

    #[test]
    fn test_missing_directory_is_not_repository() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!GitCli::new().is_repository(&dir.path().join("nope")));
    }

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .arg("-C")
            .arg(dir)
            .args([
                "-c",
                "user.name=Launchpad Tests",
                "-c",
                "user.email=tests@example.com",
                "-c",
                "commit.gpgsign=false",
            ])
            .args(args)
            .status()
            .unwrap();
        assert!(status.success(), "git {:?} failed", args);
    }

    #[test]
    fn test_clone_and_resolve_against_local_remote() {
        if !GitCli::is_available() {
            eprintln!("git not found, skipping");
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let remote = dir.path().join("remote");
        std::fs::create_dir(&remote).unwrap();
        git(&remote, &["init", "--quiet"]);
        git(&remote, &["symbolic-ref", "HEAD", "refs/heads/v0.1.0"]);
        std::fs::write(remote.join("template.yaml"), "name: sample\n").unwrap();
        git(&remote, &["add", "template.yaml"]);
        git(&remote, &["commit", "--quiet", "-m", "Add template"]);

        let client = GitCli::new();
        let checkout = dir.path().join("cache").join("remote");
        client
            .clone_repo(&remote.to_string_lossy(), &checkout)
            .unwrap();

        assert!(client.is_repository(&checkout));
        assert!(client
            .remote_url(&checkout, DEFAULT_REMOTE)
            .unwrap()
            .is_some());
        assert_eq!(client.remote_url(&checkout, "upstream").unwrap(), None);
        client.fetch(&checkout, DEFAULT_REMOTE).unwrap();

        let commit = client
            .resolve_ref(&checkout, "origin/v0.1.0")
            .unwrap()
            .expect("branch exists on the remote");
        assert_eq!(commit.sha.len(), 40);
        assert!(!commit.date.is_empty());
        assert_eq!(client.resolve_ref(&checkout, "origin/v9.9.9").unwrap(), None);

        client.checkout(&checkout, "origin/v0.1.0").unwrap();
        assert!(checkout.join("template.yaml").is_file());
        assert!(client.checkout(&checkout, "origin/v9.9.9").is_err());
    }

    #[test]
    fn test_failed_error_message() {
        let err = GitError::Failed {
            command: "fetch".to_string(),
            status: "exit status: 128".to_string(),
            stderr: "Could not resolve host".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "git fetch failed (exit status: 128): Could not resolve host"
        );
    }
}
