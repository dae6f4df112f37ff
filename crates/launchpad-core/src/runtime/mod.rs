//! Runtime detection and tool management
//!
//! This module provides:
//! - Prerequisite detection (git, curl, pyenv, Python)
//! - Generic tool management for script-installed CLI tools like pyenv
//! - Pinned Python installation through pyenv

pub mod check;
pub mod installer;
pub mod tool;

pub use check::{check_git, check_prerequisites, check_pyenv, check_python, RuntimeInfo};
pub use installer::{InstallOutcome, RuntimeInstaller};
pub use tool::{pyenv_tool, ToolManager};
