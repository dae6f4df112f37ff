//! Template resolution, caching, and rendering
//!
//! This module provides:
//! - Template sources (local directory, git repository URL plus branch, or
//!   the template compiled into the tool)
//! - A git-backed template cache keyed by repository name
//! - Template manifests and placeholder substitution
//! - Template rendering into a new project directory
//! - Version-derived template branches and compatibility checking

pub mod builtin;
pub mod cache;
pub mod context;
pub mod git;
pub mod manifest;
pub mod renderer;
pub mod version;

use crate::product::ProductConfig;

pub use builtin::BUILTIN_TEMPLATE;
pub use cache::{
    cookiecutter_cache_path, default_cache_root, is_repo_url, ResolvedTemplate,
    TemplateCacheResolver, TemplateLocation,
};
pub use context::{Provenance, RenderContext};
pub use git::{GitCli, GitClient, GitError};
pub use manifest::TemplateManifest;
pub use renderer::{RenderOutput, TemplateRenderer};
pub use version::check_compatibility;

/// Template location plus the branch to use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    /// Local directory path, repository URL, or [`BUILTIN_TEMPLATE`]
    pub location: String,
    /// Explicit branch; `None` means the branch derived from the tool version
    pub branch: Option<String>,
}

impl TemplateSource {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            branch: None,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Template source from a product config, honoring its URL override env var
    pub fn from_config<C: ProductConfig>(config: &C) -> Self {
        let location = std::env::var(config.template_url_env())
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| config.default_template_url().to_string());
        Self::new(location)
    }

    /// Whether the branch was chosen explicitly rather than derived
    pub fn has_explicit_branch(&self) -> bool {
        self.branch.is_some()
    }

    /// Branch to check out for a given tool version
    pub fn branch_for(&self, tool_version: &str) -> String {
        self.branch
            .clone()
            .unwrap_or_else(|| version::default_branch(tool_version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_defaults_to_tool_version_tag() {
        let source = TemplateSource::new("https://example.com/template.git");
        assert_eq!(source.branch_for("0.4.2"), "v0.4.2");
        assert!(!source.has_explicit_branch());
    }

    #[test]
    fn test_explicit_branch_wins() {
        let source = TemplateSource::new("/tmp/template").with_branch("feature");
        assert_eq!(source.branch_for("0.4.2"), "feature");
        assert!(source.has_explicit_branch());
    }
}
