//! Project materialization: from a filled-in form to a project directory
//!
//! A request moves through fixed steps, each of which can end it:
//!
//! 1. Validate the app name derived from the formal name
//! 2. Refuse to touch an existing destination directory
//! 3. Build the render context
//! 4. Resolve the template (refreshing its cache)
//! 5. Render the template
//!
//! Nothing is written before step 2 passes, and nothing touches the network
//! before step 4. When the tool is a development build and its version tag has
//! no template branch, steps 3-5 are retried once against the development branch.

use crate::error::{MaterializationError, MaterializationResult};
use crate::identifiers::{is_valid_app_name, DerivedIdentifiers};
use crate::request::ProjectRequest;
use crate::templates::cache::{default_cache_root, TemplateCacheResolver};
use crate::templates::context::{Provenance, RenderContext};
use crate::templates::git::{GitCli, GitClient};
use crate::templates::renderer::TemplateRenderer;
use crate::templates::version::{self, DEVELOPMENT_BRANCH};
use crate::templates::TemplateSource;
use std::path::{Path, PathBuf};

/// Version recorded in generated projects and used to pick template branches
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_UPGRADE_COMMAND: &str = "cargo install launchpad --force";

/// A successfully created project
#[derive(Debug, Clone)]
pub struct CreatedProject {
    pub path: PathBuf,
    pub identifiers: DerivedIdentifiers,
    /// Template branch the project was rendered from
    pub branch: String,
    /// Written files, relative to `path`
    pub files: Vec<PathBuf>,
    /// Non-fatal problems to show the user (stale cache, version mismatch)
    pub warnings: Vec<String>,
}

/// Runs materialization requests against a template cache
pub struct Materializer<G> {
    resolver: TemplateCacheResolver<G>,
    tool_version: String,
    upgrade_command: String,
}

impl Materializer<GitCli> {
    /// Materializer using the system git and the default cache root
    pub fn system() -> Self {
        Self::new(GitCli::new(), default_cache_root(), TOOL_VERSION)
    }
}

impl<G: GitClient> Materializer<G> {
    pub fn new(git: G, cache_root: PathBuf, tool_version: impl Into<String>) -> Self {
        Self {
            resolver: TemplateCacheResolver::new(git, cache_root),
            tool_version: tool_version.into(),
            upgrade_command: DEFAULT_UPGRADE_COMMAND.to_string(),
        }
    }

    pub fn with_upgrade_command(mut self, command: impl Into<String>) -> Self {
        self.upgrade_command = command.into();
        self
    }

    pub fn resolver(&self) -> &TemplateCacheResolver<G> {
        &self.resolver
    }

    pub fn tool_version(&self) -> &str {
        &self.tool_version
    }

    /// Create a new project directory under `output_root` from a template
    pub fn materialize(
        &self,
        request: ProjectRequest,
        output_root: &Path,
        source: &TemplateSource,
    ) -> MaterializationResult<CreatedProject> {
        let identifiers = DerivedIdentifiers::from_formal_name(request.formal_name());
        if !is_valid_app_name(&identifiers.app_name) {
            return Err(MaterializationError::InvalidAppName {
                app_name: identifiers.app_name,
            });
        }

        // Make extra sure we won't clobber an existing application.
        let destination = output_root.join(&identifiers.app_name);
        if destination.exists() {
            return Err(MaterializationError::DestinationExists {
                app_name: identifiers.app_name,
                path: destination,
            });
        }

        let branch = source.branch_for(&self.tool_version);
        match self.generate(&request, &identifiers, output_root, source, &branch) {
            Err(e) if e.is_retryable_with_dev_branch() && self.can_fall_back(source, &branch) => {
                tracing::info!(
                    "Template branch {} not found; falling back to development template",
                    branch
                );
                self.generate(
                    &request,
                    &identifiers,
                    output_root,
                    source,
                    DEVELOPMENT_BRANCH,
                )
            }
            result => result,
        }
    }

    /// Only a development build using its derived branch may use the development template
    fn can_fall_back(&self, source: &TemplateSource, branch: &str) -> bool {
        !source.has_explicit_branch()
            && version::is_development(&self.tool_version)
            && branch != DEVELOPMENT_BRANCH
    }

    fn generate(
        &self,
        request: &ProjectRequest,
        identifiers: &DerivedIdentifiers,
        output_root: &Path,
        source: &TemplateSource,
        branch: &str,
    ) -> MaterializationResult<CreatedProject> {
        let context = RenderContext::for_project(
            request,
            identifiers,
            &Provenance {
                template_source: &source.location,
                template_branch: branch,
                tool_version: &self.tool_version,
            },
        );

        let resolved = self.resolver.resolve(&source.location, branch)?;
        let renderer = TemplateRenderer::new(self.resolver.git(), self.resolver.cache_root());
        let output = renderer.render(
            &resolved.location,
            &source.location,
            branch,
            output_root,
            &context,
        )?;

        let mut warnings = resolved.warnings;
        if let Some(template_version) = output.manifest.version.as_deref() {
            if let Some(warning) = version::check_compatibility(
                &self.tool_version,
                template_version,
                &self.upgrade_command,
            ) {
                tracing::warn!("{}", warning.lines().next().unwrap_or(&warning));
                warnings.push(warning);
            }
        }

        Ok(CreatedProject {
            path: output.project_dir,
            identifiers: identifiers.clone(),
            branch: branch.to_string(),
            files: output.files,
            warnings,
        })
    }
}

/// Materialize a project with the system git client and the default template cache
pub fn materialize_project(
    request: ProjectRequest,
    output_root: &Path,
    template_source: &TemplateSource,
) -> MaterializationResult<CreatedProject> {
    Materializer::system().materialize(request, output_root, template_source)
}
