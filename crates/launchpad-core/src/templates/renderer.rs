//! Template expansion into a new project directory

use super::cache::{cache_path_in, TemplateLocation};
use super::context::RenderContext;
use super::git::{GitClient, DEFAULT_REMOTE};
use super::manifest::{TemplateManifest, MANIFEST_FILE};
use crate::error::{MaterializationError, MaterializationResult};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Files of the template that were written into the project
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// Root directory of the generated project
    pub project_dir: PathBuf,
    /// Paths of written files, relative to `project_dir`
    pub files: Vec<PathBuf>,
    pub manifest: TemplateManifest,
}

/// Expands templates, cloning remote ones into the cache first
pub struct TemplateRenderer<'a, G> {
    git: &'a G,
    cache_root: &'a Path,
}

impl<'a, G: GitClient> TemplateRenderer<'a, G> {
    pub fn new(git: &'a G, cache_root: &'a Path) -> Self {
        Self { git, cache_root }
    }

    /// Render a resolved template into `output_root`
    ///
    /// The project directory is created under `output_root`, named after the
    /// manifest's `project_dir` with placeholders substituted.
    pub fn render(
        &self,
        location: &TemplateLocation,
        template: &str,
        branch: &str,
        output_root: &Path,
        context: &RenderContext,
    ) -> MaterializationResult<RenderOutput> {
        let template_dir = match location {
            TemplateLocation::Local(path) | TemplateLocation::Cached(path) => path.clone(),
            TemplateLocation::Remote(url) => self.clone_template(url, branch)?,
        };

        let manifest = TemplateManifest::load(&template_dir, template)?;
        render_directory(&template_dir, &manifest, output_root, context)
    }

    /// Clone a remote template into its cache entry and check out `branch`
    fn clone_template(&self, url: &str, branch: &str) -> MaterializationResult<PathBuf> {
        let dest = cache_path_in(self.cache_root, url)?;
        if dest.parent() != Some(self.cache_root) {
            return Err(MaterializationError::InvalidTemplateRepository {
                template: url.to_string(),
            });
        }

        if dest.exists() {
            // Only a checkout left over from an interrupted clone is ours to replace
            if !dest.join(".git").exists() {
                return Err(MaterializationError::AmbiguousCacheState { path: dest });
            }
            tracing::info!("Replacing unusable template cache {}", dest.display());
            fs::remove_dir_all(&dest).map_err(|e| MaterializationError::io(&dest, e))?;
        }
        fs::create_dir_all(self.cache_root)
            .map_err(|e| MaterializationError::io(self.cache_root, e))?;

        tracing::info!("Cloning template {} into {}", url, dest.display());
        self.git.clone_repo(url, &dest).map_err(|e| {
            tracing::warn!("Template clone failed: {}", e);
            MaterializationError::NetworkFailure {
                operation: "clone template repository".to_string(),
            }
        })?;

        let reference = format!("{}/{}", DEFAULT_REMOTE, branch);
        self.git.checkout(&dest, &reference).map_err(|e| {
            tracing::debug!("Checkout of {} failed: {}", reference, e);
            MaterializationError::TemplateUnsupportedVersion {
                branch: branch.to_string(),
            }
        })?;

        Ok(dest)
    }
}

/// Expand the manifest's project directory from `template_dir` into `output_root`
///
/// Every key the manifest lists must be in the context; this is checked
/// before anything is written. Placeholders left unmatched in a path or text
/// file fail the render.
pub fn render_directory(
    template_dir: &Path,
    manifest: &TemplateManifest,
    output_root: &Path,
    context: &RenderContext,
) -> MaterializationResult<RenderOutput> {
    if let Some(key) = context.missing_keys(&manifest.variables).first() {
        return Err(MaterializationError::MissingContextKey {
            placeholder: key.to_uppercase(),
            location: MANIFEST_FILE.to_string(),
        });
    }

    let source_root = template_dir.join(&manifest.project_dir);
    if !source_root.is_dir() {
        return Err(MaterializationError::MissingTemplateFile { path: source_root });
    }

    let project_name = substitute_checked(context, &manifest.project_dir, MANIFEST_FILE)?;
    let project_dir = output_root.join(&project_name);
    if project_dir.exists() {
        return Err(MaterializationError::DestinationExists {
            app_name: project_name,
            path: project_dir,
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&source_root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(&source_root).to_path_buf();
            MaterializationError::io(path, e.into())
        })?;

        let relative = entry
            .path()
            .strip_prefix(&source_root)
            .unwrap_or(entry.path());
        let relative_str = relative.to_string_lossy();
        let rendered_relative = substitute_checked(context, &relative_str, &relative_str)?;
        let target = if rendered_relative.is_empty() {
            project_dir.clone()
        } else {
            project_dir.join(&rendered_relative)
        };

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| MaterializationError::io(&target, e))?;
            continue;
        }

        let bytes = fs::read(entry.path()).map_err(|e| MaterializationError::io(entry.path(), e))?;
        let contents = match String::from_utf8(bytes) {
            Ok(text) => substitute_checked(context, &text, &relative_str)?.into_bytes(),
            // Binary files are copied as-is
            Err(e) => e.into_bytes(),
        };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| MaterializationError::io(parent, e))?;
        }
        fs::write(&target, contents).map_err(|e| MaterializationError::io(&target, e))?;
        files.push(PathBuf::from(rendered_relative));
    }

    Ok(RenderOutput {
        project_dir,
        files,
        manifest: manifest.clone(),
    })
}

fn substitute_checked(
    context: &RenderContext,
    text: &str,
    location: &str,
) -> MaterializationResult<String> {
    let (rendered, unmatched) = context.substitute(text);
    match unmatched.into_iter().next() {
        Some(placeholder) => Err(MaterializationError::MissingContextKey {
            placeholder,
            location: location.to_string(),
        }),
        None => Ok(rendered),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn sample_template(root: &Path) {
        write(
            &root.join(MANIFEST_FILE),
            "name: Sample\nvariables: [app_name, project_name]\n",
        );
        write(
            &root.join("{{APP_NAME}}/pyproject.toml"),
            "[project]\nname = \"{{PROJECT_NAME}}\"\n",
        );
        write(
            &root.join("{{APP_NAME}}/src/{{APP_NAME}}/__init__.py"),
            "# {{PROJECT_NAME}}\n",
        );
    }

    fn context() -> RenderContext {
        let mut ctx = RenderContext::new();
        ctx.insert("app_name", "demo").insert("project_name", "Demo App");
        ctx
    }

    #[test]
    fn test_render_substitutes_paths_and_contents() {
        let template = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        sample_template(template.path());

        let manifest = TemplateManifest::load(template.path(), "sample").unwrap();
        let result = render_directory(template.path(), &manifest, output.path(), &context()).unwrap();

        assert_eq!(result.project_dir, output.path().join("demo"));
        let pyproject = fs::read_to_string(output.path().join("demo/pyproject.toml")).unwrap();
        assert_eq!(pyproject, "[project]\nname = \"Demo App\"\n");
        assert!(output.path().join("demo/src/demo/__init__.py").is_file());
        assert_eq!(result.files.len(), 2);
    }

    #[test]
    fn test_missing_manifest_variable_fails_before_writing() {
        let template = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        sample_template(template.path());
        write(
            &template.path().join(MANIFEST_FILE),
            "name: Sample\nvariables: [app_name, author]\n",
        );

        let manifest = TemplateManifest::load(template.path(), "sample").unwrap();
        let err = render_directory(template.path(), &manifest, output.path(), &context()).unwrap_err();

        assert!(matches!(
            err,
            MaterializationError::MissingContextKey { ref placeholder, .. } if placeholder == "AUTHOR"
        ));
        assert!(!output.path().join("demo").exists());
    }

    #[test]
    fn test_unmatched_placeholder_in_file_fails() {
        let template = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        sample_template(template.path());
        write(
            &template.path().join("{{APP_NAME}}/README.md"),
            "Written by {{AUTHOR}}",
        );

        let manifest = TemplateManifest::load(template.path(), "sample").unwrap();
        let err = render_directory(template.path(), &manifest, output.path(), &context()).unwrap_err();
        assert_eq!(err.kind(), "MissingContextKey");
        assert!(err.to_string().contains("README.md"));
    }

    #[test]
    fn test_binary_files_copied_verbatim() {
        let template = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        sample_template(template.path());
        let icon = [0x89u8, 0x50, 0x4e, 0x47, 0xff, 0xfe, b'{', b'{'];
        fs::write(template.path().join("{{APP_NAME}}/icon.png"), icon).unwrap();

        let manifest = TemplateManifest::load(template.path(), "sample").unwrap();
        render_directory(template.path(), &manifest, output.path(), &context()).unwrap();

        assert_eq!(fs::read(output.path().join("demo/icon.png")).unwrap(), icon);
    }

    #[test]
    fn test_missing_project_dir_is_missing_template_file() {
        let template = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(&template.path().join(MANIFEST_FILE), "name: Empty\n");

        let manifest = TemplateManifest::load(template.path(), "empty").unwrap();
        let err = render_directory(template.path(), &manifest, output.path(), &context()).unwrap_err();
        assert_eq!(err.kind(), "MissingTemplateFile");
    }
}
