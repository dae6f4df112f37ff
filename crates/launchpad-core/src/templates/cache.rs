//! Template cache resolution
//!
//! Remote templates are kept as git checkouts under a cache root
//! (`~/.cookiecutters` by default), one directory per repository name. Before
//! a template is rendered its cache entry is refreshed and switched to the
//! requested branch. Local template paths bypass the cache entirely.

use super::builtin::{extract_builtin_template, BUILTIN_TEMPLATE};
use super::git::{GitClient, DEFAULT_REMOTE};
use crate::error::{MaterializationError, MaterializationResult};
use std::path::{Path, PathBuf};

/// Directory under the home directory that holds template checkouts
pub const CACHE_DIR_NAME: &str = ".cookiecutters";

/// Default cache root: `~/.cookiecutters`
pub fn default_cache_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CACHE_DIR_NAME)
}

/// Check whether a template location is a repository URL rather than a path
///
/// Accepts `http(s)://`, `git://`, `ssh://` and `file://` URLs (optionally
/// prefixed with `git+` or `hg+`) and scp-style `user@host:path` locations.
pub fn is_repo_url(template: &str) -> bool {
    let without_vcs = template
        .strip_prefix("git+")
        .or_else(|| template.strip_prefix("hg+"))
        .unwrap_or(template);

    if ["https://", "http://", "git://", "ssh://", "file://"]
        .iter()
        .any(|scheme| without_vcs.starts_with(scheme))
    {
        return true;
    }

    // scp-like syntax: git@github.com:org/repo.git
    match template.split_once('@') {
        Some((user, rest)) => {
            !user.is_empty()
                && user
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
                && rest
                    .split_once(':')
                    .map(|(host, _)| {
                        !host.is_empty()
                            && host
                                .chars()
                                .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == '_')
                    })
                    .unwrap_or(false)
        }
        None => false,
    }
}

/// Name of the cache entry for a template URL
///
/// `https://host/org/repo.git/` and `https://host/org/repo.git` both give `repo`.
/// Returns `None` when the URL has no usable last segment (`git@host:`,
/// `https://host/org/..`), since such a name would point outside its own entry.
pub fn cache_entry_name(template: &str) -> Option<String> {
    let trimmed = template.trim_end_matches('/');
    let tail = trimmed
        .rsplit(|c: char| c == '/' || c == ':')
        .next()
        .unwrap_or(trimmed);
    let name = tail.strip_suffix(".git").unwrap_or(tail);

    let usable = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(|c: char| c == '/' || c == '\\' || c == '\0');
    usable.then(|| name.to_string())
}

/// Cache directory the template checkout lives in, under `cache_root`
pub fn cache_path_in(cache_root: &Path, template: &str) -> MaterializationResult<PathBuf> {
    cache_entry_name(template)
        .map(|name| cache_root.join(name))
        .ok_or_else(|| MaterializationError::InvalidTemplateRepository {
            template: template.to_string(),
        })
}

/// Cache directory for a template under the default cache root
pub fn cookiecutter_cache_path(template: &str) -> MaterializationResult<PathBuf> {
    cache_path_in(&default_cache_root(), template)
}

/// Where a template will be rendered from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateLocation {
    /// A local directory given by the user; never cached or fetched
    Local(PathBuf),
    /// An existing cache entry, refreshed and checked out at the branch
    Cached(PathBuf),
    /// A repository URL with no usable cache; the renderer clones it
    Remote(String),
}

/// Result of resolving a template
#[derive(Debug, Clone)]
pub struct ResolvedTemplate {
    pub location: TemplateLocation,
    /// Non-fatal problems, e.g. a cache that could not be refreshed
    pub warnings: Vec<String>,
}

impl ResolvedTemplate {
    fn new(location: TemplateLocation) -> Self {
        Self {
            location,
            warnings: Vec::new(),
        }
    }
}

/// Keeps template checkouts under a cache root up to date
pub struct TemplateCacheResolver<G> {
    git: G,
    cache_root: PathBuf,
}

impl<G: GitClient> TemplateCacheResolver<G> {
    pub fn new(git: G, cache_root: PathBuf) -> Self {
        Self { git, cache_root }
    }

    pub fn git(&self) -> &G {
        &self.git
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Cache directory for a template under this resolver's root
    pub fn cache_path(&self, template: &str) -> MaterializationResult<PathBuf> {
        cache_path_in(&self.cache_root, template)
    }

    /// Ensure we have a current checkout of a template
    ///
    /// A fetch failure (e.g. offline) only produces a warning and the possibly
    /// stale cache is used. A branch missing from the cache fails with
    /// `TemplateUnsupportedVersion`.
    pub fn resolve(&self, template: &str, branch: &str) -> MaterializationResult<ResolvedTemplate> {
        if template == BUILTIN_TEMPLATE {
            let dir = extract_builtin_template(&self.cache_root)?;
            return Ok(ResolvedTemplate::new(TemplateLocation::Local(dir)));
        }
        if !is_repo_url(template) {
            return Ok(ResolvedTemplate::new(TemplateLocation::Local(
                PathBuf::from(template),
            )));
        }

        let cached = self.cache_path(template)?;
        if !cached.exists() {
            tracing::debug!("No template cache at {}", cached.display());
            return Ok(ResolvedTemplate::new(TemplateLocation::Remote(
                template.to_string(),
            )));
        }
        if !self.git.is_repository(&cached) {
            tracing::debug!(
                "Template cache {} is not a git repository; using {} directly",
                cached.display(),
                template
            );
            return Ok(ResolvedTemplate::new(TemplateLocation::Remote(
                template.to_string(),
            )));
        }

        let ambiguous = || MaterializationError::AmbiguousCacheState {
            path: cached.clone(),
        };

        match self.git.remote_url(&cached, DEFAULT_REMOTE) {
            Ok(Some(_)) => {}
            Ok(None) | Err(_) => return Err(ambiguous()),
        }

        let mut resolved = ResolvedTemplate::new(TemplateLocation::Cached(cached.clone()));

        if let Err(e) = self.git.fetch(&cached, DEFAULT_REMOTE) {
            // Offline or the remote is unreachable; keep going with what we have.
            tracing::warn!("Unable to update template cache {}: {}", cached.display(), e);
            resolved.warnings.push(format!(
                "Unable to update the template cache ({}); the template may be out of date",
                e
            ));
        }

        let reference = format!("{}/{}", DEFAULT_REMOTE, branch);
        let head = match self.git.resolve_ref(&cached, &reference) {
            Ok(Some(head)) => head,
            Ok(None) => {
                return Err(MaterializationError::TemplateUnsupportedVersion {
                    branch: branch.to_string(),
                })
            }
            Err(_) => return Err(ambiguous()),
        };

        tracing::info!(
            "Using existing template (sha {}, updated {})",
            head.sha,
            head.date
        );
        self.git
            .checkout(&cached, &reference)
            .map_err(|_| ambiguous())?;

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_urls() {
        assert!(is_repo_url("https://github.com/org/repo.git"));
        assert!(is_repo_url("http://example.com/repo"));
        assert!(is_repo_url("git@github.com:NADOOIT/template.git"));
        assert!(is_repo_url("git+ssh://git@host/repo"));
        assert!(is_repo_url("file:///srv/templates/repo.git"));
    }

    #[test]
    fn test_local_paths_are_not_repo_urls() {
        assert!(!is_repo_url("/home/me/templates/app"));
        assert!(!is_repo_url("./templates"));
        assert!(!is_repo_url("C:\\templates\\app"));
        assert!(!is_repo_url("templates/user@example"));
    }

    #[test]
    fn test_cache_path_ignores_trailing_slash() {
        let root = Path::new("/cache");
        assert_eq!(
            cache_path_in(root, "https://host/org/repo.git").unwrap(),
            cache_path_in(root, "https://host/org/repo.git/").unwrap()
        );
        assert_eq!(
            cache_path_in(root, "https://host/org/repo.git").unwrap(),
            PathBuf::from("/cache/repo")
        );
    }

    #[test]
    fn test_default_cache_path_is_stable() {
        let path = cookiecutter_cache_path("https://host/org/repo.git").unwrap();
        assert_eq!(
            path,
            cookiecutter_cache_path("https://host/org/repo.git/").unwrap()
        );
        assert!(path.ends_with(".cookiecutters/repo"));
    }

    #[test]
    fn test_cache_entry_name() {
        assert_eq!(cache_entry_name("https://host/org/repo").as_deref(), Some("repo"));
        assert_eq!(
            cache_entry_name("git@github.com:NADOOIT/batteries-included-briefcase-template.git")
                .as_deref(),
            Some("batteries-included-briefcase-template")
        );
        assert_eq!(cache_entry_name("git@host:repo.git").as_deref(), Some("repo"));
    }

    #[test]
    fn test_cache_entry_name_rejects_escaping_segments() {
        for url in [
            "https://host/org/..",
            "https://host/org/../",
            "https://host/org/.",
            "https://host/org/.git",
            "git@host:",
            "https://host/org/..\\evil",
        ] {
            assert_eq!(cache_entry_name(url), None, "{}", url);
            let err = cache_path_in(Path::new("/cache"), url).unwrap_err();
            assert_eq!(err.kind(), "InvalidTemplateRepository", "{}", url);
        }
    }
}
