//! Template compiled into the binary
//!
//! The Briefcase app template ships with the tool so a project can be created
//! without any repository. It is written out under the cache root on use and
//! then rendered like any local template.

use crate::error::{MaterializationError, MaterializationResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Template location that selects the compiled-in template
pub const BUILTIN_TEMPLATE: &str = "builtin:briefcase-app";

const BUILTIN_DIR: &str = ".builtin";

macro_rules! template_file {
    ($path:literal) => {
        (
            $path,
            include_str!(concat!("../../templates/briefcase-app/", $path)),
        )
    };
}

/// Relative path and contents of every file in the template
pub const BUILTIN_FILES: &[(&str, &str)] = &[
    template_file!("template.yaml"),
    template_file!("{{APP_NAME}}/README.md"),
    template_file!("{{APP_NAME}}/pyproject.toml"),
    template_file!("{{APP_NAME}}/src/{{MODULE_NAME}}/__init__.py"),
    template_file!("{{APP_NAME}}/src/{{MODULE_NAME}}/__main__.py"),
    template_file!("{{APP_NAME}}/src/{{MODULE_NAME}}/app.py"),
    template_file!("{{APP_NAME}}/src/{{MODULE_NAME}}/resources/README"),
    template_file!("{{APP_NAME}}/tests/__init__.py"),
    template_file!("{{APP_NAME}}/tests/test_app.py"),
];

/// Write the compiled-in template under `cache_root` and return its directory
///
/// Each tool version gets its own directory, so files never go stale.
pub fn extract_builtin_template(cache_root: &Path) -> MaterializationResult<PathBuf> {
    let dir = cache_root
        .join(BUILTIN_DIR)
        .join(format!("briefcase-app-{}", env!("CARGO_PKG_VERSION")));

    for (relative, contents) in BUILTIN_FILES {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| MaterializationError::io(parent, e))?;
        }
        fs::write(&path, contents).map_err(|e| MaterializationError::io(&path, e))?;
    }

    tracing::debug!("Built-in template available at {}", dir.display());
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use walkdir::WalkDir;

    #[test]
    fn test_every_template_file_is_compiled_in() {
        let source = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates/briefcase-app");
        let on_disk: BTreeSet<String> = WalkDir::new(&source)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| {
                entry
                    .path()
                    .strip_prefix(&source)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        let compiled: BTreeSet<String> = BUILTIN_FILES
            .iter()
            .map(|(path, _)| path.to_string())
            .collect();
        assert_eq!(on_disk, compiled);
    }

    #[test]
    fn test_extract_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let first = extract_builtin_template(dir.path()).unwrap();
        let second = extract_builtin_template(dir.path()).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with(dir.path()));
        assert!(first.join("template.yaml").is_file());
        assert!(first.join("{{APP_NAME}}/pyproject.toml").is_file());
    }
}
