//! Template manifest types and parsing

use crate::error::{MaterializationError, MaterializationResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the manifest at the root of every template
pub const MANIFEST_FILE: &str = "template.yaml";

fn default_project_dir() -> String {
    "{{APP_NAME}}".to_string()
}

/// Template manifest (`<template>/template.yaml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// Display name of the template
    pub name: String,

    /// Description of what the template provides
    #[serde(default)]
    pub description: String,

    /// Minimum tool version the template was written for
    #[serde(default)]
    pub version: Option<String>,

    /// Context keys the template expects (lowercase, e.g. `app_name`)
    #[serde(default)]
    pub variables: Vec<String>,

    /// Template subdirectory that gets expanded; its name is itself a template
    #[serde(default = "default_project_dir")]
    pub project_dir: String,
}

impl TemplateManifest {
    /// Read the manifest from a template directory
    ///
    /// A directory without a manifest is not a template.
    pub fn load(template_dir: &Path, template: &str) -> MaterializationResult<Self> {
        let manifest_path = template_dir.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(MaterializationError::InvalidTemplateRepository {
                template: template.to_string(),
            });
        }

        let content = std::fs::read_to_string(&manifest_path)
            .map_err(|e| MaterializationError::io(&manifest_path, e))?;
        serde_yaml::from_str(&content).map_err(|e| {
            tracing::debug!("Failed to parse {}: {}", manifest_path.display(), e);
            MaterializationError::InvalidTemplateRepository {
                template: template.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_manifest() {
        let manifest: TemplateManifest = serde_yaml::from_str(
            r#"
name: Python App
description: A desktop app
version: 0.1.0
variables:
  - formal_name
  - app_name
project_dir: "{{APP_NAME}}-project"
"#,
        )
        .unwrap();
        assert_eq!(manifest.name, "Python App");
        assert_eq!(manifest.version.as_deref(), Some("0.1.0"));
        assert_eq!(manifest.variables, vec!["formal_name", "app_name"]);
        assert_eq!(manifest.project_dir, "{{APP_NAME}}-project");
    }

    #[test]
    fn test_defaults() {
        let manifest: TemplateManifest = serde_yaml::from_str("name: Minimal").unwrap();
        assert!(manifest.variables.is_empty());
        assert!(manifest.version.is_none());
        assert_eq!(manifest.project_dir, "{{APP_NAME}}");
    }

    #[test]
    fn test_load_missing_manifest_is_invalid_template() {
        let dir = tempfile::tempdir().unwrap();
        let err = TemplateManifest::load(dir.path(), "some/template").unwrap_err();
        assert!(matches!(
            err,
            MaterializationError::InvalidTemplateRepository { ref template } if template == "some/template"
        ));
    }

    #[test]
    fn test_load_unparseable_manifest_is_invalid_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "variables: [unclosed").unwrap();
        let err = TemplateManifest::load(dir.path(), "t").unwrap_err();
        assert_eq!(err.kind(), "InvalidTemplateRepository");
    }
}
