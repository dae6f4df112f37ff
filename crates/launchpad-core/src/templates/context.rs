//! Render context and placeholder substitution
//!
//! Templates refer to context values as `{{UPPERCASED_KEY}}`: the context key
//! `app_name` is written `{{APP_NAME}}` in file contents and path names.

use crate::identifiers::DerivedIdentifiers;
use crate::request::ProjectRequest;
use std::collections::BTreeMap;

/// Key/value mapping substituted into a template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    values: BTreeMap<String, String>,
}

/// Template provenance recorded in the generated project
#[derive(Debug, Clone)]
pub struct Provenance<'a> {
    pub template_source: &'a str,
    pub template_branch: &'a str,
    pub tool_version: &'a str,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the context for a project from the request, its identifiers and provenance
    pub fn for_project(
        request: &ProjectRequest,
        identifiers: &DerivedIdentifiers,
        provenance: &Provenance<'_>,
    ) -> Self {
        let mut context = Self::new();
        context
            .insert("formal_name", request.formal_name())
            .insert("project_name", request.formal_name())
            .insert("app_name", &identifiers.app_name)
            .insert("module_name", &identifiers.module_name)
            .insert("class_name", &identifiers.class_name)
            .insert("bundle", &request.bundle_identifier)
            .insert("author", &request.author_name)
            .insert("author_email", &request.author_email)
            .insert("url", &request.url)
            .insert("description", &request.description)
            .insert("license", request.license.display_name())
            .insert("gui_framework", request.gui_framework.display_name())
            .insert("version", &request.version);
        context.set_provenance(provenance);
        context
    }

    /// Record where the template came from
    pub fn set_provenance(&mut self, provenance: &Provenance<'_>) {
        self.insert("template_source", provenance.template_source)
            .insert("template_branch", provenance.template_branch)
            .insert("tool_version", provenance.tool_version);
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into().to_lowercase(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(&key.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys from `expected` that have no value in this context
    pub fn missing_keys<'a>(&self, expected: &'a [String]) -> Vec<&'a str> {
        expected
            .iter()
            .filter(|key| !self.contains_key(key))
            .map(String::as_str)
            .collect()
    }

    /// Replace every `{{KEY}}` placeholder whose key is in the context
    ///
    /// Returns the substituted text and the names of placeholders left unmatched.
    pub fn substitute(&self, text: &str) -> (String, Vec<String>) {
        let mut output = String::with_capacity(text.len());
        let mut unmatched = Vec::new();
        let mut rest = text;

        while let Some(start) = rest.find("{{") {
            output.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];
            match after_open.find("}}") {
                Some(end) if is_placeholder_name(&after_open[..end]) => {
                    let name = &after_open[..end];
                    match self.get(name) {
                        Some(value) => output.push_str(value),
                        None => {
                            unmatched.push(name.to_string());
                            output.push_str(&rest[start..start + 2 + end + 2]);
                        }
                    }
                    rest = &after_open[end + 2..];
                }
                _ => {
                    // Not one of ours (e.g. `${{ github.ref }}`); keep it verbatim
                    output.push_str("{{");
                    rest = after_open;
                }
            }
        }
        output.push_str(rest);

        (output, unmatched)
    }
}

/// Placeholder names are uppercase identifiers: `APP_NAME`, `URL`
fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        && name.starts_with(|c: char| c.is_ascii_uppercase())
}
