//! Project request collected by the form layer

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Version given to a new project when the form leaves it blank
pub const DEFAULT_PROJECT_VERSION: &str = "0.0.1";

/// License choices offered for a new project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum License {
    Bsd,
    Mit,
    Apache,
    Gplv2,
    #[value(name = "gplv2+")]
    #[serde(rename = "gplv2+")]
    Gplv2Plus,
    Gplv3,
    #[value(name = "gplv3+")]
    #[serde(rename = "gplv3+")]
    Gplv3Plus,
    #[default]
    Proprietary,
    Other,
}

impl License {
    pub const ALL: [License; 9] = [
        License::Bsd,
        License::Mit,
        License::Apache,
        License::Gplv2,
        License::Gplv2Plus,
        License::Gplv3,
        License::Gplv3Plus,
        License::Proprietary,
        License::Other,
    ];

    /// Classifier-style name written into the project manifest
    pub fn display_name(&self) -> &'static str {
        match self {
            License::Bsd => "BSD license",
            License::Mit => "MIT license",
            License::Apache => "Apache Software License",
            License::Gplv2 => "GNU General Public License v2 (GPLv2)",
            License::Gplv2Plus => "GNU General Public License v2 or later (GPLv2+)",
            License::Gplv3 => "GNU General Public License v3 (GPLv3)",
            License::Gplv3Plus => "GNU General Public License v3 or later (GPLv3+)",
            License::Proprietary => "Proprietary",
            License::Other => "Other",
        }
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// GUI framework the generated project is set up for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GuiFramework {
    #[default]
    Toga,
    Pyside2,
    Pyside6,
    Ppb,
    Pygame,
    None,
}

impl GuiFramework {
    pub const ALL: [GuiFramework; 6] = [
        GuiFramework::Toga,
        GuiFramework::Pyside2,
        GuiFramework::Pyside6,
        GuiFramework::Ppb,
        GuiFramework::Pygame,
        GuiFramework::None,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            GuiFramework::Toga => "Toga",
            GuiFramework::Pyside2 => "PySide2",
            GuiFramework::Pyside6 => "PySide6",
            GuiFramework::Ppb => "PursuedPyBear",
            GuiFramework::Pygame => "Pygame",
            GuiFramework::None => "None",
        }
    }

    /// Frameworks that cannot target iOS/Android
    pub fn desktop_only(&self) -> bool {
        matches!(
            self,
            GuiFramework::Pyside2 | GuiFramework::Pyside6 | GuiFramework::Ppb | GuiFramework::Pygame
        )
    }
}

impl fmt::Display for GuiFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Everything the user entered about the project to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRequest {
    formal_name: String,
    pub bundle_identifier: String,
    pub author_name: String,
    pub author_email: String,
    pub url: String,
    pub description: String,
    pub license: License,
    pub gui_framework: GuiFramework,
    pub version: String,
}

impl ProjectRequest {
    /// Create a request with default metadata. Returns `None` for a blank formal name.
    pub fn new(formal_name: impl Into<String>) -> Option<Self> {
        let formal_name = formal_name.into().trim().to_string();
        if formal_name.is_empty() {
            return None;
        }
        Some(Self {
            formal_name,
            bundle_identifier: "com.example".to_string(),
            author_name: String::new(),
            author_email: String::new(),
            url: String::new(),
            description: String::new(),
            license: License::default(),
            gui_framework: GuiFramework::default(),
            version: DEFAULT_PROJECT_VERSION.to_string(),
        })
    }

    pub fn formal_name(&self) -> &str {
        &self.formal_name
    }

    /// Set the project version, keeping the default for blank input
    pub fn with_version(mut self, version: &str) -> Self {
        let version = version.trim();
        if !version.is_empty() {
            self.version = version.to_string();
        }
        self
    }
}

/// Suggest a project URL from the bundle identifier and formal name
///
/// `de.nadooit` + "My App" becomes `https://nadooit.de/My_App`.
pub fn suggest_project_url(bundle_identifier: &str, formal_name: &str) -> String {
    let host: Vec<&str> = bundle_identifier
        .split('.')
        .filter(|part| !part.is_empty())
        .rev()
        .collect();
    format!("https://{}/{}", host.join("."), formal_name.trim().replace(' ', "_"))
}

/// Suggest an author email from the author name and a mail domain
pub fn suggest_author_email(author_name: &str, domain: &str) -> Option<String> {
    let local = author_name.trim().replace(' ', ".").to_lowercase();
    if local.is_empty() {
        None
    } else {
        Some(format!("{}@{}", local, domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_formal_name_rejected() {
        assert!(ProjectRequest::new("").is_none());
        assert!(ProjectRequest::new("   ").is_none());
    }

    #[test]
    fn test_defaults() {
        let request = ProjectRequest::new("My App").unwrap();
        assert_eq!(request.formal_name(), "My App");
        assert_eq!(request.version, DEFAULT_PROJECT_VERSION);
        assert_eq!(request.license, License::Proprietary);
        assert_eq!(request.gui_framework, GuiFramework::Toga);
    }

    #[test]
    fn test_blank_version_keeps_default() {
        let request = ProjectRequest::new("My App").unwrap().with_version("  ");
        assert_eq!(request.version, "0.0.1");
        let request = request.with_version("1.2.0");
        assert_eq!(request.version, "1.2.0");
    }

    #[test]
    fn test_suggest_project_url() {
        assert_eq!(
            suggest_project_url("de.nadooit", "NADOO Launchpad"),
            "https://nadooit.de/NADOO_Launchpad"
        );
    }

    #[test]
    fn test_suggest_author_email() {
        assert_eq!(
            suggest_author_email("Jane Doe", "example.com").as_deref(),
            Some("jane.doe@example.com")
        );
        assert_eq!(suggest_author_email("  ", "example.com"), None);
    }

    #[test]
    fn test_enum_display_names() {
        assert_eq!(License::Gplv3Plus.to_string(), "GNU General Public License v3 or later (GPLv3+)");
        assert_eq!(GuiFramework::Ppb.to_string(), "PursuedPyBear");
        assert!(GuiFramework::Pygame.desktop_only());
        assert!(!GuiFramework::Toga.desktop_only());
    }
}
