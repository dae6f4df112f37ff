//! Version handling for template branches and compatibility

use anyhow::Result;
use semver::Version;

/// Branch holding the in-development template
pub const DEVELOPMENT_BRANCH: &str = "main";

/// Compare tool version against the version a template asks for
/// Returns a warning message if the tool is older than the template expects
pub fn check_compatibility(
    tool_version: &str,
    template_version: &str,
    upgrade_command: &str,
) -> Option<String> {
    let tool_ver = parse_version(tool_version).ok()?;
    let template_ver = parse_version(template_version).ok()?;

    if tool_ver < template_ver {
        Some(format!(
            "Warning: This template was designed for version {} or newer.\n\
             You are running version {}.\n\
             Consider updating: {}",
            template_version, tool_version, upgrade_command
        ))
    } else {
        None
    }
}

/// Parse version string, handling various formats
pub fn parse_version(version_str: &str) -> Result<Version> {
    // Remove leading 'v' if present
    let cleaned = version_str.strip_prefix('v').unwrap_or(version_str);
    Version::parse(cleaned).map_err(|e| anyhow::anyhow!("Invalid version '{}': {}", version_str, e))
}

/// Template branch matching a tool version: `v<major>.<minor>.<patch>`
///
/// Pre-release and build metadata are dropped, so `0.2.0-dev.3` maps to `v0.2.0`.
/// Unparseable versions map to the development branch.
pub fn default_branch(tool_version: &str) -> String {
    match parse_version(tool_version) {
        Ok(v) => format!("v{}.{}.{}", v.major, v.minor, v.patch),
        Err(_) => DEVELOPMENT_BRANCH.to_string(),
    }
}

/// Whether a tool version is a development build (has a pre-release marker)
pub fn is_development(tool_version: &str) -> bool {
    parse_version(tool_version)
        .map(|v| !v.pre.is_empty())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_older_than_template() {
        let warning = check_compatibility("0.1.0", "0.2.0", "cargo install launchpad --force");
        assert!(warning.is_some());
        assert!(warning.unwrap().contains("0.2.0"));
    }

    #[test]
    fn test_tool_same_as_template() {
        let warning = check_compatibility("0.1.0", "0.1.0", "cargo install launchpad --force");
        assert!(warning.is_none());
    }

    #[test]
    fn test_tool_newer_than_template() {
        let warning = check_compatibility("0.2.0", "v0.1.0", "cargo install launchpad --force");
        assert!(warning.is_none());
    }

    #[test]
    fn test_invalid_versions() {
        // Should return None (no warning) for invalid versions
        let warning = check_compatibility("invalid", "0.1.0", "cargo install launchpad --force");
        assert!(warning.is_none());
    }

    #[test]
    fn test_default_branch() {
        assert_eq!(default_branch("0.3.12"), "v0.3.12");
        assert_eq!(default_branch("0.2.0-dev.3"), "v0.2.0");
        assert_eq!(default_branch("v1.0.0"), "v1.0.0");
        assert_eq!(default_branch("not a version"), DEVELOPMENT_BRANCH);
    }

    #[test]
    fn test_is_development() {
        assert!(is_development("0.2.0-dev.3"));
        assert!(is_development("1.0.0-rc.1"));
        assert!(!is_development("1.0.0"));
        assert!(!is_development("garbage"));
    }
}
