//! Product configuration trait for CLI binaries
//!
//! This trait defines the interface a launcher binary implements to configure
//! the setup and scaffolding behavior for its organization.

use crate::identifiers::DerivedIdentifiers;
use std::path::Path;

/// Configuration trait for a launcher product
///
/// Each product implements this trait to define:
/// - Product identity (name, display name)
/// - Template source URL and its override
/// - The pinned runtime version
/// - Documentation links
/// - Post-setup instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for config directories, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Default template repository
    fn default_template_url(&self) -> &'static str;

    /// Environment variable name for overriding the template URL
    fn template_url_env(&self) -> &'static str;

    /// Python version installed through pyenv and set as global
    fn runtime_version(&self) -> &'static str;

    /// URL for product documentation
    fn docs_url(&self) -> &'static str;

    /// Mail domain used to suggest author emails
    fn email_domain(&self) -> &'static str {
        "example.com"
    }

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, dir: &Path, identifiers: &DerivedIdentifiers) -> Vec<String>;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Upgrade/install command shown in version warnings
    fn upgrade_command(&self) -> &'static str;
}
