//! Launchpad Core - setup and project scaffolding library
//!
//! This library installs a pinned Python runtime through pyenv and creates new
//! projects from git-hosted templates. It is designed to be used by launcher
//! binaries that share the same logic but carry their own product configuration.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Identifier derivation, template cache
//!   resolution and rendering, runtime tool management, install state
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait and the `Materializer`
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use launchpad_core::{materialize_project, ProjectRequest, TemplateSource};
//!
//! let request = ProjectRequest::new("My Cool App").expect("non-empty name");
//! let source = TemplateSource::new("https://github.com/org/app-template.git");
//! let created = materialize_project(request, Path::new("/projects"), &source)?;
//! println!("Created {}", created.path.display());
//! ```

pub mod config;
pub mod error;
pub mod identifiers;
pub mod materializer;
pub mod product;
pub mod request;
pub mod runtime;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use error::{MaterializationError, MaterializationResult};
pub use identifiers::{
    derive_app_name, derive_class_name, derive_module_name, is_valid_app_name, DerivedIdentifiers,
};
pub use materializer::{materialize_project, CreatedProject, Materializer, TOOL_VERSION};
pub use product::ProductConfig;
pub use request::{GuiFramework, License, ProjectRequest};
pub use runtime::{InstallOutcome, RuntimeInfo, RuntimeInstaller};
pub use templates::{cookiecutter_cache_path, RenderContext, TemplateSource, BUILTIN_TEMPLATE};

#[cfg(feature = "tui")]
pub use tui::run;
