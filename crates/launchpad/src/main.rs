//! NADOO Launchpad - Python runtime setup and project scaffolding

mod logging;

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use launchpad_core::tui::CreateArgs;
use launchpad_core::{DerivedIdentifiers, GuiFramework, License, ProductConfig};
use std::path::{Path, PathBuf};

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

const CLI_DESCRIPTION: &str = "Set up Python and create new app projects from the NADOO template";

/// Launchpad product configuration
#[derive(Clone)]
pub struct LaunchpadConfig;

impl ProductConfig for LaunchpadConfig {
    fn name(&self) -> &'static str {
        "launchpad"
    }

    fn display_name(&self) -> &'static str {
        "NADOO Launchpad"
    }

    fn default_template_url(&self) -> &'static str {
        launchpad_core::BUILTIN_TEMPLATE
    }

    fn template_url_env(&self) -> &'static str {
        "LAUNCHPAD_TEMPLATE_URL"
    }

    fn runtime_version(&self) -> &'static str {
        "3.11.7"
    }

    fn docs_url(&self) -> &'static str {
        "https://github.com/pyenv/pyenv#installation"
    }

    fn email_domain(&self) -> &'static str {
        "nadooit.de"
    }

    fn cli_description(&self) -> &'static str {
        CLI_DESCRIPTION
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install launchpad --force"
    }

    fn next_steps(&self, dir: &Path, identifiers: &DerivedIdentifiers) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        steps.push("python -m venv .venv && source .venv/bin/activate".to_string());
        steps.push("pip install briefcase".to_string());
        steps.push(format!(
            "briefcase dev  (runs {}.app:main)",
            identifiers.module_name
        ));

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "launchpad")]
#[command(about = CLI_DESCRIPTION)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project (default)
    Create(CliCreateArgs),
}

#[derive(ClapArgs, Debug, Default)]
pub struct CliCreateArgs {
    /// Template directory or git URL to use instead of the built-in template
    #[arg(long)]
    pub template: Option<String>,

    /// Template branch to check out (defaults to the tag matching this version)
    #[arg(long)]
    pub branch: Option<String>,

    /// Folder to create the project in (defaults to ~/Documents/GitHub)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Formal project name, e.g. "My Cool App"
    #[arg(short, long)]
    pub name: Option<String>,

    /// Bundle identifier, e.g. com.example
    #[arg(long)]
    pub bundle: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, value_enum)]
    pub license: Option<License>,

    #[arg(long = "gui-framework", value_enum)]
    pub gui_framework: Option<GuiFramework>,

    /// Initial project version
    #[arg(long = "project-version")]
    pub project_version: Option<String>,

    /// Skip the pyenv/Python installation step
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            template: args.template,
            branch: args.branch,
            output: args.output,
            name: args.name,
            bundle: args.bundle,
            author: args.author,
            email: args.email,
            url: args.url,
            description: args.description,
            license: args.license,
            gui_framework: args.gui_framework,
            project_version: args.project_version,
            skip_install: args.skip_install,
            yes: args.yes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    logging::init_logging(args.verbose, args.quiet)?;
    tracing::debug!("launchpad {}", CLI_VERSION);

    let config = LaunchpadConfig;
    let create_args = match args.command {
        Some(Command::Create(create_args)) => create_args,
        // No subcommand provided, default to create behavior (interactive mode)
        None => CliCreateArgs::default(),
    };

    let result = launchpad_core::run(&config, create_args.into(), CLI_VERSION).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_create_flags() {
        let args = Args::parse_from([
            "launchpad",
            "-vv",
            "create",
            "--name",
            "My Cool App",
            "--license",
            "mit",
            "--gui-framework",
            "pyside6",
            "--skip-install",
            "--yes",
        ]);
        assert_eq!(args.verbose, 2);
        let Some(Command::Create(create)) = args.command else {
            panic!("expected create subcommand");
        };
        let create: CreateArgs = create.into();
        assert_eq!(create.name.as_deref(), Some("My Cool App"));
        assert_eq!(create.license, Some(License::Mit));
        assert_eq!(create.gui_framework, Some(GuiFramework::Pyside6));
        assert!(create.skip_install);
        assert!(create.yes);
    }

    #[test]
    fn test_no_subcommand_defaults_to_create() {
        let args = Args::parse_from(["launchpad", "--quiet"]);
        assert!(args.command.is_none());
        assert!(args.quiet);
    }

    #[test]
    fn test_help_uses_product_description() {
        use clap::CommandFactory;
        let about = Args::command().get_about().map(|about| about.to_string());
        assert_eq!(about.as_deref(), Some(LaunchpadConfig.cli_description()));
    }

    #[test]
    fn test_default_template_is_builtin() {
        assert_eq!(
            LaunchpadConfig.default_template_url(),
            launchpad_core::BUILTIN_TEMPLATE
        );
    }

    #[test]
    fn test_next_steps_mention_module() {
        let ids = DerivedIdentifiers::from_formal_name("My Cool App");
        let steps = LaunchpadConfig.next_steps(Path::new("/nonexistent/my_cool_app"), &ids);
        assert_eq!(steps[0], "cd /nonexistent/my_cool_app");
        assert!(steps.iter().any(|s| s.contains("my_cool_app.app:main")));
    }
}
