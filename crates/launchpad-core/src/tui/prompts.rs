//! Charm-style CLI prompts using cliclack

use crate::config::{self, InstallState};
use crate::materializer::{CreatedProject, Materializer};
use crate::product::ProductConfig;
use crate::request::{self, GuiFramework, License, ProjectRequest};
use crate::runtime::{check, tool, InstallOutcome, RuntimeInstaller};
use crate::templates::{default_cache_root, GitCli, TemplateSource};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Template directory or repository URL instead of the product default
    pub template: Option<String>,

    /// Template branch instead of the one derived from the tool version
    pub branch: Option<String>,

    /// Folder the project directory is created in
    pub output: Option<PathBuf>,

    /// Formal project name
    pub name: Option<String>,

    /// Bundle identifier (reverse domain)
    pub bundle: Option<String>,

    pub author: Option<String>,
    pub email: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub license: Option<License>,
    pub gui_framework: Option<GuiFramework>,

    /// Initial project version
    pub project_version: Option<String>,

    /// Skip the pyenv/Python installation step
    pub skip_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(config.display_name())?;

    // Step 1: Check required tools
    let state_path = InstallState::default_path(config.name());
    let needs_install = !args.skip_install && !config::check_installation_state(&state_path);
    check_prerequisites(needs_install)?;

    // Step 2: Install pyenv and the pinned Python (once)
    if needs_install {
        handle_install(config, &args, &state_path).await?;
    } else if args.skip_install {
        cliclack::log::info("Skipping runtime installation")?;
    } else {
        cliclack::log::success(format!("Python {} already set up", config.runtime_version()))?;
    }

    // Step 3: Project folder
    let project_folder = config::ensure_project_folder(args.output.clone())?;
    cliclack::log::info(format!("Projects folder: {}", project_folder.display()))?;

    // Step 4: Project details
    let request = collect_request(config, &args)?;

    // Step 5: Template
    let source = template_source(config, &args);
    cliclack::log::info(format!(
        "Template: {} ({})",
        source.location,
        source.branch_for(cli_version)
    ))?;

    // Step 6: Create project
    let created = create_project(config, request, &project_folder, source, cli_version).await?;

    for warning in &created.warnings {
        cliclack::log::warning(warning)?;
    }

    // Step 7: Show next steps
    print_next_steps(config, &created)?;

    Ok(())
}

fn check_prerequisites(needs_install: bool) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Checking required tools...");

    match check::check_prerequisites(needs_install) {
        Ok(tools) => {
            let tool_info: Vec<String> = tools
                .iter()
                .filter(|t| t.available)
                .map(|t| format!("{} ({})", t.name, t.version.as_deref().unwrap_or("unknown")))
                .collect();
            spinner.stop(format!("Detected tools: {}", tool_info.join(", ")));
            Ok(())
        }
        Err(e) => {
            spinner.stop("Missing tools");
            cliclack::log::error(format!("{}", e))?;
            anyhow::bail!("Please install the missing tools and try again.");
        }
    }
}

async fn handle_install<C: ProductConfig>(
    config: &C,
    args: &CreateArgs,
    state_path: &Path,
) -> Result<()> {
    let tool = tool::pyenv_tool();

    if tool.is_installed() {
        let version = tool.get_version().unwrap_or_else(|| "unknown".to_string());
        cliclack::log::success(format!(
            "{} installed ({})",
            tool.config().display_name,
            version
        ))?;
    } else {
        cliclack::log::warning(format!("{} is not installed", tool.config().display_name))?;

        let action: &str = if args.yes {
            "install"
        } else {
            cliclack::select("What would you like to do?")
                .item(
                    "install",
                    format!("Install {} automatically", tool.config().display_name),
                    "",
                )
                .item(
                    "docs",
                    format!("Open documentation ({})", tool.config().docs_url),
                    "",
                )
                .item(
                    "skip",
                    format!("Skip and continue without {}", tool.config().display_name),
                    "",
                )
                .interact()?
        };

        match action {
            "install" => {
                cliclack::log::info(format!("This will execute: {}", tool.install_command()))?;

                let confirm = args.yes
                    || cliclack::confirm("Proceed with installation?")
                        .initial_value(true)
                        .interact()?;
                if !confirm {
                    cliclack::log::info("Skipping runtime installation")?;
                    return Ok(());
                }

                if let Err(e) = tool.install().await {
                    cliclack::log::error(format!("{:#}", e))?;
                    return continue_without_runtime(args);
                }
                cliclack::log::success(format!(
                    "{} installed successfully",
                    tool.config().display_name
                ))?;
            }
            "docs" => {
                tool.open_docs()?;
                cliclack::outro(format!(
                    "After installing {}, run this command again.",
                    tool.config().display_name
                ))?;
                std::process::exit(0);
            }
            _ => {
                cliclack::log::info(format!(
                    "Continuing without {}. Refer to the docs for installation instructions: ({})",
                    tool.config().display_name,
                    tool.config().docs_url
                ))?;
                return Ok(());
            }
        }
    }

    let installer = RuntimeInstaller::from_tool(&tool, config.runtime_version())?;
    match installer.ensure_installed().await {
        Ok(InstallOutcome::AlreadyInstalled) => {
            cliclack::log::success(format!("Python {} is already installed", installer.version()))?;
        }
        Ok(InstallOutcome::Installed) => {
            cliclack::log::success(format!("Installed Python {}", installer.version()))?;
        }
        Err(e) => {
            cliclack::log::error(format!("{:#}", e))?;
            return continue_without_runtime(args);
        }
    }

    InstallState::mark_installed(state_path)?;
    Ok(())
}

fn continue_without_runtime(args: &CreateArgs) -> Result<()> {
    if args.yes {
        anyhow::bail!("Runtime installation failed.");
    }
    let continue_anyway: bool = cliclack::confirm("Continue without the Python runtime?")
        .initial_value(false)
        .interact()?;
    if continue_anyway {
        Ok(())
    } else {
        anyhow::bail!("Setup cancelled.");
    }
}

/// Use a flag value, the default in `--yes` mode, or ask
fn text_field(prompt: &str, flag: &Option<String>, default: &str, yes: bool) -> Result<String> {
    if let Some(value) = flag {
        return Ok(value.clone());
    }
    if yes {
        return Ok(default.to_string());
    }
    let input: String = cliclack::input(prompt)
        .placeholder(default)
        .default_input(default)
        .required(false)
        .interact()?;
    Ok(input.trim().to_string())
}

fn collect_request<C: ProductConfig>(config: &C, args: &CreateArgs) -> Result<ProjectRequest> {
    let formal_name = match &args.name {
        Some(name) => name.clone(),
        None if args.yes => "My App".to_string(),
        None => cliclack::input("Project name")
            .placeholder("My App")
            .validate(|input: &String| {
                if input.trim().is_empty() {
                    Err("Please enter a project name")
                } else {
                    Ok(())
                }
            })
            .interact()?,
    };
    let mut request = ProjectRequest::new(formal_name)
        .ok_or_else(|| anyhow::anyhow!("The project name cannot be empty."))?;

    let ids = crate::identifiers::DerivedIdentifiers::from_formal_name(request.formal_name());
    cliclack::log::info(format!(
        "App name: {}, module: {}, class: {}",
        ids.app_name, ids.module_name, ids.class_name
    ))?;

    request.bundle_identifier =
        text_field("Bundle identifier", &args.bundle, "com.example", args.yes)?;
    request.author_name = text_field("Author", &args.author, "", args.yes)?;

    let email_default =
        request::suggest_author_email(&request.author_name, config.email_domain())
            .unwrap_or_default();
    request.author_email = text_field("Author's email", &args.email, &email_default, args.yes)?;

    let url_default = request::suggest_project_url(&request.bundle_identifier, request.formal_name());
    request.url = text_field("Project URL", &args.url, &url_default, args.yes)?;
    request.description = text_field(
        "Description",
        &args.description,
        "A description of the project",
        args.yes,
    )?;

    request.license = match args.license {
        Some(license) => license,
        None if args.yes => License::default(),
        None => {
            let mut select = cliclack::select("License").initial_value(License::default());
            for license in License::ALL {
                select = select.item(license, license.display_name(), "");
            }
            select.interact()?
        }
    };

    request.gui_framework = match args.gui_framework {
        Some(framework) => framework,
        None if args.yes => GuiFramework::default(),
        None => {
            let mut select = cliclack::select("GUI framework").initial_value(GuiFramework::default());
            for framework in GuiFramework::ALL {
                let hint = if framework.desktop_only() {
                    "does not support iOS/Android deployment"
                } else {
                    ""
                };
                select = select.item(framework, framework.display_name(), hint);
            }
            select.interact()?
        }
    };

    let version = text_field(
        "Project version",
        &args.project_version,
        request::DEFAULT_PROJECT_VERSION,
        args.yes,
    )?;
    Ok(request.with_version(&version))
}

fn template_source<C: ProductConfig>(config: &C, args: &CreateArgs) -> TemplateSource {
    let source = match &args.template {
        Some(template) => TemplateSource::new(template.clone()),
        None => TemplateSource::from_config(config),
    };
    match &args.branch {
        Some(branch) => source.with_branch(branch.clone()),
        None => source,
    }
}

async fn create_project<C: ProductConfig>(
    config: &C,
    request: ProjectRequest,
    project_folder: &Path,
    source: TemplateSource,
    cli_version: &str,
) -> Result<CreatedProject> {
    let spinner = cliclack::spinner();
    spinner.start("Creating project...");

    let materializer = Materializer::new(GitCli::new(), default_cache_root(), cli_version)
        .with_upgrade_command(config.upgrade_command());
    let output_root = project_folder.to_path_buf();

    // git and file copies block; keep them off the async runtime
    let result = tokio::task::spawn_blocking(move || {
        materializer.materialize(request, &output_root, &source)
    })
    .await?;

    match result {
        Ok(created) => {
            spinner.stop(format!(
                "Created {} files in {} (template branch {})",
                created.files.len(),
                created.path.display(),
                created.branch
            ));
            Ok(created)
        }
        Err(e) => {
            spinner.stop("Project creation failed");
            cliclack::log::error(format!("{}: {}", e.kind(), e))?;
            anyhow::bail!("The project was not created.");
        }
    }
}

fn print_next_steps<C: ProductConfig>(config: &C, created: &CreatedProject) -> Result<()> {
    let steps = config.next_steps(&created.path, &created.identifiers);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
