use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use launcher::config::Config;
use launcher::logging;
use launcher::services::Services;
use launcher::types::Selection;
use launcher::validation::ProjectNameValidator;
use launcher::wizard::{Launcher, MissionRuntimeStep, ProjectSummaryStep, ReleaseStrategyStep};

#[derive(Parser)]
#[command(name = "launcher")]
#[command(about = "Walk through mission, runtime and pipeline selection and launch an application")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List missions, runtimes and pipelines
    Catalog {
        /// Read the catalog from a JSON file instead of the backend
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Validate project names as if typed into the name field
    ValidateName {
        /// Successive field values; only the last stable one is checked
        #[arg(required = true)]
        names: Vec<String>,

        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Run the wizard non-interactively and print the summary
    Run {
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Deep-link selection (JSON) used to pre-fill the wizard
        #[arg(long)]
        selection: Option<PathBuf>,

        #[arg(long)]
        mission: Option<String>,

        #[arg(long)]
        runtime: Option<String>,

        #[arg(long)]
        pipeline: Option<String>,

        #[arg(long)]
        project_name: Option<String>,

        /// Submit the summary and print the status link
        #[arg(long)]
        submit: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;
    let _logging_handle = logging::init_logging(&config, cli.debug)?;

    match cli.command {
        Commands::Catalog { catalog } => {
            cmd_catalog(&config, catalog.as_deref()).await?;
        }
        Commands::ValidateName { names, catalog } => {
            cmd_validate_name(&config, names, catalog.as_deref()).await?;
        }
        Commands::Run {
            catalog,
            selection,
            mission,
            runtime,
            pipeline,
            project_name,
            submit,
        } => {
            let choices = Choices {
                mission,
                runtime,
                pipeline,
                project_name,
            };
            cmd_run(
                &config,
                catalog.as_deref(),
                selection.as_deref(),
                choices,
                submit,
            )
            .await?;
        }
    }

    Ok(())
}

async fn cmd_catalog(config: &Config, catalog: Option<&Path>) -> Result<()> {
    let services = Services::from_config(config, catalog)?;
    let missions = services.missions.get_missions().await?;
    let runtimes = services.missions.get_runtimes().await?;
    let pipelines = services.pipelines.get_pipelines().await?;

    println!("Missions ({})", missions.len());
    println!("{}", "─".repeat(60));
    for mission in &missions {
        let tag = if mission.suggested { " [featured]" } else { "" };
        println!("  {:<24} {}{}", mission.id, mission.name, tag);
    }

    println!();
    println!("Runtimes ({})", runtimes.len());
    println!("{}", "─".repeat(60));
    for runtime in &runtimes {
        println!(
            "  {:<24} {} (pipelines: {})",
            runtime.id, runtime.name, runtime.pipeline_platform
        );
    }

    println!();
    println!("Pipelines ({})", pipelines.len());
    println!("{}", "─".repeat(60));
    for pipeline in &pipelines {
        println!("  {:<24} {} [{}]", pipeline.id, pipeline.name, pipeline.platform);
    }

    Ok(())
}

async fn cmd_validate_name(
    config: &Config,
    names: Vec<String>,
    catalog: Option<&Path>,
) -> Result<()> {
    let services = Services::from_config(config, catalog)?;
    let validator = ProjectNameValidator::new(services.checks, &config.validator)
        .context("Invalid project name pattern in configuration")?;

    let mut handle = validator.spawn();
    for name in names {
        handle.submit(name)?;
    }

    let outcome = handle
        .next_result()
        .await
        .context("Validator stopped without a result")?;
    let errors = outcome.result?;

    println!("{}: {}", outcome.value, serde_json::to_string(&errors)?);
    if !errors.is_valid() {
        std::process::exit(1);
    }
    Ok(())
}

/// Choices given on the command line, applied after the selection
struct Choices {
    mission: Option<String>,
    runtime: Option<String>,
    pipeline: Option<String>,
    project_name: Option<String>,
}

async fn cmd_run(
    config: &Config,
    catalog: Option<&Path>,
    selection: Option<&Path>,
    choices: Choices,
    submit: bool,
) -> Result<()> {
    let services = Services::from_config(config, catalog)?;
    let selection = selection.map(load_selection).transpose()?;

    let mut launcher = Launcher::new(selection);
    launcher
        .add_step(MissionRuntimeStep::new(services.missions.clone()))
        .await?;
    launcher
        .add_step(ReleaseStrategyStep::new(services.pipelines.clone()))
        .await?;
    launcher
        .add_step(ProjectSummaryStep::new(
            services.checks.clone(),
            services.summary.clone(),
        ))
        .await?;

    if let Some(mission) = choices.mission.as_deref() {
        launcher.select_mission(mission)?;
    }
    if let Some(runtime) = choices.runtime.as_deref() {
        launcher.select_runtime(runtime)?;
    }
    if let Some(pipeline) = choices.pipeline.as_deref() {
        launcher.select_pipeline(Some(pipeline))?;
    }
    if let Some(name) = choices.project_name {
        launcher.summary_mut().dependency_check.project_name = Some(name);
    }

    let validity = launcher.validate_project_fields()?;

    println!("{}", serde_json::to_string_pretty(launcher.summary())?);
    println!();
    for step in launcher.context().steps() {
        let mark = if step.completed { "x" } else { " " };
        println!("[{}] {}", mark, step.id);
    }
    println!(
        "Wizard complete: {}",
        if launcher.is_wizard_complete() { "yes" } else { "no" }
    );
    if !validity.all_valid() {
        println!("Project fields need attention: {:?}", validity);
    }

    if submit {
        let link = launcher.setup().await?;
        println!("Status: {}", link);
    }

    Ok(())
}

fn load_selection(path: &Path) -> Result<Selection> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read selection {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse selection {}", path.display()))
}
