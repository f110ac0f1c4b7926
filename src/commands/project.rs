use clap::{Args, Subcommand};
use serde::Serialize;

use caretaker::error::{Error, RemoteCommandFailedDetails};
use caretaker::orchestrator::{self, RunOptions};
use caretaker::runner::CommandSpec;
use caretaker::settings::ConfigStore;
use caretaker::status::StatusReport;
use caretaker::{alias::AliasManager, resolver, script};

use crate::commands::CmdResult;

#[derive(Args)]
pub struct ProjectArgs {
    #[command(subcommand)]
    command: ProjectCommand,
}

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// List configured projects and their environments
    List,
    /// Probe environment health via drush core:status
    Status {
        /// Limit to one project
        project: Option<String>,
        /// Limit to one environment (requires a project)
        environment: Option<String>,
    },
    /// Run a deployment script from the project's scripts directory
    Script {
        /// Script name, tried bare and with .sh/.py extensions
        name: String,
        /// Project whose environment provides the Drupal root
        #[arg(long)]
        project: Option<String>,
        /// Environment providing the Drupal root (default: current directory)
        #[arg(long)]
        environment: Option<String>,
    },
    /// Run the update sequence (updatedb, config:import, cache:rebuild)
    Update {
        /// Project to update
        project: String,
        /// Environment to update
        environment: String,
        /// Bracket the sequence with maintenance mode
        #[arg(long)]
        maintenance: bool,
    },
    /// Reload project configuration from disk
    Reload,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSummary {
    pub name: String,
    pub site_alias: String,
    pub base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub name: String,
    pub label: String,
    pub environments: Vec<EnvironmentSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListOutput {
    pub projects: Vec<ProjectSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptOutput {
    pub script: String,
    pub exit_code: i32,
    pub stdout: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutput {
    pub project: String,
    pub environment: String,
    pub executed: usize,
    pub maintenance_mode: bool,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum ProjectOutput {
    List(ProjectListOutput),
    Status(StatusReport),
    Script(ScriptOutput),
    Update(UpdateOutput),
}

pub fn run(args: ProjectArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ProjectOutput> {
    match args.command {
        ProjectCommand::List => list(),
        ProjectCommand::Status {
            project,
            environment,
        } => status(project.as_deref(), environment.as_deref()),
        ProjectCommand::Script {
            name,
            project,
            environment,
        } => run_script(&name, project.as_deref(), environment.as_deref()),
        ProjectCommand::Update {
            project,
            environment,
            maintenance,
        } => update(&project, &environment, maintenance),
        ProjectCommand::Reload => Err(Error::not_implemented("project reload")),
    }
}

fn list() -> CmdResult<ProjectOutput> {
    let store = ConfigStore::load()?;
    Ok((ProjectOutput::List(summarize(&store)), 0))
}

fn summarize(store: &ConfigStore) -> ProjectListOutput {
    let projects = store
        .projects()
        .iter()
        .map(|project| ProjectSummary {
            name: project.name.clone(),
            label: project.label.clone(),
            environments: project
                .environments
                .iter()
                .map(|(name, env)| EnvironmentSummary {
                    name: name.clone(),
                    site_alias: env.site_alias.clone(),
                    base_url: env.base_url.clone(),
                })
                .collect(),
        })
        .collect();

    ProjectListOutput { projects }
}

fn status(project: Option<&str>, environment: Option<&str>) -> CmdResult<ProjectOutput> {
    let store = ConfigStore::load()?;
    let aliases = AliasManager::load()?;

    let report = caretaker::status::check(&store, &aliases, project, environment)?;
    let exit_code = if report.environments.iter().all(|e| e.success) {
        0
    } else {
        20
    };
    Ok((ProjectOutput::Status(report), exit_code))
}

/// Run a deployment script. With a project/environment, the script lives
/// next to that environment's Drupal root; otherwise the current directory
/// stands in for the root.
fn run_script(
    name: &str,
    project: Option<&str>,
    environment: Option<&str>,
) -> CmdResult<ProjectOutput> {
    let root = match environment {
        Some(environment) => {
            let store = ConfigStore::load()?;
            let project = match project {
                Some(project) => project.to_string(),
                None => store
                    .default_project()
                    .map(|p| p.to_string())
                    .ok_or_else(|| Error::config_missing_key("project", None))?,
            };
            let resolved = resolver::resolve(&store, &project, environment)?;
            std::path::PathBuf::from(resolved.drupal_root)
        }
        None => std::env::current_dir()
            .map_err(|e| Error::internal_io(e.to_string(), Some("current dir".to_string())))?,
    };

    let result = script::run(&root, name)?;
    let exit_code = if result.ok() { 0 } else { 20 };
    Ok((
        ProjectOutput::Script(ScriptOutput {
            script: name.to_string(),
            exit_code: result.exit_code,
            stdout: result.stdout,
        }),
        exit_code,
    ))
}

fn update(project: &str, environment: &str, maintenance: bool) -> CmdResult<ProjectOutput> {
    let store = ConfigStore::load()?;
    let aliases = AliasManager::load()?;

    let resolved = resolver::resolve(&store, project, environment)?;
    let target = aliases.resolve(&resolved.site_alias)?;

    let commands = update_commands();
    let options = RunOptions {
        maintenance_mode: maintenance,
        interactive: false,
    };
    let result = orchestrator::run_sequence_on(target, &commands, &options);

    if !result.success {
        let failed = result.failed_command.unwrap_or_default();
        return Err(Error::remote_command_failed(RemoteCommandFailedDetails {
            command: failed,
            exit_code: 1,
            stderr: String::new(),
            alias: resolved.site_alias,
        }));
    }

    Ok((
        ProjectOutput::Update(UpdateOutput {
            project: project.to_string(),
            environment: environment.to_string(),
            executed: result.executed,
            maintenance_mode: maintenance,
        }),
        0,
    ))
}

fn update_commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec::new("updatedb").option("yes", "1"),
        CommandSpec::new("config:import").option("yes", "1"),
        CommandSpec::new("cache:rebuild"),
    ]
}
