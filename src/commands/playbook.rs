use clap::{Args, Subcommand};
use serde::Serialize;

use caretaker::error::Error;
use caretaker::playbook::{self, LaunchOutcome};
use caretaker::prompt::PromptEngine;
use caretaker::settings::ConfigStore;
use caretaker::resolver;

use crate::commands::CmdResult;

#[derive(Args)]
pub struct PlaybookArgs {
    #[command(subcommand)]
    command: PlaybookCommand,
}

#[derive(Subcommand)]
pub enum PlaybookCommand {
    /// List playbooks configured for an environment
    List {
        /// Project name
        project: String,
        /// Environment name
        environment: String,
    },
    /// Launch a playbook against an environment
    Run {
        /// Project name
        project: String,
        /// Environment name
        environment: String,
        /// Playbook key from the environment's configuration
        playbook: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybookEntry {
    pub key: String,
    pub path: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybookListOutput {
    pub project: String,
    pub environment: String,
    pub playbooks: Vec<PlaybookEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybookRunOutput {
    pub playbook: String,
    pub exit_code: i32,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum PlaybookOutput {
    List(PlaybookListOutput),
    Run(PlaybookRunOutput),
}

pub fn run(args: PlaybookArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<PlaybookOutput> {
    match args.command {
        PlaybookCommand::List {
            project,
            environment,
        } => list(&project, &environment),
        PlaybookCommand::Run {
            project,
            environment,
            playbook,
            yes,
        } => launch(&project, &environment, &playbook, yes),
    }
}

fn list(project: &str, environment: &str) -> CmdResult<PlaybookOutput> {
    let store = ConfigStore::load()?;
    let resolved = resolver::resolve(&store, project, environment)?;

    let playbooks = resolved
        .ansible_playbooks
        .iter()
        .map(|(key, path)| PlaybookEntry {
            key: key.clone(),
            path: path.clone(),
        })
        .collect();

    Ok((
        PlaybookOutput::List(PlaybookListOutput {
            project: resolved.project,
            environment: resolved.environment,
            playbooks,
        }),
        0,
    ))
}

fn launch(project: &str, environment: &str, playbook: &str, yes: bool) -> CmdResult<PlaybookOutput> {
    let store = ConfigStore::load()?;
    let resolved = resolver::resolve(&store, project, environment)?;

    let prompt = if yes {
        PromptEngine::assume_yes()
    } else {
        PromptEngine::new()
    };

    match playbook::launch(&resolved, playbook, &prompt)? {
        LaunchOutcome::Declined => Err(Error::cancelled()),
        LaunchOutcome::Completed { success: false, exit_code } => {
            Err(Error::playbook_run_failed(playbook, exit_code))
        }
        LaunchOutcome::Completed { exit_code, .. } => Ok((
            PlaybookOutput::Run(PlaybookRunOutput {
                playbook: playbook.to_string(),
                exit_code,
            }),
            0,
        )),
    }
}
