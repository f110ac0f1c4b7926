use clap::Args;
use serde::Serialize;

use caretaker::alias::AliasManager;
use caretaker::error::{Error, RemoteCommandFailedDetails};
use caretaker::resolver;
use caretaker::runner::{self, CommandSpec};
use caretaker::settings::ConfigStore;

use crate::commands::CmdResult;

#[derive(Args)]
pub struct DrushArgs {
    /// Project name
    pub project: String,
    /// Environment name
    pub environment: String,
    /// Drush command name (e.g. core:status)
    pub command: String,
    /// Arguments passed through to drush
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrushOutput {
    pub command: String,
    pub alias: String,
    pub exit_code: i32,
    pub stdout: String,
}

pub fn run(args: DrushArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<DrushOutput> {
    let store = ConfigStore::load()?;
    let aliases = AliasManager::load()?;

    let resolved = resolver::resolve(&store, &args.project, &args.environment)?;
    let target = aliases.resolve(&resolved.site_alias)?;

    let spec = CommandSpec::new(&args.command).args(args.args.iter().cloned());
    let result = runner::run_remote(target, &spec);

    if !result.ok() {
        return Err(Error::remote_command_failed(RemoteCommandFailedDetails {
            command: args.command,
            exit_code: result.exit_code,
            stderr: result.stderr,
            alias: resolved.site_alias,
        }));
    }

    Ok((
        DrushOutput {
            command: args.command,
            alias: resolved.site_alias,
            exit_code: result.exit_code,
            stdout: result.stdout,
        },
        0,
    ))
}
