use clap::{Args, Subcommand};
use serde::Serialize;

use caretaker::alias::AliasManager;

use crate::commands::CmdResult;

#[derive(Args)]
pub struct AliasArgs {
    #[command(subcommand)]
    command: AliasCommand,
}

#[derive(Subcommand)]
pub enum AliasCommand {
    /// List registered site aliases
    List,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasEntry {
    pub alias: String,
    pub host: String,
    pub user: String,
    pub port: u16,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasListOutput {
    pub aliases: Vec<AliasEntry>,
}

pub fn run(args: AliasArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<AliasListOutput> {
    match args.command {
        AliasCommand::List => list(),
    }
}

fn list() -> CmdResult<AliasListOutput> {
    let manager = AliasManager::load()?;
    let aliases = manager
        .list()
        .map(|(alias, target)| AliasEntry {
            alias: alias.clone(),
            host: target.host.clone(),
            user: target.user.clone(),
            port: target.port,
        })
        .collect();
    Ok((AliasListOutput { aliases }, 0))
}
