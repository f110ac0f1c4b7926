use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;

use caretaker::output;
use commands::{alias, drush, playbook, project};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "caretaker")]
#[command(version = VERSION)]
#[command(about = "CLI tool for Drupal multi-site operations and deployment")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage projects: listing, status, scripts, updates
    #[command(visible_alias = "projects")]
    Project(project::ProjectArgs),
    /// List and launch ansible playbooks
    Playbook(playbook::PlaybookArgs),
    /// Run a drush command on a project environment
    Drush(drush::DrushArgs),
    /// Inspect the site alias registry
    Alias(alias::AliasArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs {};

    let (json_result, exit_code) = commands::run_json(cli.command, &global);

    if output::print_json_result(json_result).is_err() {
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
