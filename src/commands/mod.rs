pub type CmdResult<T> = caretaker::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod alias;
pub mod drush;
pub mod playbook;
pub mod project;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        caretaker::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (caretaker::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Project(args) => dispatch!(args, global, project),
        crate::Commands::Playbook(args) => dispatch!(args, global, playbook),
        crate::Commands::Drush(args) => dispatch!(args, global, drush),
        crate::Commands::Alias(args) => dispatch!(args, global, alias),
    }
}
