use crate::alias::SiteTarget;
use crate::runner::{self, CommandSpec, RunResult};

/// Knobs for a command sequence run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Bracket the sequence with maintenance mode on/off.
    pub maintenance_mode: bool,
    /// Stream command output instead of capturing it.
    pub interactive: bool,
}

/// What happened across a sequence: how many commands ran, and which one
/// broke the run (if any).
#[derive(Debug, Clone)]
pub struct SequenceResult {
    pub success: bool,
    pub executed: usize,
    pub failed_command: Option<String>,
}

/// Seam between the orchestrator and actual command transport.
pub trait CommandDispatch {
    fn dispatch(&self, spec: &CommandSpec) -> RunResult;
}

/// Production dispatch: drush over SSH against a site target.
pub struct DrushDispatch<'a> {
    pub target: &'a SiteTarget,
    pub interactive: bool,
}

impl CommandDispatch for DrushDispatch<'_> {
    fn dispatch(&self, spec: &CommandSpec) -> RunResult {
        if self.interactive {
            runner::run_remote_interactive(self.target, spec)
        } else {
            runner::run_remote(self.target, spec)
        }
    }
}

/// Maintenance-mode bracket. Enabling is best effort; disabling happens on
/// drop, exactly once, whether the sequence succeeded or not.
pub struct MaintenanceWindow<'a> {
    dispatch: &'a dyn CommandDispatch,
    active: bool,
}

impl<'a> MaintenanceWindow<'a> {
    pub fn enable(dispatch: &'a dyn CommandDispatch) -> Self {
        log_status!("maintenance", "Enabling maintenance mode");
        let result = dispatch.dispatch(&maintenance_toggle(true));
        if !result.ok() {
            log_status!(
                "maintenance",
                "Could not enable maintenance mode, continuing anyway"
            );
        }
        Self {
            dispatch,
            active: true,
        }
    }

    /// A window that toggles nothing. Lets callers hold a uniform guard.
    pub fn disabled(dispatch: &'a dyn CommandDispatch) -> Self {
        Self {
            dispatch,
            active: false,
        }
    }
}

impl Drop for MaintenanceWindow<'_> {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        log_status!("maintenance", "Disabling maintenance mode");
        let result = self.dispatch.dispatch(&maintenance_toggle(false));
        if !result.ok() {
            log_status!(
                "maintenance",
                "Could not disable maintenance mode, check the site manually"
            );
        }
    }
}

fn maintenance_toggle(on: bool) -> CommandSpec {
    CommandSpec::new("state:set")
        .arg("system.maintenance_mode")
        .arg(if on { "1" } else { "0" })
        .option("input-format", "integer")
}

/// Run commands in order, stopping at the first failure. With
/// `maintenance_mode` set, the run is bracketed so maintenance mode is
/// switched off again even when a command fails.
pub fn run_sequence(
    dispatch: &dyn CommandDispatch,
    commands: &[CommandSpec],
    options: &RunOptions,
) -> SequenceResult {
    let _window = if options.maintenance_mode {
        MaintenanceWindow::enable(dispatch)
    } else {
        MaintenanceWindow::disabled(dispatch)
    };

    let mut executed = 0;
    for spec in commands {
        log_status!("sequence", "Running '{}'", spec.name);
        let result = dispatch.dispatch(spec);
        executed += 1;

        if !result.ok() {
            log_status!("sequence", "Aborting: '{}' failed", spec.name);
            return SequenceResult {
                success: false,
                executed,
                failed_command: Some(spec.name.clone()),
            };
        }

        let stdout = result.stdout.trim();
        if !stdout.is_empty() {
            log_status!("sequence", "{}", stdout);
        }
    }

    SequenceResult {
        success: true,
        executed,
        failed_command: None,
    }
}

/// Convenience wrapper wiring the production drush dispatch.
pub fn run_sequence_on(
    target: &SiteTarget,
    commands: &[CommandSpec],
    options: &RunOptions,
) -> SequenceResult {
    let dispatch = DrushDispatch {
        target,
        interactive: options.interactive,
    };
    run_sequence(&dispatch, commands, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records dispatched command names; fails any command whose name is in
    /// the deny list.
    struct RecordingDispatch {
        calls: RefCell<Vec<String>>,
        fail_on: Vec<String>,
    }

    impl RecordingDispatch {
        fn new(fail_on: &[&str]) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail_on: fail_on.iter().map(|s| s.to_string()).collect(),
            }
        }

        fn rendered_calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl CommandDispatch for RecordingDispatch {
        fn dispatch(&self, spec: &CommandSpec) -> RunResult {
            let key = if spec.name == "state:set" {
                format!("state:set {}", spec.arguments.join(" "))
            } else {
                spec.name.clone()
            };
            self.calls.borrow_mut().push(key);

            let success = !self.fail_on.contains(&spec.name);
            RunResult {
                success,
                stdout: String::new(),
                stderr: if success {
                    String::new()
                } else {
                    "boom".to_string()
                },
                exit_code: if success { 0 } else { 1 },
            }
        }
    }

    fn update_commands() -> Vec<CommandSpec> {
        vec![
            CommandSpec::new("updatedb").option("yes", "1"),
            CommandSpec::new("config:import").option("yes", "1"),
            CommandSpec::new("cache:rebuild"),
        ]
    }

    #[test]
    fn runs_all_commands_in_order() {
        let dispatch = RecordingDispatch::new(&[]);
        let result = run_sequence(&dispatch, &update_commands(), &RunOptions::default());

        assert!(result.success);
        assert_eq!(result.executed, 3);
        assert_eq!(
            dispatch.rendered_calls(),
            vec!["updatedb", "config:import", "cache:rebuild"]
        );
    }

    #[test]
    fn aborts_on_first_failure_and_names_it() {
        let dispatch = RecordingDispatch::new(&["config:import"]);
        let result = run_sequence(&dispatch, &update_commands(), &RunOptions::default());

        assert!(!result.success);
        assert_eq!(result.executed, 2);
        assert_eq!(result.failed_command.as_deref(), Some("config:import"));
        // cache:rebuild never ran
        assert_eq!(dispatch.rendered_calls(), vec!["updatedb", "config:import"]);
    }

    #[test]
    fn maintenance_mode_brackets_the_sequence() {
        let dispatch = RecordingDispatch::new(&[]);
        let options = RunOptions {
            maintenance_mode: true,
            ..Default::default()
        };
        let result = run_sequence(&dispatch, &update_commands(), &options);

        assert!(result.success);
        assert_eq!(
            dispatch.rendered_calls(),
            vec![
                "state:set system.maintenance_mode 1",
                "updatedb",
                "config:import",
                "cache:rebuild",
                "state:set system.maintenance_mode 0",
            ]
        );
    }

    #[test]
    fn maintenance_mode_is_disabled_even_after_failure() {
        let dispatch = RecordingDispatch::new(&["updatedb"]);
        let options = RunOptions {
            maintenance_mode: true,
            ..Default::default()
        };
        let result = run_sequence(&dispatch, &update_commands(), &options);

        assert!(!result.success);
        assert_eq!(
            dispatch.rendered_calls(),
            vec![
                "state:set system.maintenance_mode 1",
                "updatedb",
                "state:set system.maintenance_mode 0",
            ]
        );
    }

    #[test]
    fn failed_maintenance_enable_does_not_abort_the_run() {
        let dispatch = RecordingDispatch::new(&["state:set"]);
        let options = RunOptions {
            maintenance_mode: true,
            ..Default::default()
        };
        let result = run_sequence(&dispatch, &update_commands(), &options);

        assert!(result.success);
        assert_eq!(result.executed, 3);
    }
}
