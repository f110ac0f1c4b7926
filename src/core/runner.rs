use crate::alias::SiteTarget;
use crate::shell;
use crate::ssh::{self, SshClient};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// A single management-tool command: name plus positional arguments and
/// `--key=value` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: String,
    pub arguments: Vec<String>,
    pub options: BTreeMap<String, String>,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            options: BTreeMap::new(),
        }
    }

    pub fn arg(mut self, argument: impl Into<String>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    pub fn args(mut self, arguments: impl IntoIterator<Item = String>) -> Self {
        self.arguments.extend(arguments);
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Render the drush invocation for a target, shell-quoted.
    pub fn render(&self, target: &SiteTarget) -> String {
        let mut parts = vec!["drush".to_string()];

        if let Some(root) = &target.drupal_root {
            parts.push(format!("--root={}", shell::quote_path(root)));
        }
        if let Some(uri) = &target.uri {
            parts.push(format!("--uri={}", shell::quote_arg(uri)));
        }

        parts.push(shell::quote_arg(&self.name));
        for argument in &self.arguments {
            parts.push(shell::quote_arg(argument));
        }
        for (key, value) in &self.options {
            parts.push(format!("--{}={}", key, shell::quote_arg(value)));
        }

        parts.join(" ")
    }
}

/// Outcome of a single dispatched command. Dispatch failures are reported
/// through `success`, never as an `Err` - at most one attempt, no retry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl RunResult {
    /// The uniform success predicate used by every layer that checks
    /// whether the last call succeeded.
    pub fn ok(&self) -> bool {
        self.success
    }

    pub(crate) fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: message.into(),
            exit_code: -1,
        }
    }
}

/// A command routed to one of the two target kinds.
pub enum Invocation<'a> {
    /// Remote drush command against a resolved site target.
    Drush {
        target: &'a SiteTarget,
        spec: &'a CommandSpec,
    },
    /// Local shell command rooted at a working directory.
    Shell {
        command_line: &'a str,
        working_dir: Option<&'a Path>,
    },
}

impl Invocation<'_> {
    pub fn run(&self) -> RunResult {
        match self {
            Invocation::Drush { target, spec } => run_remote(target, spec),
            Invocation::Shell {
                command_line,
                working_dir,
            } => run_local(command_line, *working_dir),
        }
    }
}

/// Run a drush command on a target and wait for completion. Stdout is
/// carried in the result; stderr is logged on failure, not surfaced.
pub fn run_remote(target: &SiteTarget, spec: &CommandSpec) -> RunResult {
    let command = spec.render(target);
    log_status!("drush", "{}@{}: {}", target.user, target.host, command);

    let client = match SshClient::from_target(target, &target.host) {
        Ok(client) => client,
        Err(err) => return RunResult::failure(err.to_string()),
    };

    let result = client.execute(&command);
    if !result.ok() {
        log_status!("drush", "Command '{}' failed: {}", spec.name, result.stderr.trim());
    }
    result
}

/// Run a drush command with inherited stdio (streaming output).
pub fn run_remote_interactive(target: &SiteTarget, spec: &CommandSpec) -> RunResult {
    let command = spec.render(target);
    log_status!("drush", "{}@{}: {}", target.user, target.host, command);

    let client = match SshClient::from_target(target, &target.host) {
        Ok(client) => client,
        Err(err) => return RunResult::failure(err.to_string()),
    };

    let exit_code = client.execute_interactive(Some(&command));
    RunResult {
        success: exit_code == 0,
        stdout: String::new(),
        stderr: String::new(),
        exit_code,
    }
}

/// Run a command line in the local shell rooted at `working_dir`
/// (default: current working directory).
pub fn run_local(command_line: &str, working_dir: Option<&Path>) -> RunResult {
    let dir = working_dir.map(|d| d.to_string_lossy().to_string());
    log_status!(
        "shell",
        "{} [{}]",
        command_line,
        dir.as_deref().unwrap_or(".")
    );

    let result = ssh::execute_local_command_in_dir(command_line, dir.as_deref());
    if !result.ok() {
        log_status!("shell", "Command failed: {}", result.stderr.trim());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> SiteTarget {
        SiteTarget {
            host: "staging.acme.example".to_string(),
            user: "deploy".to_string(),
            port: 22,
            identity_file: None,
            drupal_root: Some("/var/www/acme/web".to_string()),
            uri: Some("https://staging.acme.example".to_string()),
        }
    }

    #[test]
    fn render_includes_root_uri_and_options() {
        let spec = CommandSpec::new("state:set")
            .arg("system.maintenance_mode")
            .arg("1")
            .option("input-format", "integer");

        assert_eq!(
            spec.render(&target()),
            "drush --root='/var/www/acme/web' --uri=https://staging.acme.example \
             state:set system.maintenance_mode 1 --input-format=integer"
        );
    }

    #[test]
    fn render_quotes_arguments_with_metacharacters() {
        let spec = CommandSpec::new("sql:query").arg("SELECT 1;");
        let rendered = spec.render(&target());
        assert!(rendered.ends_with("sql:query 'SELECT 1;'"));
    }

    #[test]
    fn render_without_root_or_uri() {
        let bare = SiteTarget {
            host: "localhost".to_string(),
            user: "deploy".to_string(),
            port: 22,
            identity_file: None,
            drupal_root: None,
            uri: None,
        };
        assert_eq!(CommandSpec::new("core:status").render(&bare), "drush core:status");
    }

    #[test]
    fn local_run_captures_output() {
        let result = run_local("echo hello", None);
        assert!(result.ok());
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[test]
    fn local_run_reports_failure_via_result() {
        let result = run_local("exit 3", None);
        assert!(!result.ok());
        assert_eq!(result.exit_code, 3);
    }
}
