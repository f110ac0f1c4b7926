use crate::error::{Error, Result};
use crate::prompt::PromptEngine;
use crate::resolver::ResolvedEnvironment;
use crate::shell;
use crate::ssh;
use std::path::{Path, PathBuf};

/// A playbook invocation ready to launch: resolved paths plus the
/// environment context passed along as extra variables.
#[derive(Debug, Clone)]
pub struct PlaybookRun {
    pub key: String,
    pub playbook_path: PathBuf,
    pub inventory_path: PathBuf,
    pub extra_vars: Vec<(String, String)>,
}

/// How a launch ended: the operator declined at the confirmation prompt,
/// or ansible ran to completion (successfully or not).
#[derive(Debug, Clone)]
pub enum LaunchOutcome {
    Declined,
    Completed { success: bool, exit_code: i32 },
}

/// Resolve a playbook key against an environment into concrete paths.
/// Relative playbook and inventory entries are joined onto the ansible
/// directory.
pub fn prepare(resolved: &ResolvedEnvironment, key: &str) -> Result<PlaybookRun> {
    let entry = resolved.ansible_playbooks.get(key).ok_or_else(|| {
        Error::playbook_not_found(
            key,
            &resolved.project,
            &resolved.environment,
            resolved.ansible_playbooks.keys().cloned().collect(),
        )
    })?;

    let directory = resolved.ansible_directory.as_deref().ok_or_else(|| {
        Error::config_missing_key(
            "ansibleDirectory",
            Some(format!("project '{}'", resolved.project)),
        )
    })?;
    let inventory = resolved.ansible_inventory.as_deref().ok_or_else(|| {
        Error::config_missing_key(
            "ansibleInventory",
            Some(format!("project '{}'", resolved.project)),
        )
    })?;

    let base = PathBuf::from(directory);
    let playbook_path = join_under(&base, entry);
    let inventory_path = join_under(&base, inventory);

    let mut extra_vars = vec![
        ("project".to_string(), resolved.project.clone()),
        ("environment".to_string(), resolved.environment.clone()),
        ("site_alias".to_string(), resolved.site_alias.clone()),
        ("drupal_root".to_string(), resolved.drupal_root.clone()),
    ];
    let mut user_vars: Vec<_> = resolved.vars.iter().collect();
    user_vars.sort_by_key(|(key, _)| key.to_string());
    for (key, value) in user_vars {
        extra_vars.push((key.clone(), value.clone()));
    }

    Ok(PlaybookRun {
        key: key.to_string(),
        playbook_path,
        inventory_path,
        extra_vars,
    })
}

fn join_under(base: &Path, entry: &str) -> PathBuf {
    let path = PathBuf::from(entry);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

impl PlaybookRun {
    /// The `ansible-playbook` command line, quoted for the shell.
    pub fn command_line(&self) -> String {
        let mut parts = vec![
            "ansible-playbook".to_string(),
            "-i".to_string(),
            shell::quote_path(&self.inventory_path.to_string_lossy()),
            shell::quote_path(&self.playbook_path.to_string_lossy()),
            "-v".to_string(),
        ];
        for (key, value) in &self.extra_vars {
            parts.push("-e".to_string());
            parts.push(shell::quote_arg(&format!("{}={}", key, value)));
        }
        parts.join(" ")
    }

    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Playbook:  {}", self.playbook_path.display()),
            format!("Inventory: {}", self.inventory_path.display()),
        ];
        for (key, value) in &self.extra_vars {
            lines.push(format!("  {} = {}", key, value));
        }
        lines
    }
}

/// Prepare a playbook run, show its summary, and launch it after
/// confirmation. The prompt defaults to no; a declined run is not an error.
/// Ansible output streams straight to the terminal.
pub fn launch(
    resolved: &ResolvedEnvironment,
    key: &str,
    prompt: &PromptEngine,
) -> Result<LaunchOutcome> {
    let run = prepare(resolved, key)?;

    let confirmed = prompt.confirm_summary(
        &run.summary_lines(),
        &format!("Launch playbook '{}'?", key),
        false,
    );
    if !confirmed {
        log_status!("playbook", "Launch of '{}' cancelled", key);
        return Ok(LaunchOutcome::Declined);
    }

    let command_line = run.command_line();
    log_status!("playbook", "{}", command_line);

    let exit_code = ssh::execute_local_command_interactive(&command_line, None);
    Ok(LaunchOutcome::Completed {
        success: exit_code == 0,
        exit_code,
    })
}
