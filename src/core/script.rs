use crate::error::{Error, Result};
use crate::runner::{self, RunResult};
use crate::shell;
use std::path::{Path, PathBuf};

/// Extensions tried, in order, when the script name has none.
const VARIANTS: &[&str] = &["", ".sh", ".py"];

/// Locate a deployment script by name, trying the bare name first and then
/// the known extensions.
pub fn find(scripts_dir: &Path, name: &str) -> Result<PathBuf> {
    let mut tried = Vec::new();
    for variant in VARIANTS {
        let candidate = scripts_dir.join(format!("{}{}", name, variant));
        if candidate.is_file() {
            return Ok(candidate);
        }
        tried.push(candidate.display().to_string());
    }
    Err(Error::script_not_found(name, tried))
}

/// Where deployment scripts live relative to a site's Drupal root: a
/// `scripts` directory next to it (one level up).
pub fn scripts_dir(drupal_root: &Path) -> PathBuf {
    drupal_root
        .parent()
        .unwrap_or(drupal_root)
        .join("scripts")
}

/// Find and run a deployment script, with the Drupal root as the working
/// directory. The script's failure comes back through the result, not as
/// an error; only a missing script is an error.
pub fn run(drupal_root: &Path, name: &str) -> Result<RunResult> {
    let path = find(&scripts_dir(drupal_root), name)?;
    log_status!("script", "Running {}", path.display());
    let command_line = shell::quote_path(&path.to_string_lossy());
    Ok(runner::run_local(&command_line, Some(drupal_root)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;

    #[test]
    fn bare_name_wins_over_extension_variants() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("deploy"), "").unwrap();
        std::fs::write(dir.path().join("deploy.sh"), "").unwrap();

        let found = find(dir.path(), "deploy").unwrap();
        assert_eq!(found, dir.path().join("deploy"));
    }

    #[test]
    fn falls_back_to_sh_then_py() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("migrate.py"), "").unwrap();

        let found = find(dir.path(), "migrate").unwrap();
        assert_eq!(found, dir.path().join("migrate.py"));
    }

    #[test]
    fn missing_script_reports_every_candidate_tried() {
        let dir = tempfile::tempdir().unwrap();
        let err = find(dir.path(), "deploy").unwrap_err();
        assert_eq!(err.code, ErrorCode::ScriptNotFound);
        let tried = err.details["tried"].as_array().unwrap();
        assert_eq!(tried.len(), 3);
    }

    #[test]
    fn scripts_dir_is_sibling_of_drupal_root() {
        assert_eq!(
            scripts_dir(Path::new("/var/www/acme/web")),
            PathBuf::from("/var/www/acme/scripts")
        );
    }

    #[cfg(unix)]
    #[test]
    fn run_executes_script_from_drupal_root() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("web");
        let scripts = dir.path().join("scripts");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::create_dir_all(&scripts).unwrap();

        let script = scripts.join("whereami.sh");
        std::fs::write(&script, "#!/bin/sh\npwd\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let result = run(&root, "whereami").unwrap();
        assert!(result.ok());
        assert_eq!(
            std::fs::canonicalize(result.stdout.trim()).unwrap(),
            std::fs::canonicalize(&root).unwrap()
        );
    }
}
