use crate::alias::AliasManager;
use crate::error::Result;
use crate::resolver;
use crate::runner::{self, CommandSpec};
use crate::settings::ConfigStore;
use serde::Serialize;

/// Health of one environment, from a `core:status` probe over its alias.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentStatus {
    pub project: String,
    pub environment: String,
    pub alias: String,
    pub success: bool,
    pub output: String,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub environments: Vec<EnvironmentStatus>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Probe every configured environment (optionally narrowed to a project
/// and environment). An unresolvable alias becomes a warning and the
/// remaining environments are still probed; unknown project/environment
/// filters are hard errors.
pub fn check(
    store: &ConfigStore,
    aliases: &AliasManager,
    project_filter: Option<&str>,
    environment_filter: Option<&str>,
) -> Result<StatusReport> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    match (project_filter, environment_filter) {
        (Some(project), Some(environment)) => {
            // Resolve up front so bad filters fail loudly.
            resolver::resolve(store, project, environment)?;
            pairs.push((project.to_string(), environment.to_string()));
        }
        (Some(project), None) => {
            let settings = store.project(project)?;
            for environment in settings.environments.keys() {
                pairs.push((project.to_string(), environment.clone()));
            }
        }
        (None, _) => {
            for project in store.projects() {
                for environment in project.environments.keys() {
                    pairs.push((project.name.clone(), environment.clone()));
                }
            }
        }
    }

    let mut report = StatusReport::default();
    for (project, environment) in pairs {
        let resolved = resolver::resolve(store, &project, &environment)?;

        let target = match aliases.resolve(&resolved.site_alias) {
            Ok(target) => target,
            Err(err) => {
                log_status!("status", "Skipping {}/{}: {}", project, environment, err);
                report.warnings.push(format!(
                    "{}/{}: alias '{}' is not registered",
                    project, environment, resolved.site_alias
                ));
                continue;
            }
        };

        let result = runner::run_remote(target, &CommandSpec::new("core:status"));
        report.environments.push(EnvironmentStatus {
            project,
            environment,
            alias: resolved.site_alias,
            success: result.success,
            output: if result.success {
                result.stdout.trim().to_string()
            } else {
                result.stderr.trim().to_string()
            },
        });
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Environment, Project};
    use crate::ErrorCode;
    use std::collections::{BTreeMap, HashMap};

    fn store() -> ConfigStore {
        let mut environments = BTreeMap::new();
        environments.insert(
            "staging".to_string(),
            Environment {
                site_alias: "@acme.staging".to_string(),
                base_url: "https://staging.acme.example".to_string(),
                drupal_root: "/var/www/acme/web".to_string(),
                ansible_playbooks: BTreeMap::new(),
                ansible_directory: None,
                ansible_inventory: None,
                vars: HashMap::new(),
            },
        );
        ConfigStore::new(vec![Project {
            name: "acme".to_string(),
            label: "Acme Corp".to_string(),
            ansible_directory: None,
            ansible_inventory: None,
            vars: HashMap::new(),
            environments,
        }])
    }

    #[test]
    fn unregistered_alias_is_a_warning_not_an_error() {
        let report = check(&store(), &AliasManager::default(), None, None).unwrap();
        assert!(report.environments.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("@acme.staging"));
    }

    #[test]
    fn unknown_project_filter_is_an_error() {
        let err = check(&store(), &AliasManager::default(), Some("globex"), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::ProjectNotFound);
    }

    #[test]
    fn unknown_environment_filter_is_an_error() {
        let err = check(
            &store(),
            &AliasManager::default(),
            Some("acme"),
            Some("qa"),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::EnvironmentNotFound);
    }
}
