use crate::error::{Error, Result};
use crate::settings::ConfigStore;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// An environment merged with its parent project's settings.
/// Environment fields win on collision. Constructed per request and never
/// cached; configuration is static for the process lifetime.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEnvironment {
    pub project: String,
    pub environment: String,
    pub label: String,

    pub site_alias: String,
    pub base_url: String,
    pub drupal_root: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ansible_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ansible_inventory: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub ansible_playbooks: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub vars: HashMap<String, String>,
}

/// Look up `project`/`environment` and merge the environment record over the
/// project's own settings.
pub fn resolve(store: &ConfigStore, project: &str, environment: &str) -> Result<ResolvedEnvironment> {
    let project_settings = store.project(project)?;
    let env = project_settings
        .environments
        .get(environment)
        .ok_or_else(|| Error::environment_not_found(project, environment))?;

    // Merge with override: project-level vars first, environment keys win.
    let mut vars = project_settings.vars.clone();
    for (key, value) in &env.vars {
        vars.insert(key.clone(), value.clone());
    }

    Ok(ResolvedEnvironment {
        project: project_settings.name.clone(),
        environment: environment.to_string(),
        label: project_settings.label.clone(),
        site_alias: env.site_alias.clone(),
        base_url: env.base_url.clone(),
        drupal_root: env.drupal_root.clone(),
        ansible_directory: env
            .ansible_directory
            .clone()
            .or_else(|| project_settings.ansible_directory.clone()),
        ansible_inventory: env
            .ansible_inventory
            .clone()
            .or_else(|| project_settings.ansible_inventory.clone()),
        ansible_playbooks: env.ansible_playbooks.clone(),
        vars,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Environment, Project};
    use crate::ErrorCode;

    fn fixture() -> ConfigStore {
        let mut environments = BTreeMap::new();
        environments.insert(
            "staging".to_string(),
            Environment {
                site_alias: "@acme.staging".to_string(),
                base_url: "https://staging.acme.example".to_string(),
                drupal_root: "/var/www/acme/web".to_string(),
                ansible_playbooks: BTreeMap::from([(
                    "deploy".to_string(),
                    "playbooks/deploy.yml".to_string(),
                )]),
                ansible_directory: None,
                ansible_inventory: Some("staging-hosts.ini".to_string()),
                vars: HashMap::from([("tier".to_string(), "staging".to_string())]),
            },
        );

        ConfigStore::new(vec![Project {
            name: "acme".to_string(),
            label: "Acme Corp".to_string(),
            ansible_directory: Some("/srv/ansible/acme".to_string()),
            ansible_inventory: Some("hosts.ini".to_string()),
            vars: HashMap::from([
                ("tier".to_string(), "default".to_string()),
                ("owner".to_string(), "ops".to_string()),
            ]),
            environments,
        }])
    }

    #[test]
    fn environment_fields_win_on_collision() {
        let store = fixture();
        let resolved = resolve(&store, "acme", "staging").unwrap();

        // Environment-level inventory overrides the project's
        assert_eq!(resolved.ansible_inventory.as_deref(), Some("staging-hosts.ini"));
        // Absent at environment level: falls back to the project's
        assert_eq!(resolved.ansible_directory.as_deref(), Some("/srv/ansible/acme"));
        // Var collision: environment wins, project-only keys survive
        assert_eq!(resolved.vars["tier"], "staging");
        assert_eq!(resolved.vars["owner"], "ops");
    }

    #[test]
    fn resolved_record_carries_environment_identity() {
        let store = fixture();
        let resolved = resolve(&store, "acme", "staging").unwrap();
        assert_eq!(resolved.project, "acme");
        assert_eq!(resolved.environment, "staging");
        assert_eq!(resolved.site_alias, "@acme.staging");
        assert_eq!(resolved.drupal_root, "/var/www/acme/web");
    }

    #[test]
    fn unknown_project_fails_with_project_not_found() {
        let store = fixture();
        let err = resolve(&store, "globex", "staging").unwrap_err();
        assert_eq!(err.code, ErrorCode::ProjectNotFound);
    }

    #[test]
    fn unknown_environment_fails_with_environment_not_found() {
        let store = fixture();
        let err = resolve(&store, "acme", "qa").unwrap_err();
        assert_eq!(err.code, ErrorCode::EnvironmentNotFound);
    }
}
