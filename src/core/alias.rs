use crate::error::{Error, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// What a site alias resolves to: a reachable deployment target for remote
/// command dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteTarget {
    pub host: String,
    pub user: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub identity_file: Option<String>,
    /// Drupal root on the target, passed to drush as --root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drupal_root: Option<String>,
    /// Site URI on the target, passed to drush as --uri.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

fn default_port() -> u16 {
    22
}

/// Registry mapping site alias strings (e.g. `@acme.staging`) to targets,
/// loaded once from `aliases.json`.
#[derive(Debug, Clone, Default)]
pub struct AliasManager {
    targets: BTreeMap<String, SiteTarget>,
}

impl AliasManager {
    pub fn new(targets: BTreeMap<String, SiteTarget>) -> Self {
        Self { targets }
    }

    /// Load the alias registry from the default config location.
    /// A missing file yields an empty registry, not an error.
    pub fn load() -> Result<Self> {
        let path = paths::aliases()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_path(&path)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
        })?;
        let targets: BTreeMap<String, SiteTarget> = serde_json::from_str(&content)
            .map_err(|e| Error::config_invalid_json(path.display().to_string(), e))?;
        Ok(Self { targets })
    }

    /// Resolve an alias to its target. An unknown alias is a distinct
    /// failure from project/environment lookup errors.
    pub fn resolve(&self, alias: &str) -> Result<&SiteTarget> {
        self.targets
            .get(alias)
            .ok_or_else(|| Error::alias_unresolved(alias))
    }

    pub fn list(&self) -> impl Iterator<Item = (&String, &SiteTarget)> {
        self.targets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;

    #[test]
    fn from_path_parses_registry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aliases.json");
        std::fs::write(
            &path,
            r#"{
                "@acme.staging": {
                    "host": "staging.acme.example",
                    "user": "deploy",
                    "drupalRoot": "/var/www/acme/web",
                    "uri": "https://staging.acme.example"
                }
            }"#,
        )
        .unwrap();

        let manager = AliasManager::from_path(&path).unwrap();
        let target = manager.resolve("@acme.staging").unwrap();
        assert_eq!(target.host, "staging.acme.example");
        assert_eq!(target.port, 22);
    }

    #[test]
    fn unknown_alias_is_unresolved() {
        let manager = AliasManager::default();
        let err = manager.resolve("@nowhere.prod").unwrap_err();
        assert_eq!(err.code, ErrorCode::AliasUnresolved);
    }
}
