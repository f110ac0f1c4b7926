use crate::error::{Error, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Project-level settings, one JSON file per project under the projects
/// directory. The file stem is the project name.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(skip_deserializing, default)]
    pub name: String,

    #[serde(default)]
    pub label: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ansible_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ansible_inventory: Option<String>,

    /// Project-level defaults passed through to playbooks and scripts.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: HashMap<String, String>,

    #[serde(default)]
    pub environments: BTreeMap<String, Environment>,
}

/// A deployment target within a project (staging, production, ...).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub site_alias: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub drupal_root: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ansible_playbooks: BTreeMap<String, String>,

    // Environment-level overrides of the project's ansible paths.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ansible_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ansible_inventory: Option<String>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: HashMap<String, String>,
}

/// Immutable project/environment configuration, loaded once at startup and
/// passed by reference. There is no reload during the process lifetime.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    projects: Vec<Project>,
}

impl ConfigStore {
    /// Build a store from already-constructed projects (tests, embedding).
    pub fn new(mut projects: Vec<Project>) -> Self {
        projects.sort_by(|a, b| a.name.cmp(&b.name));
        Self { projects }
    }

    /// Load all project files from the default config directory.
    /// A missing directory yields an empty store, not an error.
    pub fn load() -> Result<Self> {
        let dir = paths::projects()?;
        if !dir.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&dir)
    }

    /// Load all `<name>.json` project files from an explicit directory.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("read {}", dir.display())))
        })?;

        let mut projects = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") || path.is_dir() {
                continue;
            }
            let Some(name) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };

            let content = std::fs::read_to_string(&path).map_err(|e| {
                Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
            })?;
            let mut project: Project = serde_json::from_str(&content)
                .map_err(|e| Error::config_invalid_json(path.display().to_string(), e))?;
            project.name = name;
            projects.push(project);
        }

        Ok(Self::new(projects))
    }

    /// All projects, sorted by name.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, name: &str) -> Result<&Project> {
        self.projects
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::project_not_found(name))
    }

    pub fn environments(&self, project: &str) -> Result<&BTreeMap<String, Environment>> {
        Ok(&self.project(project)?.environments)
    }

    /// First project in stored order. A convenience for single-project
    /// setups; with several projects the choice is arbitrary.
    pub fn default_project(&self) -> Option<&str> {
        self.projects.first().map(|p| p.name.as_str())
    }
}
