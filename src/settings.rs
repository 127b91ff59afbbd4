//! Per-project CMake settings.
//!
//! Every project can have one settings block per build configuration
//! (Debug, Release, ...). They live in `cmaid.json` at the workspace root:
//!
//! ```json
//! {
//!   "projects": {
//!     "app": [
//!       { "name": "Debug", "enabled": true, "buildDirectory": "build/debug", ... },
//!       { "name": "Release", "enabled": true, "buildDirectory": "build/release", ... }
//!     ]
//!   }
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const SETTINGS_FILE: &str = "cmaid.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    /// Whether this project is built through cmake at all
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_source_directory")]
    pub source_directory: String,
    #[serde(default = "default_build_directory")]
    pub build_directory: String,
    /// Passed as `-G "<generator>"`, cmake's default when empty
    #[serde(default)]
    pub generator: String,
    /// Passed as `-DCMAKE_BUILD_TYPE=<type>` when set
    #[serde(default)]
    pub build_type: String,
    /// Extra configure arguments, in order
    #[serde(default)]
    pub arguments: Vec<String>,
    /// Project whose cmake tree builds this one
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent_project: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            source_directory: default_source_directory(),
            build_directory: default_build_directory(),
            generator: String::new(),
            build_type: String::new(),
            arguments: Vec::new(),
            parent_project: String::new(),
        }
    }
}

fn default_source_directory() -> String {
    ".".to_string()
}

fn default_build_directory() -> String {
    "build".to_string()
}

impl ProjectSettings {
    pub fn parent(&self) -> Option<&str> {
        (!self.parent_project.is_empty()).then_some(self.parent_project.as_str())
    }
}

/// Configuration name -> settings.
pub type ConfigMap = BTreeMap<String, ProjectSettings>;

#[derive(Serialize, Deserialize)]
struct ConfigurationEntry {
    name: String,
    #[serde(flatten)]
    settings: ProjectSettings,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SettingsManager {
    projects: BTreeMap<String, ConfigMap>,
}

impl SettingsManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn projects(&self) -> impl Iterator<Item = (&str, &ConfigMap)> {
        self.projects.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn project_settings(&self, project: &str) -> Option<&ConfigMap> {
        self.projects.get(project)
    }

    /// All configurations of `project`, created empty if unknown.
    pub fn project_settings_mut(&mut self, project: &str) -> &mut ConfigMap {
        self.projects.entry(project.to_string()).or_default()
    }

    pub fn settings(&self, project: &str, config: &str) -> Option<&ProjectSettings> {
        self.projects.get(project)?.get(config)
    }

    /// Settings for `project`/`config`, created with defaults if unknown.
    pub fn settings_mut(&mut self, project: &str, config: &str) -> &mut ProjectSettings {
        self.project_settings_mut(project)
            .entry(config.to_string())
            .or_default()
    }

    /// Settings exist and cmake is enabled for them.
    pub fn is_enabled(&self, project: &str, config: &str) -> bool {
        self.settings(project, config).is_some_and(|s| s.enabled)
    }

    pub fn remove_project(&mut self, project: &str) -> bool {
        self.projects.remove(project).is_some()
    }

    /// Parse a settings document. Projects whose value isn't an array of
    /// configurations are skipped.
    pub fn from_json(content: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(content).context("Invalid settings JSON")?;
        let mut manager = Self::new();

        let Some(projects) = root.get("projects").and_then(Value::as_object) else {
            return Ok(manager);
        };

        for (name, value) in projects {
            if let Some(configs) = parse_project(value) {
                manager.projects.insert(name.clone(), configs);
            }
        }

        Ok(manager)
    }

    pub fn to_json(&self) -> Result<String> {
        let mut projects = serde_json::Map::new();
        for (name, configs) in &self.projects {
            projects.insert(name.clone(), project_to_value(configs)?);
        }
        let mut root = serde_json::Map::new();
        root.insert("projects".to_string(), Value::Object(projects));
        Ok(serde_json::to_string_pretty(&Value::Object(root))?)
    }

    /// Missing file means no settings.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Re-read one project from `path`, leaving the others untouched.
    pub fn load_project(&mut self, path: &Path, project: &str) -> Result<()> {
        let on_disk = Self::load(path)?;
        match on_disk.projects.get(project) {
            Some(configs) => {
                self.projects.insert(project.to_string(), configs.clone());
            }
            None => {
                self.project_settings_mut(project);
            }
        }
        Ok(())
    }

    /// Write one project to `path`, keeping what other projects have on disk.
    pub fn save_project(&self, path: &Path, project: &str) -> Result<()> {
        let Some(configs) = self.projects.get(project) else {
            return Ok(());
        };
        let mut on_disk = Self::load(path)?;
        on_disk
            .projects
            .insert(project.to_string(), configs.clone());
        on_disk.save(path)
    }
}

fn parse_project(value: &Value) -> Option<ConfigMap> {
    let items = value.as_array()?;
    let mut configs = ConfigMap::new();
    for item in items {
        if let Ok(entry) = serde_json::from_value::<ConfigurationEntry>(item.clone()) {
            configs.entry(entry.name).or_insert(entry.settings);
        }
    }
    Some(configs)
}

fn project_to_value(configs: &ConfigMap) -> Result<Value> {
    let items = configs
        .iter()
        .map(|(name, settings)| {
            serde_json::to_value(ConfigurationEntry {
                name: name.clone(),
                settings: settings.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Array(items))
}
