//! Global configuration (`~/.cmaid/config.toml`).
//!
//! ```toml
//! cmake_path = "/usr/local/bin/cmake"
//! make_program = "make"
//! help_source = "auto"
//! ```

use crate::cmake::HelpSource;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CmaidConfig {
    #[serde(default = "default_cmake_path")]
    pub cmake_path: String,
    #[serde(default = "default_make_program")]
    pub make_program: String,
    #[serde(default)]
    pub help_source: HelpSource,
}

impl Default for CmaidConfig {
    fn default() -> Self {
        Self {
            cmake_path: default_cmake_path(),
            make_program: default_make_program(),
            help_source: HelpSource::default(),
        }
    }
}

fn default_cmake_path() -> String {
    "cmake".to_string()
}

fn default_make_program() -> String {
    "make".to_string()
}

/// Root of per-user state: `$CMAID_HOME`, else `~/.cmaid`.
pub fn cmaid_home() -> PathBuf {
    if let Some(dir) = std::env::var_os("CMAID_HOME") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cmaid")
}

pub fn config_path() -> PathBuf {
    cmaid_home().join(CONFIG_FILE)
}

impl CmaidConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse {} - check for syntax errors",
                path.display()
            )
        })
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CmaidConfig::default();
        assert_eq!(config.cmake_path, "cmake");
        assert_eq!(config.make_program, "make");
        assert_eq!(config.help_source, HelpSource::Auto);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: CmaidConfig = toml::from_str(r#"cmake_path = "/opt/cmake""#).unwrap();
        assert_eq!(config.cmake_path, "/opt/cmake");
        assert_eq!(config.make_program, "make");
    }

    #[test]
    fn test_help_source_parse() {
        let config: CmaidConfig = toml::from_str(r#"help_source = "man""#).unwrap();
        assert_eq!(config.help_source, HelpSource::Man);
        assert!(toml::from_str::<CmaidConfig>(r#"help_source = "sqlite""#).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        assert_eq!(CmaidConfig::load_from(&path).unwrap(), CmaidConfig::default());

        let config = CmaidConfig {
            cmake_path: "/usr/bin/cmake".to_string(),
            make_program: "gmake".to_string(),
            help_source: HelpSource::Lists,
        };
        config.save_to(&path).unwrap();
        assert_eq!(CmaidConfig::load_from(&path).unwrap(), config);
    }
}
