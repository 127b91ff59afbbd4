use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Name -> description map for one help topic.
pub type HelpMap = BTreeMap<String, String>;

/// Everything scraped from a cmake installation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpData {
    /// Version string as reported by `cmake --version` (e.g. "2.8.11")
    pub version: String,

    pub commands: HelpMap,
    pub modules: HelpMap,
    pub properties: HelpMap,
    pub variables: HelpMap,

    /// Copyright text, empty when the installation doesn't ship one
    pub copyright: String,

    /// Generator names in the order cmake lists them
    pub generators: Vec<String>,
}

impl HelpData {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
            && self.modules.is_empty()
            && self.properties.is_empty()
            && self.variables.is_empty()
            && self.generators.is_empty()
            && self.copyright.is_empty()
    }
}

/// Where help data is scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HelpSource {
    /// Pick by version: `Man` for cmake 2.x, `Lists` for 3.0 and newer
    #[default]
    Auto,
    /// One `--help-man` call, parsed section by section
    Man,
    /// `--help-<topic>-list` followed by one `--help-<topic> <name>` per item
    Lists,
}

impl HelpSource {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "auto" => Some(HelpSource::Auto),
            "man" => Some(HelpSource::Man),
            "lists" | "list" => Some(HelpSource::Lists),
            _ => None,
        }
    }

    /// The concrete scraper used for a cmake of `version`; never `Auto`.
    pub fn resolve(self, version: &str) -> Self {
        match self {
            HelpSource::Auto if super::version::has_man_sections(version) => HelpSource::Man,
            HelpSource::Auto => HelpSource::Lists,
            other => other,
        }
    }
}

impl std::fmt::Display for HelpSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HelpSource::Auto => "auto",
            HelpSource::Man => "man",
            HelpSource::Lists => "lists",
        };
        f.write_str(name)
    }
}

/// Error type for cmake operations
#[derive(Debug)]
pub enum CMakeError {
    /// The program couldn't be started or printed nothing for `-h`
    NotFound(PathBuf),
    /// The program ran but exited unsuccessfully
    Failed { program: String, code: Option<i32> },
    /// IO error
    Io(std::io::Error),
}

impl std::fmt::Display for CMakeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CMakeError::NotFound(path) => write!(
                f,
                "CMake program not found at '{}'. Check that the cmake path is set properly.",
                path.display()
            ),
            CMakeError::Failed {
                program,
                code: Some(code),
            } => write!(f, "'{}' exited with status {}", program, code),
            CMakeError::Failed {
                program,
                code: None,
            } => write!(f, "'{}' was terminated by a signal", program),
            CMakeError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for CMakeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CMakeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CMakeError {
    fn from(e: std::io::Error) -> Self {
        CMakeError::Io(e)
    }
}
