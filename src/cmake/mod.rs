//! The cmake program and the help data scraped from it.
//!
//! [`CMake`] wraps a path to a cmake binary. Data is loaded lazily with
//! [`CMake::load_data`] and stays until the path changes or a reload is
//! forced. Two scrapers exist: [`man`] for cmake 2.x (`--help-man` troff
//! sections) and [`lists`] for 3.x (`--help-<topic>-list` plus one query
//! per item).

pub mod lists;
pub mod man;
pub mod runner;
pub mod types;
pub mod version;

pub use runner::{CommandRunner, SystemRunner};
pub use types::{CMakeError, HelpData, HelpMap, HelpSource};
pub use version::KNOWN_VERSIONS;

use std::path::{Path, PathBuf};

pub struct CMake<R: CommandRunner = SystemRunner> {
    path: PathBuf,
    dirty: bool,
    data: HelpData,
    runner: R,
}

impl CMake<SystemRunner> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_runner(path, SystemRunner::default())
    }
}

impl<R: CommandRunner> CMake<R> {
    pub fn with_runner(path: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            path: path.into(),
            dirty: true,
            data: HelpData::default(),
            runner,
        }
    }

    /// Path to the cmake program, `cmake` when resolved through PATH.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Change the program; loaded data becomes stale.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
        self.dirty = true;
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Whether the program can be run at all.
    ///
    /// The help query exit code isn't reliable across versions, so the only
    /// test is that `-h` prints something.
    pub fn is_ok(&self) -> bool {
        self.runner
            .run(&self.path, &["-h"])
            .map(|out| !out.is_empty())
            .unwrap_or(false)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn known_versions() -> &'static [&'static str] {
        KNOWN_VERSIONS
    }

    /// Query `--version` without touching loaded data.
    pub fn probe_version(&self) -> Result<Option<String>, CMakeError> {
        let output = self.runner.run(&self.path, &["--version"])?;
        Ok(output.first().and_then(|line| version::parse_version(line)))
    }

    /// Load help data from the program.
    ///
    /// Does nothing while the data is fresh unless `force` is set. On
    /// failure all previously loaded data is gone and the state stays dirty.
    pub fn load_data(&mut self, force: bool, source: HelpSource) -> Result<(), CMakeError> {
        if !self.dirty && !force {
            return Ok(());
        }

        self.data = HelpData::default();
        self.dirty = true;

        if !self.is_ok() {
            return Err(CMakeError::NotFound(self.path.clone()));
        }

        let mut data = HelpData {
            version: self.probe_version()?.unwrap_or_default(),
            ..HelpData::default()
        };

        match source.resolve(&data.version) {
            HelpSource::Man => {
                let page = self.runner.run(&self.path, &["--help-man"])?;
                let parsed = man::parse_man_page(&page);
                data = HelpData {
                    version: data.version,
                    ..parsed
                };
            }
            _ => lists::load(&self.runner, &self.path, &mut data)?,
        }

        self.data = data;
        self.dirty = false;
        Ok(())
    }

    /// Install previously scraped data, e.g. from the help cache.
    pub fn replace_data(&mut self, data: HelpData) {
        self.data = data;
        self.dirty = false;
    }

    pub fn data(&self) -> &HelpData {
        &self.data
    }

    pub fn version(&self) -> &str {
        &self.data.version
    }

    pub fn commands(&self) -> &HelpMap {
        &self.data.commands
    }

    pub fn modules(&self) -> &HelpMap {
        &self.data.modules
    }

    pub fn properties(&self) -> &HelpMap {
        &self.data.properties
    }

    pub fn variables(&self) -> &HelpMap {
        &self.data.variables
    }

    pub fn copyright(&self) -> &str {
        &self.data.copyright
    }

    pub fn generators(&self) -> &[String] {
        &self.data.generators
    }
}

#[cfg(test)]
mod tests {
    use super::runner::fake::FakeRunner;
    use super::*;

    const MAN: &str = ".SH GENERATORS
.TP
.B Unix Makefiles
Generates standard UNIX makefiles.
.SH COMMANDS
.TP
.B project
Set a name for the entire project.
.SH COPYRIGHT
Copyright 2000\\-2009 Kitware, Inc.
";

    fn old_cmake() -> FakeRunner {
        FakeRunner::new()
            .respond("-h", "cmake version 2.8.11\nUsage")
            .respond("--version", "cmake version 2.8.11")
            .respond("--help-man", MAN)
    }

    #[test]
    fn test_starts_dirty_and_empty() {
        let cmake = CMake::with_runner("cmake", FakeRunner::new());
        assert!(cmake.is_dirty());
        assert!(cmake.data().is_empty());
        assert_eq!(cmake.path(), Path::new("cmake"));
    }

    #[test]
    fn test_is_ok_requires_output() {
        assert!(!CMake::with_runner("cmake", FakeRunner::new()).is_ok());
        assert!(CMake::with_runner("cmake", old_cmake()).is_ok());
    }

    #[test]
    fn test_load_from_man_page() {
        let mut cmake = CMake::with_runner("cmake", old_cmake());
        cmake.load_data(false, HelpSource::Auto).unwrap();

        assert!(!cmake.is_dirty());
        assert_eq!(cmake.version(), "2.8.11");
        assert_eq!(cmake.generators(), ["Unix Makefiles".to_string()]);
        assert!(cmake.commands().contains_key("project"));
        assert_eq!(cmake.copyright(), "Copyright 2000-2009 Kitware, Inc.\n");
    }

    #[test]
    fn test_fresh_data_is_not_reloaded() {
        let mut cmake = CMake::with_runner("cmake", old_cmake());
        cmake.load_data(false, HelpSource::Man).unwrap();
        let calls = cmake.runner().call_count();

        cmake.load_data(false, HelpSource::Man).unwrap();
        assert_eq!(cmake.runner().call_count(), calls);

        cmake.load_data(true, HelpSource::Man).unwrap();
        assert!(cmake.runner().call_count() > calls);
    }

    #[test]
    fn test_set_path_marks_dirty() {
        let mut cmake = CMake::with_runner("cmake", old_cmake());
        cmake.load_data(false, HelpSource::Man).unwrap();
        cmake.set_path("/opt/cmake/bin/cmake");
        assert!(cmake.is_dirty());
    }

    #[test]
    fn test_missing_program_clears_data() {
        let mut cmake = CMake::with_runner("cmake", FakeRunner::new());
        cmake.replace_data(HelpData {
            version: "2.8.0".to_string(),
            ..HelpData::default()
        });

        let err = cmake.load_data(true, HelpSource::Auto).unwrap_err();
        assert!(matches!(err, CMakeError::NotFound(_)));
        assert!(cmake.data().is_empty());
        assert!(cmake.version().is_empty());
        assert!(cmake.is_dirty());
    }

    #[test]
    fn test_modern_version_uses_lists() {
        let runner = FakeRunner::new()
            .respond("-h", "Usage")
            .respond("--version", "cmake version 3.27.7\n\nCMake suite maintained")
            .respond("--help-command-list", "project")
            .respond("--help-command project", "project\n-------\nSet the name.");

        let mut cmake = CMake::with_runner("cmake", runner);
        cmake.load_data(false, HelpSource::Auto).unwrap();

        assert_eq!(cmake.version(), "3.27.7");
        assert!(cmake.commands()["project"].contains("Set the name."));
        assert!(cmake.copyright().is_empty());
        let calls = cmake.runner().calls.lock().unwrap().clone();
        assert!(!calls.contains(&"--help-man".to_string()));
    }

    #[test]
    fn test_known_versions() {
        assert!(CMake::<SystemRunner>::known_versions().contains(&"2.6.4"));
    }
}
