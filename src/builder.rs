//! Configure / build / clean command lines.
//!
//! Commands are kept as program + arguments + working directory so they can
//! be run without a shell, and rendered in the familiar one-line form for
//! display and dry runs:
//!
//! - configure: `cmake -G "Unix Makefiles" -DCMAKE_BUILD_TYPE=Debug ..`
//! - build: `cd "build" && make all`

use crate::settings::{ProjectSettings, SettingsManager};
use anyhow::{Context, Result, bail};
use colored::*;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Marker touched to force cmake to re-run on the next build.
pub const DIRTY_FILE: &str = ".cmake_dirty";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    /// Directory to run in
    pub cwd: Option<PathBuf>,
    /// Render `cwd` as a leading `cd "<dir>" && `
    pub show_cwd: bool,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            show_cwd: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run in `dir` without changing how the command renders.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self.show_cwd = false;
        self
    }

    /// Run in `dir` and render it as `cd "<dir>" && ...`.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self.show_cwd = true;
        self
    }

    /// Run and wait. A non-zero exit status is an error.
    pub fn run(&self, verbose: bool) -> Result<()> {
        if verbose {
            println!("   {} {}", "$".dimmed(), self);
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        let status = cmd
            .status()
            .with_context(|| format!("Failed to run '{}'", self.program))?;

        if !status.success() {
            match status.code() {
                Some(code) => bail!("'{}' failed with exit code {}", self.program, code),
                None => bail!("'{}' was terminated by a signal", self.program),
            }
        }
        Ok(())
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.show_cwd
            && let Some(dir) = &self.cwd
        {
            write!(f, "cd \"{}\" && ", dir.display())?;
        }
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// `<cmake> <args> <source_dir>`, run inside `build_dir`.
pub fn configure_cmd(
    cmake: &str,
    source_dir: &str,
    build_dir: &str,
    args: &[String],
) -> CommandLine {
    CommandLine::new(cmake)
        .args(args.iter().cloned())
        .arg(source_dir)
        .current_dir(build_dir)
}

/// Configure arguments derived from project settings: generator, build type,
/// then the user's extra arguments.
pub fn configure_args(settings: &ProjectSettings) -> Vec<String> {
    let mut args = Vec::new();

    if !settings.generator.is_empty() {
        args.push("-G".to_string());
        args.push(settings.generator.clone());
    }

    if !settings.build_type.is_empty() {
        args.push(format!("-DCMAKE_BUILD_TYPE={}", settings.build_type));
    }

    args.extend(settings.arguments.iter().cloned());
    args
}

/// Configure command for a settings block.
///
/// cmake runs inside the build directory, so a relative source directory is
/// resolved against the current one first.
pub fn configure_cmd_from_settings(cmake: &str, settings: &ProjectSettings) -> CommandLine {
    let source = absolute(Path::new(&settings.source_directory));
    configure_cmd(
        cmake,
        &source.to_string_lossy(),
        &settings.build_directory,
        &configure_args(settings),
    )
}

/// `cd "<build_dir>" && <make> <target>`. `target` may be empty or hold
/// several space-separated words.
pub fn build_cmd(make: &str, build_dir: &str, target: &str) -> CommandLine {
    CommandLine::new(make)
        .args(target.split_whitespace())
        .in_dir(build_dir)
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Outcome of resolving a build or clean request for a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildPlan {
    /// cmake isn't enabled for this project/config; use the normal build
    NotHandled,
    /// The parent project builds this one as part of its tree
    HandledByParent { parent: String, command: CommandLine },
    Run(CommandLine),
}

/// Decide what `make` call builds (or cleans, with `target = "clean"`)
/// `project` in `config`.
///
/// When only this project is requested, the project name is appended as a
/// make target, and a parent project's build tree is used if one is set.
pub fn resolve_build(
    manager: &SettingsManager,
    make: &str,
    project: &str,
    config: &str,
    target: &str,
    project_only: bool,
) -> BuildPlan {
    let Some(mut settings) = manager.settings(project, config).filter(|s| s.enabled) else {
        return BuildPlan::NotHandled;
    };

    if let Some(parent) = settings.parent() {
        if !project_only {
            return BuildPlan::HandledByParent {
                parent: parent.to_string(),
                command: CommandLine::new("echo")
                    .arg(format!("Handled by parent project: {}", parent)),
            };
        }
        match manager.settings(parent, config) {
            Some(parent_settings) => settings = parent_settings,
            None => return BuildPlan::NotHandled,
        }
    }

    let mut target = target.to_string();
    if project_only {
        if !target.is_empty() {
            target.push(' ');
        }
        target.push_str(project);
    }

    BuildPlan::Run(build_cmd(make, &settings.build_directory, &target))
}

/// Settings to configure `project` with; the parent's when one is set.
///
/// Returns the project name that actually gets configured.
pub fn resolve_configure<'a>(
    manager: &'a SettingsManager,
    project: &'a str,
    config: &str,
) -> Option<(&'a str, &'a ProjectSettings)> {
    let settings = manager.settings(project, config).filter(|s| s.enabled)?;
    match settings.parent() {
        Some(parent) => manager
            .settings(parent, config)
            .map(|parent_settings| (parent, parent_settings)),
        None => Some((project, settings)),
    }
}

pub struct Builder {
    pub cmake: String,
    pub make: String,
    pub verbose: bool,
    pub dry_run: bool,
}

impl Builder {
    /// Create the build directory if needed and run cmake in it.
    pub fn configure(&self, settings: &ProjectSettings) -> Result<()> {
        let cmd = configure_cmd_from_settings(&self.cmake, settings);

        if self.dry_run {
            println!("{}", cmd);
            return Ok(());
        }

        let build_dir = Path::new(&settings.build_directory);
        if !build_dir.exists() {
            fs::create_dir_all(build_dir)
                .with_context(|| format!("Failed to create {}", build_dir.display()))?;
        }

        println!("{} Configuring in {}", "⚙".cyan(), build_dir.display());
        cmd.run(self.verbose)
    }

    /// Run a resolved build or clean command.
    pub fn build(&self, cmd: &CommandLine) -> Result<()> {
        if self.dry_run {
            println!("{}", cmd);
            return Ok(());
        }
        cmd.run(self.verbose)
    }
}

pub fn cmakelists_exists(dir: &Path) -> bool {
    dir.join(crate::parser::CMAKELISTS_FILE).is_file()
}

/// Source directory whose dirty marker forces a re-run of cmake for
/// `project`; the parent's when one is set. `None` when cmake isn't enabled.
pub fn dirty_dir(manager: &SettingsManager, project: &str, config: &str) -> Option<PathBuf> {
    resolve_configure(manager, project, config)
        .map(|(_, settings)| PathBuf::from(&settings.source_directory))
}

/// Touch `.cmake_dirty` in `dir`.
pub fn mark_dirty(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(DIRTY_FILE);
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to touch {}", path.display()))?;
    file.set_modified(std::time::SystemTime::now())
        .with_context(|| format!("Failed to update {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SettingsManager {
        let mut manager = SettingsManager::new();
        {
            let app = manager.settings_mut("app", "Debug");
            app.enabled = true;
            app.build_directory = "build/debug".to_string();
            app.generator = "Unix Makefiles".to_string();
            app.build_type = "Debug".to_string();
            app.arguments = vec!["-DWITH_TESTS=ON".to_string()];
        }
        {
            let lib = manager.settings_mut("lib", "Debug");
            lib.enabled = true;
            lib.parent_project = "app".to_string();
        }
        manager.settings_mut("tool", "Debug");
        manager
    }

    #[test]
    fn test_configure_cmd_rendering() {
        let cmd = configure_cmd("cmake", "..", "build", &["-DA=1".to_string()]);
        assert_eq!(cmd.to_string(), "cmake -DA=1 ..");
        assert_eq!(cmd.cwd, Some(PathBuf::from("build")));
    }

    #[test]
    fn test_configure_renders_without_cd() {
        let cmd = configure_cmd("cmake", "/src/app", "build dir", &[]);
        assert_eq!(cmd.to_string(), "cmake /src/app");
        assert!(!cmd.show_cwd);

        let cmd = configure_cmd("cmake", "..", "b", &["-G".to_string(), "Ninja".to_string()]);
        assert_eq!(cmd.to_string(), "cmake -G Ninja ..");
    }

    #[test]
    fn test_configure_args_order() {
        let manager = manager();
        let settings = manager.settings("app", "Debug").unwrap();
        assert_eq!(
            configure_args(settings),
            vec![
                "-G",
                "Unix Makefiles",
                "-DCMAKE_BUILD_TYPE=Debug",
                "-DWITH_TESTS=ON"
            ]
        );
        assert!(configure_args(&ProjectSettings::default()).is_empty());
    }

    #[test]
    fn test_configure_from_settings_quotes_generator() {
        let manager = manager();
        let cmd = configure_cmd_from_settings("cmake", manager.settings("app", "Debug").unwrap());
        let rendered = cmd.to_string();
        assert!(rendered.starts_with("cmake -G \"Unix Makefiles\" -DCMAKE_BUILD_TYPE=Debug"));
        assert_eq!(cmd.cwd, Some(PathBuf::from("build/debug")));
        assert!(Path::new(cmd.args.last().unwrap()).is_absolute());
    }

    #[test]
    fn test_build_cmd() {
        assert_eq!(
            build_cmd("make", "build", "").to_string(),
            "cd \"build\" && make"
        );
        let cmd = build_cmd("$(MAKE)", "out", "clean app");
        assert_eq!(cmd.args, vec!["clean", "app"]);
        assert_eq!(cmd.to_string(), "cd \"out\" && $(MAKE) clean app");
    }

    #[test]
    fn test_resolve_build_not_handled() {
        let manager = manager();
        assert_eq!(
            resolve_build(&manager, "make", "tool", "Debug", "", false),
            BuildPlan::NotHandled
        );
        assert_eq!(
            resolve_build(&manager, "make", "app", "Release", "", false),
            BuildPlan::NotHandled
        );
    }

    #[test]
    fn test_resolve_build_whole_tree() {
        let manager = manager();
        assert_eq!(
            resolve_build(&manager, "make", "app", "Debug", "clean", false),
            BuildPlan::Run(build_cmd("make", "build/debug", "clean"))
        );
    }

    #[test]
    fn test_resolve_build_project_only_appends_name() {
        let manager = manager();
        assert_eq!(
            resolve_build(&manager, "make", "app", "Debug", "", true),
            BuildPlan::Run(build_cmd("make", "build/debug", "app"))
        );
        assert_eq!(
            resolve_build(&manager, "make", "app", "Debug", "clean", true),
            BuildPlan::Run(build_cmd("make", "build/debug", "clean app"))
        );
    }

    #[test]
    fn test_resolve_build_child_project() {
        let manager = manager();
        match resolve_build(&manager, "make", "lib", "Debug", "", false) {
            BuildPlan::HandledByParent { parent, command } => {
                assert_eq!(parent, "app");
                assert_eq!(
                    command.to_string(),
                    "echo \"Handled by parent project: app\""
                );
            }
            other => panic!("unexpected plan: {other:?}"),
        }

        // building only the child goes through the parent's tree
        assert_eq!(
            resolve_build(&manager, "make", "lib", "Debug", "", true),
            BuildPlan::Run(build_cmd("make", "build/debug", "lib"))
        );
    }

    #[test]
    fn test_resolve_configure_uses_parent() {
        let manager = manager();
        let (name, settings) = resolve_configure(&manager, "lib", "Debug").unwrap();
        assert_eq!(name, "app");
        assert_eq!(settings.build_directory, "build/debug");
        assert!(resolve_configure(&manager, "tool", "Debug").is_none());
    }

    #[test]
    fn test_dirty_dir_follows_parent() {
        let mut manager = manager();
        manager.settings_mut("app", "Debug").source_directory = "app".to_string();
        assert_eq!(
            dirty_dir(&manager, "lib", "Debug"),
            Some(PathBuf::from("app"))
        );
        assert_eq!(dirty_dir(&manager, "tool", "Debug"), None);
    }

    #[test]
    fn test_dry_run_does_not_execute() {
        let builder = Builder {
            cmake: "cmake".to_string(),
            make: "definitely-not-a-make-program".to_string(),
            verbose: false,
            dry_run: true,
        };
        let cmd = build_cmd(&builder.make, "build", "all");
        assert!(builder.build(&cmd).is_ok());
    }

    #[test]
    fn test_mark_dirty_and_cmakelists() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!cmakelists_exists(dir.path()));
        fs::write(dir.path().join("CMakeLists.txt"), "project(x)\n").unwrap();
        assert!(cmakelists_exists(dir.path()));

        let marker = mark_dirty(dir.path()).unwrap();
        assert!(marker.exists());
        // touching twice is fine
        mark_dirty(dir.path()).unwrap();
    }

    #[test]
    fn test_failing_command_reports_exit_code() {
        let cmd = if cfg!(windows) {
            CommandLine::new("cmd").args(["/C", "exit 3"])
        } else {
            CommandLine::new("sh").args(["-c", "exit 3"])
        };
        let err = cmd.run(false).unwrap_err();
        assert!(err.to_string().contains("exit code 3"));
    }
}
