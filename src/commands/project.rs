//! Handles `cmaid project ...`, `configure`, `build`, `clean` and `dirty`.
//!
//! Project settings are read from `cmaid.json` in the current directory.

use anyhow::{Result, bail};
use colored::*;
use std::path::{Path, PathBuf};

use super::RunOptions;
use crate::builder::{self, BuildPlan, Builder};
use crate::config::CmaidConfig;
use crate::settings::{SETTINGS_FILE, SettingsManager};
use crate::ui;

fn settings_path() -> PathBuf {
    PathBuf::from(SETTINGS_FILE)
}

fn load_settings() -> Result<SettingsManager> {
    SettingsManager::load(&settings_path())
}

pub fn list() -> Result<()> {
    let manager = load_settings()?;

    let mut table = ui::Table::new(&["Project", "Config", "Enabled", "Build dir", "Parent"]);
    for (project, configs) in manager.projects() {
        for (config, settings) in configs {
            let enabled = if settings.enabled {
                "yes".green().to_string()
            } else {
                "no".dimmed().to_string()
            };
            table.add_row(vec![
                project.to_string(),
                config.clone(),
                enabled,
                settings.build_directory.clone(),
                settings.parent_project.clone(),
            ]);
        }
    }

    if table.is_empty() {
        println!("{} No project settings in {}", "!".yellow(), SETTINGS_FILE);
        return Ok(());
    }
    table.print();
    Ok(())
}

pub fn show(project: &str, config: &str) -> Result<()> {
    let manager = load_settings()?;
    let Some(settings) = manager.settings(project, config) else {
        bail!("No settings for project '{}' ({})", project, config);
    };

    println!("{} {} ({})", "ℹ".blue(), project.bold(), config);
    println!("   Enabled:    {}", settings.enabled);
    println!("   Source dir: {}", settings.source_directory);
    println!("   Build dir:  {}", settings.build_directory);
    println!("   Generator:  {}", settings.generator);
    println!("   Build type: {}", settings.build_type);
    println!("   Arguments:  {}", settings.arguments.join(" "));
    if let Some(parent) = settings.parent() {
        println!("   Parent:     {}", parent);
    }
    Ok(())
}

/// Fields changed by `cmaid project set`; `None` leaves a field alone.
#[derive(Debug, Default)]
pub struct SettingsUpdate {
    pub source_directory: Option<String>,
    pub build_directory: Option<String>,
    pub generator: Option<String>,
    pub build_type: Option<String>,
    pub arguments: Option<Vec<String>>,
    pub parent_project: Option<String>,
}

pub fn apply_update(
    manager: &mut SettingsManager,
    project: &str,
    config: &str,
    update: SettingsUpdate,
) {
    let settings = manager.settings_mut(project, config);
    if let Some(v) = update.source_directory {
        settings.source_directory = v;
    }
    if let Some(v) = update.build_directory {
        settings.build_directory = v;
    }
    if let Some(v) = update.generator {
        settings.generator = v;
    }
    if let Some(v) = update.build_type {
        settings.build_type = v;
    }
    if let Some(v) = update.arguments {
        settings.arguments = v;
    }
    if let Some(v) = update.parent_project {
        settings.parent_project = v;
    }
}

pub fn set(project: &str, config: &str, update: SettingsUpdate) -> Result<()> {
    if update.parent_project.as_deref() == Some(project) {
        bail!("A project can't be its own parent");
    }

    let path = settings_path();
    let mut manager = SettingsManager::new();
    manager.load_project(&path, project)?;
    apply_update(&mut manager, project, config, update);
    manager.save_project(&path, project)?;

    println!("{} Updated {} ({})", "✓".green(), project, config);
    Ok(())
}

pub fn set_enabled(project: &str, config: &str, enabled: bool) -> Result<()> {
    let path = settings_path();
    let mut manager = SettingsManager::new();
    manager.load_project(&path, project)?;
    manager.settings_mut(project, config).enabled = enabled;
    manager.save_project(&path, project)?;

    let state = if enabled { "enabled" } else { "disabled" };
    println!("{} cmake {} for {} ({})", "✓".green(), state, project, config);
    Ok(())
}

fn make_builder(config: &CmaidConfig, opts: RunOptions) -> Builder {
    Builder {
        cmake: config.cmake_path.clone(),
        make: config.make_program.clone(),
        verbose: opts.verbose,
        dry_run: opts.dry_run,
    }
}

pub fn configure(
    config: &CmaidConfig,
    project: &str,
    build_config: &str,
    opts: RunOptions,
) -> Result<()> {
    let manager = load_settings()?;
    let Some((owner, settings)) = builder::resolve_configure(&manager, project, build_config) else {
        bail!("cmake is not enabled for '{}' ({})", project, build_config);
    };

    if owner != project {
        println!("{} Configuring parent project {}", "ℹ".blue(), owner.bold());
    }

    if !builder::cmakelists_exists(Path::new(&settings.source_directory)) {
        eprintln!(
            "{} No CMakeLists.txt in {}",
            "!".yellow(),
            settings.source_directory
        );
    }

    make_builder(config, opts).configure(settings)?;
    if !opts.dry_run {
        println!("{} Configured {}", "✓".green(), owner);
    }
    Ok(())
}

/// Build (or clean, with `target = "clean"`) a project.
pub fn build(
    config: &CmaidConfig,
    project: &str,
    build_config: &str,
    target: &str,
    project_only: bool,
    opts: RunOptions,
) -> Result<()> {
    let manager = load_settings()?;
    let plan = builder::resolve_build(
        &manager,
        &config.make_program,
        project,
        build_config,
        target,
        project_only,
    );

    match plan {
        BuildPlan::NotHandled => {
            bail!("cmake is not enabled for '{}' ({})", project, build_config)
        }
        BuildPlan::HandledByParent { parent, command } => {
            if opts.dry_run {
                println!("{}", command);
            } else {
                println!("{} Handled by parent project: {}", "ℹ".blue(), parent);
            }
            Ok(())
        }
        BuildPlan::Run(command) => {
            make_builder(config, opts).build(&command)?;
            if !opts.dry_run {
                println!("{} Finished {}", "✓".green(), project);
            }
            Ok(())
        }
    }
}

pub fn dirty(project: &str, build_config: &str) -> Result<()> {
    let manager = load_settings()?;
    let Some(dir) = builder::dirty_dir(&manager, project, build_config) else {
        bail!("cmake is not enabled for '{}' ({})", project, build_config);
    };
    let marker = builder::mark_dirty(&dir)?;
    println!("{} Touched {}", "✓".green(), marker.display());
    Ok(())
}
