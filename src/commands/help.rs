//! Handles `cmaid info`, `versions`, `help`, `generators` and `copyright`.

use anyhow::{Context, Result, bail};
use colored::*;
use inquire::Select;

use crate::cache::{self, HelpCache, LoadOrigin};
use crate::cmake::{CMake, CMakeError, SystemRunner};
use crate::config::CmaidConfig;
use crate::help::{self, HelpTopic};
use crate::ui;

/// cmake from the configuration with its help data loaded.
pub fn load_cmake(config: &CmaidConfig, verbose: bool, reload: bool) -> Result<CMake> {
    let mut cmake = CMake::with_runner(&config.cmake_path, SystemRunner::new(verbose));
    let cache = HelpCache::default_location();

    let pb = ui::spinner(format!("Reading help from {}...", config.cmake_path));
    let result = cache::load_with_cache(&mut cmake, &cache, reload, config.help_source);
    pb.finish_and_clear();

    match result {
        Ok(origin) => {
            if verbose {
                let from = match origin {
                    LoadOrigin::Memory => "memory",
                    LoadOrigin::Cache => "cache",
                    LoadOrigin::Program => "cmake",
                };
                println!("   {} Help data loaded from {}", "ℹ".blue(), from);
            }
            Ok(cmake)
        }
        Err(CMakeError::NotFound(path)) => bail!(
            "cmake not found at '{}'. Set it with {}",
            path.display(),
            "cmaid config set-cmake <path>".bold()
        ),
        Err(e) => Err(e).context("Failed to load cmake help"),
    }
}

pub fn show_info(config: &CmaidConfig, verbose: bool) -> Result<()> {
    let cmake = CMake::with_runner(&config.cmake_path, SystemRunner::new(verbose));

    println!("{} cmaid v{}", "ℹ".blue(), env!("CARGO_PKG_VERSION"));
    println!("   Program:     {}", cmake.path().display());

    match cmake.probe_version() {
        Ok(Some(version)) => println!("   Version:     {}", version.green()),
        Ok(None) => println!("   Version:     {}", "unknown".yellow()),
        Err(CMakeError::NotFound(_)) => {
            println!("   Version:     {}", "not found".red());
        }
        Err(e) => println!("   Version:     {} ({})", "error".red(), e),
    }

    println!("   Help source: {}", config.help_source);
    println!("   Make:        {}", config.make_program);
    println!(
        "   Cache:       {}",
        HelpCache::default_location().path().display()
    );
    Ok(())
}

pub fn list_versions() -> Result<()> {
    println!("{} Known cmake versions:", "ℹ".blue());
    for version in CMake::<SystemRunner>::known_versions() {
        println!("   {}", version);
    }
    Ok(())
}

pub struct HelpQuery<'a> {
    pub topic: &'a str,
    pub name: Option<&'a str>,
    pub filter: Option<&'a str>,
    pub reload: bool,
}

pub fn show_help(config: &CmaidConfig, verbose: bool, query: &HelpQuery) -> Result<()> {
    let Some(topic) = HelpTopic::parse(query.topic) else {
        let valid: Vec<_> = HelpTopic::ALL.iter().map(|t| t.name()).collect();
        bail!(
            "Unknown help topic '{}' (expected one of: {})",
            query.topic,
            valid.join(", ")
        );
    };

    let cmake = load_cmake(config, verbose, query.reload)?;
    let data = cmake.data();

    if let Some(name) = query.name {
        let Some(desc) = help::describe(data, topic, name) else {
            bail!("No help for '{}' in {}", name, topic.name());
        };
        print_entry(name, desc);
        return Ok(());
    }

    let names = help::list(data, topic, query.filter);
    if names.is_empty() {
        println!("{} No {} matched.", "!".yellow(), topic.name());
        return Ok(());
    }

    if query.filter.is_none() && console::Term::stdout().is_term() {
        let choice = Select::new(&format!("Select from {}:", topic.name()), names)
            .with_page_size(15)
            .prompt()?;
        if let Some(desc) = help::describe(data, topic, choice) {
            print_entry(choice, desc);
        }
        return Ok(());
    }

    let mut table = ui::Table::new(&["Name", "Summary"]);
    for name in &names {
        let desc = help::describe(data, topic, name).unwrap_or("");
        table.add_row(vec![name.cyan().to_string(), help::summary(name, desc).to_string()]);
    }
    table.print();
    println!("   {} {}", names.len(), topic.name());
    Ok(())
}

fn print_entry(name: &str, desc: &str) {
    println!("{}", name.bold().cyan());
    println!();
    println!("{}", desc.trim_end());
}

pub fn show_generators(config: &CmaidConfig, verbose: bool, reload: bool) -> Result<()> {
    let cmake = load_cmake(config, verbose, reload)?;
    if cmake.generators().is_empty() {
        println!("{} cmake reported no generators.", "!".yellow());
        return Ok(());
    }
    for generator in cmake.generators() {
        println!("{}", generator);
    }
    Ok(())
}

pub fn show_copyright(config: &CmaidConfig, verbose: bool, reload: bool) -> Result<()> {
    let cmake = load_cmake(config, verbose, reload)?;
    if cmake.copyright().trim().is_empty() {
        println!("{} No copyright notice available.", "!".yellow());
    } else {
        println!("{}", cmake.copyright().trim_end());
    }
    Ok(())
}
