//! Handles `cmaid config show|set-cmake|set-make|set-source`.

use anyhow::{Result, bail};
use colored::*;

use crate::cmake::{CMake, HelpSource};
use crate::config::{self, CmaidConfig};

pub fn show(config: &CmaidConfig) -> Result<()> {
    println!("{} {}", "ℹ".blue(), config::config_path().display());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

pub fn set_cmake(mut config: CmaidConfig, path: &str) -> Result<()> {
    if !CMake::new(path).is_ok() {
        eprintln!("{} '{}' doesn't look like a working cmake", "!".yellow(), path);
    }
    config.cmake_path = path.to_string();
    config.save()?;
    println!("{} cmake set to {}", "✓".green(), path);
    Ok(())
}

pub fn set_make(mut config: CmaidConfig, program: &str) -> Result<()> {
    config.make_program = program.to_string();
    config.save()?;
    println!("{} make program set to {}", "✓".green(), program);
    Ok(())
}

pub fn set_source(mut config: CmaidConfig, source: &str) -> Result<()> {
    let Some(source) = HelpSource::parse(source) else {
        bail!("Unknown help source '{}' (expected auto, man or lists)", source);
    };
    config.help_source = source;
    config.save()?;
    println!("{} help source set to {}", "✓".green(), source);
    Ok(())
}
