//! On-disk help cache.
//!
//! Scraping cmake 3.x help takes a few hundred subprocess calls, so parsed
//! data is kept in `~/.cmaid/cache/help.json` and reused as long as the
//! cmake path, version and help source match.
//!
//! ## Commands
//!
//! - `cmaid cache path` - Print cache file location
//! - `cmaid cache clean` - Remove the cached help data

use crate::cmake::{CMake, CMakeError, CommandRunner, HelpData, HelpSource};
use crate::config;
use anyhow::{Context, Result};
use colored::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CACHE_FILE: &str = "help.json";

#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord {
    cmake_path: String,
    version: String,
    /// Resolved scraper that produced `data`
    source: HelpSource,
    data: HelpData,
}

pub struct HelpCache {
    file: PathBuf,
}

impl HelpCache {
    /// Cache living in `dir`; nothing is created until the first store.
    pub fn open(dir: impl AsRef<Path>) -> Self {
        Self {
            file: dir.as_ref().join(CACHE_FILE),
        }
    }

    /// `~/.cmaid/cache`
    pub fn default_location() -> Self {
        Self::open(config::cmaid_home().join("cache"))
    }

    pub fn path(&self) -> &Path {
        &self.file
    }

    /// Cached data for this exact program, version and help source, if any.
    ///
    /// `Auto` matches whatever it resolves to for `version`.
    pub fn load(&self, cmake_path: &Path, version: &str, source: HelpSource) -> Option<HelpData> {
        let content = fs::read_to_string(&self.file).ok()?;
        let record: CacheRecord = serde_json::from_str(&content).ok()?;

        if record.cmake_path != cmake_path.to_string_lossy()
            || record.version != version
            || record.source != source.resolve(version)
        {
            return None;
        }
        Some(record.data)
    }

    /// Replace whatever is stored with `data`.
    pub fn store(&self, cmake_path: &Path, source: HelpSource, data: &HelpData) -> Result<()> {
        if let Some(parent) = self.file.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let record = CacheRecord {
            cmake_path: cmake_path.to_string_lossy().to_string(),
            version: data.version.clone(),
            source: source.resolve(&data.version),
            data: data.clone(),
        };
        let json = serde_json::to_string(&record)?;
        fs::write(&self.file, json)
            .with_context(|| format!("Failed to write {}", self.file.display()))?;
        Ok(())
    }

    /// Returns whether there was anything to remove.
    pub fn clear(&self) -> Result<bool> {
        if !self.file.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.file)
            .with_context(|| format!("Failed to remove {}", self.file.display()))?;
        Ok(true)
    }
}

/// Where help data came from on a [`load_with_cache`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Already loaded and fresh
    Memory,
    Cache,
    Program,
}

/// Fill `cmake` from the cache when possible, otherwise scrape and store.
///
/// A failed store is reported but doesn't fail the load.
pub fn load_with_cache<R: CommandRunner>(
    cmake: &mut CMake<R>,
    cache: &HelpCache,
    force: bool,
    source: HelpSource,
) -> Result<LoadOrigin, CMakeError> {
    if !cmake.is_dirty() && !force {
        return Ok(LoadOrigin::Memory);
    }

    if !force
        && let Some(version) = cmake.probe_version()?
        && let Some(data) = cache.load(cmake.path(), &version, source)
    {
        cmake.replace_data(data);
        return Ok(LoadOrigin::Cache);
    }

    cmake.load_data(true, source)?;

    if let Err(e) = cache.store(cmake.path(), source, cmake.data()) {
        eprintln!("   {} Could not update help cache: {}", "!".yellow(), e);
    }

    Ok(LoadOrigin::Program)
}

pub fn print_path() -> Result<()> {
    println!("{}", HelpCache::default_location().path().display());
    Ok(())
}

pub fn clean() -> Result<()> {
    let cache = HelpCache::default_location();
    if cache.clear()? {
        println!("{} Help cache cleaned.", "✓".green());
    } else {
        println!("{} Help cache already empty.", "✓".green());
    }
    Ok(())
}
