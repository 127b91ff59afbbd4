//! # cmaid - cmake help browser and build driver
//!
//! cmaid scrapes the help built into a `cmake` program, caches it per
//! cmake version, parses `CMakeLists.txt` files and runs configure / build /
//! clean command lines for projects described in `cmaid.json`.
//!
//! ## Quick Start
//!
//! ```bash
//! # Browse help
//! cmaid help commands --filter add_
//! cmaid help commands add_executable
//!
//! # Configure and build a project
//! cmaid project set app --build-dir build/debug --build-type Debug
//! cmaid project enable app
//! cmaid configure app && cmaid build app
//! ```
//!
//! ## Module Organization
//!
//! - [`cmake`] - Running cmake and scraping its help output
//! - [`cache`] - On-disk help cache keyed by cmake path and version
//! - [`help`] - Topic listing and wildcard filtering
//! - [`parser`] - `CMakeLists.txt` tokenizer and command parser
//! - [`builder`] - Configure / build command lines
//! - [`settings`] - Per-project settings
//! - [`commands`] - CLI command handlers

/// Configure, build and clean command lines.
pub mod builder;

/// Cached help data.
pub mod cache;

/// The cmake program and its help output.
pub mod cmake;

/// CLI command handlers.
pub mod commands;

/// Global configuration (`~/.cmaid/config.toml`).
pub mod config;

/// Browsing help topics.
pub mod help;

/// `CMakeLists.txt` parsing.
pub mod parser;

/// Per-project cmake settings.
pub mod settings;

/// Terminal output helpers.
pub mod ui;
