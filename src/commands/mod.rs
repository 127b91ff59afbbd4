//! CLI command handlers.

pub mod config;
pub mod help;
pub mod parse;
pub mod project;

/// Flags shared by commands that run external programs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Print every executed command line
    pub verbose: bool,
    /// Print command lines instead of running them
    pub dry_run: bool,
}
