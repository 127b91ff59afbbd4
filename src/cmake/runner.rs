//! Child process execution for cmake queries.
//!
//! Help scraping only ever needs the stdout of a short-lived process, split
//! into lines. The [`CommandRunner`] trait is the seam that lets the facade
//! run against canned output in tests.

use super::types::CMakeError;
use colored::*;
use std::path::Path;
use std::process::Command;

pub trait CommandRunner: Sync {
    /// Run `program args...` and return its stdout split into lines.
    fn run(&self, program: &Path, args: &[&str]) -> Result<Vec<String>, CMakeError>;
}

/// Runs real processes.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    pub verbose: bool,
}

impl SystemRunner {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[&str]) -> Result<Vec<String>, CMakeError> {
        if self.verbose {
            println!(
                "   {} {} {}",
                "$".dimmed(),
                program.display(),
                args.join(" ")
            );
        }

        let output = Command::new(program).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CMakeError::NotFound(program.to_path_buf())
            } else {
                CMakeError::Io(e)
            }
        })?;

        // A failing query that still printed something is kept; the output
        // is all callers look at.
        if !output.status.success() && output.stdout.is_empty() {
            return Err(CMakeError::Failed {
                program: program.display().to_string(),
                code: output.status.code(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().map(|l| l.to_string()).collect())
    }
}
