//! Handles `cmaid parse` and `cmaid scan`.

use anyhow::{Result, bail};
use colored::*;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::parser::{CMAKELISTS_FILE, CMakeParser};
use crate::ui;

pub fn parse_file(path: &Path, vars_only: bool) -> Result<()> {
    let mut parser = CMakeParser::new();
    parser.parse_file(path)?;

    if vars_only {
        for var in parser.variables() {
            println!("{}", var);
        }
        return Ok(());
    }

    let mut table = ui::Table::new(&["Line", "Command", "Arguments"]);
    for command in parser.commands() {
        table.add_row(vec![
            command.line.to_string(),
            command.name.cyan().to_string(),
            command.arguments.join(" "),
        ]);
    }
    table.print();
    println!(
        "   {} commands, {} variables",
        parser.commands().len(),
        parser.variables().len()
    );
    Ok(())
}

/// Every `CMakeLists.txt` under `root`, skipping hidden directories.
pub fn find_cmakelists(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == CMAKELISTS_FILE)
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

pub fn scan(root: &Path) -> Result<()> {
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }

    let files = find_cmakelists(root);
    if files.is_empty() {
        println!("{} No {} found under {}", "!".yellow(), CMAKELISTS_FILE, root.display());
        return Ok(());
    }

    let results: Vec<(PathBuf, Result<Vec<String>>)> = files
        .into_par_iter()
        .map(|path| {
            let mut parser = CMakeParser::new();
            let vars = parser
                .parse_file(&path)
                .map(|_| parser.variables().iter().cloned().collect::<Vec<String>>());
            (path, vars)
        })
        .collect();

    let mut failed = 0;
    for (path, vars) in &results {
        let shown = path.strip_prefix(root).unwrap_or(path);
        match vars {
            Ok(vars) => {
                println!("{} {}", "✓".green(), shown.display());
                for var in vars {
                    println!("   {}", var);
                }
            }
            Err(e) => {
                failed += 1;
                println!("{} {}: {:#}", "x".red(), shown.display(), e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} files failed to parse", failed, results.len());
    }
    Ok(())
}
