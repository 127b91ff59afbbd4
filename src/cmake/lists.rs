//! Help scraping through the `--help-<topic>-list` family of options.
//!
//! cmake 3.x dropped the troff sections from `--help-man`, so each topic is
//! queried on its own: first the list of names, then one help call per
//! name. The per-name calls are independent and run on the rayon pool.

use super::runner::CommandRunner;
use super::types::{CMakeError, HelpData, HelpMap};
use rayon::prelude::*;
use std::path::Path;

/// The four itemized help topics, keyed by their cmake option stem.
pub const TOPICS: &[&str] = &["command", "module", "property", "variable"];

/// Names from list output, in order.
///
/// Old releases print a `cmake version x.y.z` banner first; it and blank
/// lines are dropped.
pub fn parse_list<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .map(|l| l.as_ref().trim())
        .filter(|l| !l.is_empty() && !l.starts_with("cmake version"))
        .map(|l| l.to_string())
        .collect()
}

/// Generator names from the `Generators` section of `cmake --help`.
///
/// Entries look like `  Unix Makefiles   = Generates standard UNIX makefiles.`,
/// the default one is starred, and long names push the `=` onto the next
/// line. Lines without a name column are continuations and are skipped.
pub fn parse_help_generators<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut generators = Vec::new();
    let mut in_section = false;
    let mut pending: Option<String> = None;

    for line in lines {
        let line = line.as_ref();

        if !in_section {
            in_section = line.trim_end() == "Generators";
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("The following generators") {
            continue;
        }

        // Column-aligned continuation: text starts far right of the name column
        let indent = line.len() - line.trim_start().len();

        if let Some((name, _)) = trimmed.split_once('=') {
            if indent > 4 {
                // "= description" for a name given on the previous line
                if let Some(name) = pending.take() {
                    generators.push(name);
                }
                continue;
            }
            pending = None;
            let name = name.trim().trim_start_matches('*').trim();
            if !name.is_empty() {
                generators.push(name.to_string());
            }
        } else if indent <= 4 {
            pending = Some(trimmed.trim_start_matches('*').trim().to_string());
        }
    }

    generators
}

/// Fill commands, modules, properties, variables and generators from list
/// queries. Version and copyright are left untouched.
pub fn load<R: CommandRunner>(
    runner: &R,
    program: &Path,
    data: &mut HelpData,
) -> Result<(), CMakeError> {
    for topic in TOPICS {
        let map = load_topic(runner, program, topic)?;
        match *topic {
            "command" => data.commands = map,
            "module" => data.modules = map,
            "property" => data.properties = map,
            _ => data.variables = map,
        }
    }

    let help = runner.run(program, &["--help"])?;
    data.generators = parse_help_generators(&help);

    Ok(())
}

fn load_topic<R: CommandRunner>(
    runner: &R,
    program: &Path,
    topic: &str,
) -> Result<HelpMap, CMakeError> {
    let list_flag = format!("--help-{}-list", topic);
    let item_flag = format!("--help-{}", topic);

    let names = parse_list(&runner.run(program, &[list_flag.as_str()])?);

    names
        .into_par_iter()
        .map(|name| -> Result<(String, String), CMakeError> {
            // one broken entry only loses that entry
            let lines = match runner.run(program, &[item_flag.as_str(), name.as_str()]) {
                Err(CMakeError::Failed { .. }) => Vec::new(),
                other => other?,
            };
            Ok((name, lines.join("\n")))
        })
        .collect::<Result<Vec<_>, CMakeError>>()
        .map(|pairs| {
            pairs
                .into_iter()
                .filter(|(_, desc)| !desc.trim().is_empty())
                .collect()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmake::runner::fake::FakeRunner;

    const HELP: &str = "Usage

  cmake [options] <path-to-source>

Options
  -S <path-to-source>          = Explicitly specify a source directory.

Generators

The following generators are available on this platform (* marks default):
* Unix Makefiles               = Generates standard UNIX makefiles.
  Ninja                        = Generates build.ninja files.
  CodeBlocks - Unix Makefiles  = Generates CodeBlocks project files.
  Sublime Text 2 - Unix Makefiles
                               = Generates Sublime Text 2 project files.
  Kate - Ninja                 = Generates Kate project files
                                 (deprecated).
";

    #[test]
    fn test_parse_list_drops_banner() {
        let names = parse_list(&["cmake version 2.8.12", "add_executable", "", "  set  "]);
        assert_eq!(names, vec!["add_executable", "set"]);
    }

    #[test]
    fn test_parse_help_generators() {
        let lines: Vec<&str> = HELP.lines().collect();
        assert_eq!(
            parse_help_generators(&lines),
            vec![
                "Unix Makefiles",
                "Ninja",
                "CodeBlocks - Unix Makefiles",
                "Sublime Text 2 - Unix Makefiles",
                "Kate - Ninja",
            ]
        );
    }

    #[test]
    fn test_load_queries_every_item() {
        let runner = FakeRunner::new()
            .respond("--help-command-list", "add_executable\nproject")
            .respond("--help-command add_executable", "add_executable\n--------\nAdd it.")
            .respond("--help-command project", "project\n-------\nSet name.")
            .respond("--help-module-list", "FindZLIB")
            .respond("--help-module FindZLIB", "Find zlib.")
            .respond("--help-property-list", "")
            .respond("--help-variable-list", "CMAKE_AR")
            .respond("--help-variable CMAKE_AR", "   ")
            .respond("--help", HELP);

        let mut data = HelpData::default();
        load(&runner, Path::new("cmake"), &mut data).unwrap();

        assert_eq!(data.commands.len(), 2);
        assert!(data.commands["project"].ends_with("Set name."));
        assert_eq!(data.modules["FindZLIB"], "Find zlib.");
        assert!(data.properties.is_empty());
        // blank help output is not worth an entry
        assert!(data.variables.is_empty());
        assert_eq!(data.generators.len(), 5);
    }

    #[test]
    fn test_failed_item_query_drops_only_that_item() {
        let runner = FakeRunner::new()
            .respond("--help-command-list", "add_executable\nproject")
            .respond("--help-command add_executable", "Add it.")
            .fail("--help-command project", Some(1));

        let map = load_topic(&runner, Path::new("cmake"), "command").unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["add_executable"], "Add it.");
    }

    #[test]
    fn test_failed_list_query_is_an_error() {
        let runner = FakeRunner::new().fail("--help-command-list", Some(2));
        let result = load_topic(&runner, Path::new("cmake"), "command");
        assert!(matches!(result, Err(CMakeError::Failed { code: Some(2), .. })));
    }
}
