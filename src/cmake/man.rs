//! `cmake --help-man` section scanner.
//!
//! cmake 2.x prints its whole manual as troff source. The sections we care
//! about are introduced by `.SH <NAME>` and run until the next `.SH`:
//!
//! ```text
//! .SH GENERATORS
//! .TP
//! .B Unix Makefiles
//! Generates standard UNIX makefiles.
//! .SH COMMANDS
//! .TP
//! .B add_executable
//! Add an executable to the project using the specified source files.
//! ```
//!
//! Items are marked with `.B <name>`; formatting macros are dropped and the
//! remaining lines form the description text.

use super::types::{HelpData, HelpMap};

/// Formatting macros skipped inside text and description blocks.
///
/// `.SH` never shows up here because it terminates the block.
const MACROS: &[&str] = &[
    ".SS", ".P", ".IP", ".HP", ".RE", ".B", ".I", ".TP", ".br", ".nf", ".fi", "./\"",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Generators,
    Commands,
    Properties,
    Modules,
    Variables,
    Copyright,
}

impl Section {
    fn from_heading(line: &str) -> Option<Self> {
        let rest = line.strip_prefix(".SH ")?;
        if rest.starts_with("GENERATORS") {
            Some(Section::Generators)
        } else if rest.starts_with("COMMANDS") {
            Some(Section::Commands)
        } else if rest.starts_with("PROPERTIES") {
            Some(Section::Properties)
        } else if rest.starts_with("MODULES") {
            Some(Section::Modules)
        } else if rest.starts_with("VARIABLES") {
            Some(Section::Variables)
        } else if rest.starts_with("COPYRIGHT") {
            Some(Section::Copyright)
        } else {
            None
        }
    }
}

pub fn is_macro(line: &str) -> bool {
    line.starts_with('.') && MACROS.iter().any(|m| line.starts_with(m))
}

/// Scan the full man page and collect every known section.
///
/// Unknown sections are skipped. A section missing its terminating `.SH`
/// simply runs to the end of the input.
pub fn parse_man_page<S: AsRef<str>>(lines: &[S]) -> HelpData {
    let mut data = HelpData::default();
    let mut i = 0;

    while i < lines.len() {
        let Some(section) = Section::from_heading(lines[i].as_ref()) else {
            i += 1;
            continue;
        };

        let end = block_end(lines, i + 1);
        let block = &lines[i + 1..end];

        match section {
            Section::Generators => data.generators = parse_generators(block),
            Section::Commands => parse_desc(block, &mut data.commands),
            Section::Properties => parse_desc(block, &mut data.properties),
            Section::Modules => parse_desc(block, &mut data.modules),
            Section::Variables => parse_desc(block, &mut data.variables),
            Section::Copyright => data.copyright = parse_text(block),
        }

        // The `.SH` line that closed this block may open the next one
        i = end;
    }

    data
}

/// Index of the next `.SH` line at or after `start`, or `lines.len()`.
fn block_end<S: AsRef<str>>(lines: &[S], start: usize) -> usize {
    lines[start.min(lines.len())..]
        .iter()
        .position(|l| l.as_ref().starts_with(".SH"))
        .map_or(lines.len(), |p| start + p)
}

/// Generator names from a `GENERATORS` block, in order.
pub fn parse_generators<S: AsRef<str>>(block: &[S]) -> Vec<String> {
    block
        .iter()
        .filter_map(|l| item_name(l.as_ref()))
        .collect()
}

/// Plain text of a block with formatting macros removed.
pub fn parse_text<S: AsRef<str>>(block: &[S]) -> String {
    let mut text = String::new();
    for line in block {
        let line = line.as_ref();
        if is_macro(line) {
            continue;
        }
        text.push_str(line);
        text.push('\n');
    }
    unescape(&text)
}

/// Name/description pairs from a `.B`-itemized block.
///
/// Lines before the first `.B` item are ignored. An item whose description
/// stays empty is dropped, and the first occurrence of a name wins.
pub fn parse_desc<S: AsRef<str>>(block: &[S], data: &mut HelpMap) {
    let mut name: Option<String> = None;
    let mut desc = String::new();

    for line in block {
        let line = line.as_ref();

        if let Some(new_name) = item_name(line) {
            if let Some(prev) = name.take() {
                store(data, prev, &desc);
            }
            desc.clear();
            name = Some(new_name);
            continue;
        }

        if name.is_none() || is_macro(line) {
            continue;
        }

        desc.push_str(line);
        desc.push('\n');
    }

    if let Some(prev) = name {
        store(data, prev, &desc);
    }
}

fn store(data: &mut HelpMap, name: String, desc: &str) {
    if desc.is_empty() {
        return;
    }
    data.entry(name).or_insert_with(|| unescape(desc));
}

/// `.B <name>` -> `<name>`, trimmed and unquoted.
fn item_name(line: &str) -> Option<String> {
    let rest = line.strip_prefix(".B ")?.trim();
    let rest = rest
        .strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .unwrap_or(rest);
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

/// troff writes a literal dash as `\-`.
fn unescape(text: &str) -> String {
    text.replace("\\-", "-")
}
