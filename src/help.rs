//! Browsing loaded help data by topic.

use crate::cmake::{HelpData, HelpMap};
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Modules,
    Commands,
    Variables,
    Properties,
}

impl HelpTopic {
    pub const ALL: [HelpTopic; 4] = [
        HelpTopic::Modules,
        HelpTopic::Commands,
        HelpTopic::Variables,
        HelpTopic::Properties,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "module" | "modules" => Some(HelpTopic::Modules),
            "command" | "commands" => Some(HelpTopic::Commands),
            "variable" | "variables" | "var" | "vars" => Some(HelpTopic::Variables),
            "property" | "properties" | "prop" | "props" => Some(HelpTopic::Properties),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HelpTopic::Modules => "modules",
            HelpTopic::Commands => "commands",
            HelpTopic::Variables => "variables",
            HelpTopic::Properties => "properties",
        }
    }
}

pub fn entries(data: &HelpData, topic: HelpTopic) -> &HelpMap {
    match topic {
        HelpTopic::Modules => &data.modules,
        HelpTopic::Commands => &data.commands,
        HelpTopic::Variables => &data.variables,
        HelpTopic::Properties => &data.properties,
    }
}

/// Names in a topic, sorted. With a filter only names matching `*filter*`
/// are kept; `*` and `?` inside the filter act as wildcards.
pub fn list<'a>(data: &'a HelpData, topic: HelpTopic, filter: Option<&str>) -> Vec<&'a str> {
    let names = entries(data, topic).keys().map(|k| k.as_str());

    match filter.filter(|f| !f.is_empty()) {
        None => names.collect(),
        Some(filter) => match wildcard_regex(filter) {
            Some(pattern) => names.filter(|name| pattern.is_match(name)).collect(),
            None => Vec::new(),
        },
    }
}

pub fn describe<'a>(data: &'a HelpData, topic: HelpTopic, name: &str) -> Option<&'a str> {
    entries(data, topic).get(name).map(|s| s.as_str())
}

/// First meaningful line of a description, for one-line listings.
///
/// cmake 3.x help starts with the item name underlined in reStructuredText,
/// both are skipped.
pub fn summary<'a>(name: &str, desc: &'a str) -> &'a str {
    desc.lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && *l != name && !l.chars().all(|c| c == '-' || c == '='))
        .unwrap_or("")
}

/// `*filter*` as a regex.
fn wildcard_regex(filter: &str) -> Option<Regex> {
    let mut pattern = String::from("^.*");
    for c in filter.chars() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            c => pattern.push_str(&regex::escape(&c.to_string())),
        }
    }
    pattern.push_str(".*$");
    Regex::new(&pattern).ok()
}
