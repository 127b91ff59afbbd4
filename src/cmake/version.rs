use regex::Regex;
use semver::Version;
use std::sync::OnceLock;

/// CMake releases known when the help format was last checked, newest first.
///
/// The list is hard-written and must be updated by hand.
pub const KNOWN_VERSIONS: &[&str] = &[
    "2.8.11", "2.8.10", "2.8.9", "2.8.8", "2.8.7", "2.8.6", "2.8.5", "2.8.4", "2.8.3", "2.8.2",
    "2.8.1", "2.8.0", "2.6.4", "2.6.3", "2.6.2", "2.6.1", "2.6.0", "2.4.8", "2.4.7", "2.4.6",
    "2.4.5", "2.4.4", "2.4.3", "2.2.3", "2.0.6", "1.8.3",
];

fn version_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"cmake version ([0-9\.]+)").ok())
        .as_ref()
}

/// Extract `x.y.z` from a `cmake version x.y.z` line.
pub fn parse_version(line: &str) -> Option<String> {
    version_regex()?
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end_matches('.').to_string())
}

/// Lenient semver parse: "3.5" becomes 3.5.0, "2.8.12.2" becomes 2.8.12.
pub fn to_semver(version: &str) -> Option<Version> {
    let mut parts = version.split('.').map(|p| p.parse::<u64>());
    let major = parts.next()?.ok()?;
    let minor = parts.next().unwrap_or(Ok(0)).ok()?;
    let patch = parts.next().unwrap_or(Ok(0)).ok()?;
    Some(Version::new(major, minor, patch))
}

/// cmake 3.0 stopped emitting the troff sections in `--help-man`.
///
/// Unparsable versions are assumed to be modern.
pub fn has_man_sections(version: &str) -> bool {
    to_semver(version).is_some_and(|v| v < Version::new(3, 0, 0))
}
