//! Version parsing and interpreter constraint normalization

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// `major.minor.patch` anywhere in a banner.
fn full_version_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)").expect("Invalid regex"))
}

/// `x.y` or `x.y.z` anywhere in a tool's output.
fn loose_version_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\d+\.\d+(?:\.\d+)?").expect("Invalid regex"))
}

/// Up to three dotted numeric components at the start of a constraint.
fn leading_components_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^\d+(?:\.\d+){0,2}").expect("Invalid regex"))
}

/// A `major.minor.patch` version. Ordering is component-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse the leading `1`, `1.2` or `1.2.3` of `text`; missing components are 0.
    pub fn parse(text: &str) -> Option<Self> {
        parse_components(text).map(|components| Self::from_components(&components))
    }

    /// First full `major.minor.patch` token found anywhere in `text`, as
    /// printed by interpreter version banners.
    pub fn find_in(text: &str) -> Option<Self> {
        let caps = full_version_regex().captures(text)?;
        Some(Self::new(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        ))
    }

    /// Whether this (detected) version meets `required`.
    pub fn satisfies(&self, required: &Version) -> bool {
        self >= required
    }

    fn from_components(components: &[u64]) -> Self {
        let at = |i: usize| components.get(i).copied().unwrap_or(0);
        Self::new(at(0), at(1), at(2))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

impl TryFrom<String> for Version {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Version::parse(&value).ok_or_else(|| format!("invalid version '{value}'"))
    }
}

/// First `x.y` or `x.y.z` token in a tool's `--version` output.
pub fn find_tool_version(text: &str) -> Option<String> {
    loose_version_regex().find(text).map(|m| m.as_str().to_string())
}

/// Normalize an interpreter constraint such as `>=7.4`, `^8.1` or `~8.0.3`
/// into the minimum version it admits.
///
/// Only the first alternative of a compound constraint is considered.
/// `^` and `~` keep `major.minor` and zero the patch, unless the constraint
/// names a single component. Returns `None` when no version can be read.
pub fn normalize_requirement(raw: &str) -> Option<Version> {
    let first = raw.split("||").next()?.split(['|', ',']).next()?.trim();

    if let Some(rest) = first.strip_prefix(['^', '~']) {
        let components = parse_components(rest)?;
        if components.len() == 1 {
            return Some(Version::from_components(&components));
        }
        return Some(Version::new(components[0], components[1], 0));
    }

    let rest = first
        .trim_start_matches(">=")
        .trim_start_matches('≥')
        .trim_start_matches(['>', '=', 'v'])
        .trim_start();
    Version::parse(rest)
}

fn parse_components(text: &str) -> Option<Vec<u64>> {
    let matched = leading_components_regex().find(text.trim())?;
    matched
        .as_str()
        .split('.')
        .map(|part| part.parse().ok())
        .collect()
}
