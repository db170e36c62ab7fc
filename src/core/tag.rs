//! Filter tags: canonical labels attached to every record

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical form of a tag: upper case.
pub fn canonicalize(tag: &str) -> String {
    tag.to_uppercase()
}

/// Ordered set of canonical tags carried by a single record.
///
/// Insertion order is kept so the emitted `filtertags` array reads the way the
/// caller wrote it; duplicates (after canonicalization) are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet {
    tags: Vec<String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self { tags: Vec::new() }
    }

    /// Build a set from raw tags, canonicalizing each one
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for tag in tags {
            set.insert(tag.as_ref());
        }
        set
    }

    /// Insert a tag; returns false if it was already present
    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = canonicalize(tag);
        if tag.is_empty() || self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    pub fn contains(&self, tag: &str) -> bool {
        let tag = canonicalize(tag);
        self.tags.iter().any(|t| *t == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tags.join(","))
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_tags(iter)
    }
}

/// Severity ladder. Each severity emits its own tag plus a rank tag (`L1`..`L7`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Notice,
    Informational,
    Warning,
    Warn,
    Error,
    Alert,
    Emergency,
    Critical,
}

impl Severity {
    pub fn to_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Notice => "NOTICE",
            Severity::Informational => "INFORMATIONAL",
            Severity::Warning => "WARNING",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Alert => "ALERT",
            Severity::Emergency => "EMERGENCY",
            Severity::Critical => "CRITICAL",
        }
    }

    /// Rank tag shared by severities of equal weight
    pub fn rank(&self) -> &'static str {
        match self {
            Severity::Trace => "L1",
            Severity::Debug => "L2",
            Severity::Info | Severity::Notice | Severity::Informational => "L3",
            Severity::Warning | Severity::Warn => "L4",
            Severity::Error => "L5",
            Severity::Alert => "L6",
            Severity::Emergency | Severity::Critical => "L7",
        }
    }

    pub fn tags(&self) -> [&'static str; 2] {
        [self.to_str(), self.rank()]
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonicalize(s).as_str() {
            "TRACE" => Ok(Severity::Trace),
            "DEBUG" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "NOTICE" => Ok(Severity::Notice),
            "INFORMATIONAL" => Ok(Severity::Informational),
            "WARNING" => Ok(Severity::Warning),
            "WARN" => Ok(Severity::Warn),
            "ERROR" => Ok(Severity::Error),
            "ALERT" => Ok(Severity::Alert),
            "EMERGENCY" => Ok(Severity::Emergency),
            "CRITICAL" => Ok(Severity::Critical),
            _ => Err(format!("Invalid severity: '{}'", s)),
        }
    }
}

/// Operational categories; single tag, no rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    ExitFunc,
    InTestEnv,
    InProdEnv,
    InvestigateTomorrow,
    WakeMeInTheMiddleOfTheNight,
}

impl Category {
    pub fn to_str(&self) -> &'static str {
        match self {
            Category::ExitFunc => "EXITFUNC",
            Category::InTestEnv => "INTESTENV",
            Category::InProdEnv => "INPRODENV",
            Category::InvestigateTomorrow => "INVESTIGATETOMORROW",
            Category::WakeMeInTheMiddleOfTheNight => "WAKEMEINTHEMIDDLEOFTHENIGHT",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}
