//! Filter decisions: whether a record's tag set is emitted
//!
//! The actor consults the [`TagFilter`] held in its live state for every
//! `WriteLine` command. Two mechanisms are supported:
//!
//! - a static set of enabled tags ([`EnabledTags`]): a record is emitted when
//!   any of its tags is enabled
//! - a delegated evaluator ([`FilterDecision`]) for callers that bring their
//!   own rule engine

use super::error::Result;
use super::tag::{canonicalize, TagSet};
use std::collections::BTreeSet;
use std::fmt;

/// Tags enabled when no configuration is supplied.
pub const DEFAULT_ENABLED_TAGS: &[&str] = &[
    "INFO",
    "ERROR",
    "FATAL",
    "PANIC",
    "INPRODENV",
    "INVESTIGATETOMORROW",
    "WAKEMEINTHEMIDDLEOFTHENIGHT",
    "EXITFUNC",
];

/// Pluggable evaluator deciding whether a tag set is emitted.
pub trait FilterDecision: Send + Sync + fmt::Debug {
    fn should_emit(&self, tags: &TagSet) -> bool;

    /// Produce an independent copy for a snapshot.
    ///
    /// Evaluators that cannot be duplicated return an error; the actor then
    /// drops the request that needed the copy.
    fn duplicate(&self) -> Result<Box<dyn FilterDecision>>;
}

/// Static "any of these tags" filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnabledTags {
    tags: BTreeSet<String>,
}

impl EnabledTags {
    pub fn new() -> Self {
        Self {
            tags: BTreeSet::new(),
        }
    }

    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tags: tags.into_iter().map(|t| canonicalize(t.as_ref())).collect(),
        }
    }

    pub fn enable(&mut self, tag: &str) -> bool {
        self.tags.insert(canonicalize(tag))
    }

    pub fn disable(&mut self, tag: &str) -> bool {
        self.tags.remove(&canonicalize(tag))
    }

    pub fn is_enabled(&self, tag: &str) -> bool {
        self.tags.contains(&canonicalize(tag))
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
}

impl FilterDecision for EnabledTags {
    fn should_emit(&self, tags: &TagSet) -> bool {
        tags.iter().any(|t| self.tags.contains(t))
    }

    fn duplicate(&self) -> Result<Box<dyn FilterDecision>> {
        Ok(Box::new(self.clone()))
    }
}

/// Filter held by the logger state
#[derive(Debug)]
pub enum TagFilter {
    /// Emit every record
    All,
    /// Emit records carrying at least one enabled tag
    Enabled(EnabledTags),
    /// Defer to an external evaluator
    Rule(Box<dyn FilterDecision>),
}

impl TagFilter {
    pub fn enabled<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        TagFilter::Enabled(EnabledTags::from_tags(tags))
    }

    pub fn rule<F: FilterDecision + 'static>(rule: F) -> Self {
        TagFilter::Rule(Box::new(rule))
    }

    pub fn should_emit(&self, tags: &TagSet) -> bool {
        match self {
            TagFilter::All => true,
            TagFilter::Enabled(enabled) => enabled.should_emit(tags),
            TagFilter::Rule(rule) => rule.should_emit(tags),
        }
    }

    /// Independent copy: enabled sets are cloned, rules duplicate themselves.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(match self {
            TagFilter::All => TagFilter::All,
            TagFilter::Enabled(enabled) => TagFilter::Enabled(enabled.clone()),
            TagFilter::Rule(rule) => TagFilter::Rule(rule.duplicate()?),
        })
    }

    /// The static enabled set, if this filter is one
    pub fn enabled_tags(&self) -> Option<&EnabledTags> {
        match self {
            TagFilter::Enabled(enabled) => Some(enabled),
            _ => None,
        }
    }

    pub fn enabled_tags_mut(&mut self) -> Option<&mut EnabledTags> {
        match self {
            TagFilter::Enabled(enabled) => Some(enabled),
            _ => None,
        }
    }
}

impl Default for TagFilter {
    fn default() -> Self {
        TagFilter::enabled(DEFAULT_ENABLED_TAGS.iter().copied())
    }
}
