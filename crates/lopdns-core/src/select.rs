//! Record selection.
//!
//! A record matches when its name and type equal the criteria and the content
//! pattern is found somewhere in its content. Patterns are unanchored; anchor
//! them with `^...$` for an exact match. With all-records mode and an empty
//! pattern the content is not looked at at all.

use regex::Regex;

use crate::{Record, Result};

/// Which records of a zone an action applies to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionCriteria {
    /// Zone the records live in
    pub zone: String,

    /// Record name to match exactly
    pub name: String,

    /// Record type to match exactly
    pub record_type: String,

    /// Regular expression searched for in the record content; empty matches any
    pub content_pattern: String,

    /// Apply to every match instead of only the first
    pub match_all: bool,
}

impl SelectionCriteria {
    #[must_use]
    pub fn new(
        zone: impl Into<String>,
        name: impl Into<String>,
        record_type: impl Into<String>,
    ) -> Self {
        Self {
            zone: zone.into(),
            name: name.into(),
            record_type: record_type.into(),
            ..Self::default()
        }
    }

    /// Set the content pattern
    #[must_use]
    pub fn content_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.content_pattern = pattern.into();
        self
    }

    /// Select every match instead of the first one
    #[must_use]
    pub const fn match_all(mut self, all: bool) -> Self {
        self.match_all = all;
        self
    }
}

/// Compiled form of [`SelectionCriteria`]
#[derive(Debug, Clone)]
pub struct Matcher {
    name: String,
    record_type: String,
    /// `None` only for the all-records fast path
    pattern: Option<Regex>,
    match_all: bool,
}

impl Matcher {
    /// Compile the criteria's content pattern
    pub fn new(criteria: &SelectionCriteria) -> Result<Self> {
        let pattern = if criteria.match_all && criteria.content_pattern.is_empty() {
            None
        } else {
            Some(Regex::new(&criteria.content_pattern)?)
        };

        Ok(Self {
            name: criteria.name.clone(),
            record_type: criteria.record_type.clone(),
            pattern,
            match_all: criteria.match_all,
        })
    }

    /// Returns true if `record` satisfies the criteria
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        record.name == self.name
            && record.record_type == self.record_type
            && self
                .pattern
                .as_ref()
                .map_or(true, |re| re.is_match(&record.content))
    }

    /// Every matching record, in source order
    #[must_use]
    pub fn filter<'r>(&self, records: &'r [Record]) -> Vec<&'r Record> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    /// The records an action should touch: all matches in all-records mode,
    /// otherwise at most the first one
    #[must_use]
    pub fn select<'r>(&self, records: &'r [Record]) -> Vec<&'r Record> {
        let mut matched = self.filter(records);
        if !self.match_all {
            matched.truncate(1);
        }
        matched
    }
}
