//! Record mutation planning.
//!
//! Everything here is pure: it computes what a record should become. Sending
//! the result to the API (or not, in dry-run mode) is the caller's business.
//!
//! Rewrite patterns use the `regex` crate's replacement syntax: `$1`, `${1}`
//! and `${name}` refer to capture groups, `$$` is a literal dollar sign.

use regex::Regex;

use crate::{NewRecord, Record, RecordUpdate, Result};

/// TTL used when creating a record without an explicit one
pub const DEFAULT_TTL: u32 = 3600;

/// Priority used when creating a record without an explicit one
pub const DEFAULT_PRIORITY: u16 = 0;

/// Derive a record's new content.
///
/// - no explicit content: `None`, the content is left alone
/// - explicit content, no rewrite pattern: the explicit content verbatim
/// - explicit content and a rewrite pattern: every match of the pattern in the
///   current content is replaced, with the explicit content as the template
#[must_use]
pub fn compute_new_content(
    record: &Record,
    rewrite: Option<&Regex>,
    explicit: Option<&str>,
) -> Option<String> {
    let replacement = explicit?;
    Some(match rewrite {
        Some(re) => re.replace_all(&record.content, replacement).into_owned(),
        None => replacement.to_string(),
    })
}

/// Requested changes to a matched record; absent fields stay as they are
#[derive(Debug, Clone, Default)]
pub struct MutationSpec {
    pub new_name: Option<String>,
    pub new_type: Option<String>,
    pub new_content: Option<String>,
    pub new_ttl: Option<u32>,
    pub new_priority: Option<u16>,
    /// Applied to the current content with `new_content` as the template
    pub rewrite_pattern: Option<Regex>,
}

impl MutationSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and set the rewrite pattern; an empty pattern clears it
    pub fn rewrite_pattern(mut self, pattern: &str) -> Result<Self> {
        self.rewrite_pattern = if pattern.is_empty() {
            None
        } else {
            Some(Regex::new(pattern)?)
        };
        Ok(self)
    }

    /// Returns true if no override is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.new_name.is_none()
            && self.new_type.is_none()
            && self.new_content.is_none()
            && self.new_ttl.is_none()
            && self.new_priority.is_none()
    }

    /// The content `record` would end up with, if it changes at all
    #[must_use]
    pub fn new_content_for(&self, record: &Record) -> Option<String> {
        compute_new_content(
            record,
            self.rewrite_pattern.as_ref(),
            self.new_content.as_deref(),
        )
    }

    /// Returns true if applying the spec to `record` is pointless: the
    /// computed content equals the current one, or there is nothing to apply
    #[must_use]
    pub fn is_noop_for(&self, record: &Record) -> bool {
        if self.is_empty() {
            return true;
        }
        self.new_content_for(record)
            .is_some_and(|content| content == record.content)
    }

    /// A copy of `record` with the overrides merged in
    #[must_use]
    pub fn apply_to(&self, record: &Record) -> Record {
        let mut updated = record.clone();
        if let Some(name) = &self.new_name {
            updated.name.clone_from(name);
        }
        if let Some(record_type) = &self.new_type {
            updated.record_type.clone_from(record_type);
        }
        if let Some(content) = self.new_content_for(record) {
            updated.content = content;
        }
        if let Some(ttl) = self.new_ttl {
            updated.ttl = ttl;
        }
        if let Some(priority) = self.new_priority {
            updated.priority = priority;
        }
        updated
    }

    /// The `PUT` body that selects `record` by its current values
    #[must_use]
    pub fn to_update(&self, record: &Record) -> RecordUpdate {
        RecordUpdate {
            new_name: self.new_name.clone(),
            new_type: self.new_type.clone(),
            new_value: self.new_content_for(record),
            new_ttl: self.new_ttl,
            new_priority: self.new_priority,
            ..RecordUpdate::for_record(record)
        }
    }
}

/// A record to create; TTL and priority fall back to the defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRecordSpec {
    pub name: String,
    pub record_type: String,
    pub content: String,
    pub ttl: Option<u32>,
    pub priority: Option<u16>,
}

impl NewRecordSpec {
    /// The `POST` body for this record
    #[must_use]
    pub fn to_new_record(&self) -> NewRecord {
        NewRecord {
            name: self.name.clone(),
            record_type: self.record_type.clone(),
            value: self.content.clone(),
            ttl: self.ttl.unwrap_or(DEFAULT_TTL),
            priority: self.priority.unwrap_or(DEFAULT_PRIORITY),
        }
    }
}
