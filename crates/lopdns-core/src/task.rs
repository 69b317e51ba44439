//! Copy tasks.
//!
//! A task keeps part of a target record in step with data read from a source
//! record in the same zone, e.g. the address of `home A` inside the
//! `ip4:` mechanism of an SPF `TXT` record. Each side is located by name, type
//! and an optional content pattern; the first record that qualifies is used.

use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::select::{Matcher, SelectionCriteria};
use crate::{LopDnsError, Record};

/// A regular expression and the capture group to read from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexSearch {
    pub pattern: String,

    /// Capture group; 0 is the whole match
    #[serde(default)]
    pub group: usize,
}

impl RegexSearch {
    fn compile(&self) -> Result<Regex, TaskError> {
        Ok(Regex::new(&self.pattern)?)
    }
}

/// Where a task reads from or writes to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordLocator {
    pub name: String,

    #[serde(rename = "type", default = "default_record_type")]
    pub record_type: String,

    /// The record qualifies only if this group matches non-empty content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_match: Option<RegexSearch>,

    /// Part of the content that carries the data; the whole content if unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_extract: Option<RegexSearch>,

    /// Target only: the part of the content the source data replaces. The
    /// whole content is replaced if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_replace: Option<RegexSearch>,
}

fn default_record_type() -> String {
    "A".to_string()
}

/// Copy data from a source record into a target record of one zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyTask {
    pub zone: String,
    pub source: RecordLocator,
    pub target: RecordLocator,

    /// Report the change without sending it
    #[serde(default)]
    pub dry_run: bool,
}

/// What a task would do to its zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskPlan {
    /// The target already carries the source data
    UpToDate { target: Record },

    /// The target's content must become `new_content`
    Update { target: Record, new_content: String },
}

/// Why a task cannot run
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("no {role} record '{name}' of type {record_type} in zone {zone}")]
    RecordNotFound {
        role: &'static str,
        zone: String,
        name: String,
        record_type: String,
    },

    #[error("no data found in {role} record {record}")]
    NoData { role: &'static str, record: Record },

    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error(transparent)]
    Selection(#[from] LopDnsError),
}

impl CopyTask {
    /// Compile every pattern of the task
    pub fn validate(&self) -> Result<(), TaskError> {
        for locator in [&self.source, &self.target] {
            Locator::new(&self.zone, locator, "")?;
        }
        if let Some(replace) = &self.target.content_replace {
            replace.compile()?;
        }
        Ok(())
    }

    /// Work out the change this task makes to a zone holding `records`.
    ///
    /// The source data is inserted literally; `$` in it has no special
    /// meaning.
    pub fn plan(&self, records: &[Record]) -> Result<TaskPlan, TaskError> {
        let (source, source_data) =
            Locator::new(&self.zone, &self.source, "source")?.find(records)?;
        let source_data = source_data.ok_or_else(|| TaskError::NoData {
            role: "source",
            record: source.clone(),
        })?;

        let (target, target_data) =
            Locator::new(&self.zone, &self.target, "target")?.find(records)?;
        let target_data = target_data.ok_or_else(|| TaskError::NoData {
            role: "target",
            record: target.clone(),
        })?;

        if target_data == source_data {
            return Ok(TaskPlan::UpToDate {
                target: target.clone(),
            });
        }

        let new_content = match &self.target.content_replace {
            Some(replace) => replace
                .compile()?
                .replace_all(&target.content, NoExpand(&source_data))
                .into_owned(),
            None => source_data,
        };

        Ok(TaskPlan::Update {
            target: target.clone(),
            new_content,
        })
    }
}

impl fmt::Display for CopyTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {} -> {} {}",
            self.zone,
            self.source.name,
            self.source.record_type,
            self.target.name,
            self.target.record_type
        )
    }
}

/// A compiled [`RecordLocator`]
struct Locator<'a> {
    zone: &'a str,
    spec: &'a RecordLocator,
    role: &'static str,
    matcher: Matcher,
    content_match: Option<(Regex, usize)>,
    data_extract: Option<(Regex, usize)>,
}

impl<'a> Locator<'a> {
    fn new(zone: &'a str, spec: &'a RecordLocator, role: &'static str) -> Result<Self, TaskError> {
        let pattern = spec
            .content_match
            .as_ref()
            .map(|m| m.pattern.clone())
            .unwrap_or_default();
        let criteria = SelectionCriteria::new(zone, &spec.name, &spec.record_type)
            .content_pattern(pattern)
            .match_all(true);

        Ok(Self {
            zone,
            spec,
            role,
            matcher: Matcher::new(&criteria)?,
            content_match: compile_group(spec.content_match.as_ref())?,
            data_extract: compile_group(spec.data_extract.as_ref())?,
        })
    }

    /// The first qualifying record and the data it carries, if any
    fn find<'r>(&self, records: &'r [Record]) -> Result<(&'r Record, Option<String>), TaskError> {
        let record = self
            .matcher
            .filter(records)
            .into_iter()
            .find(|r| {
                self.content_match
                    .as_ref()
                    .map_or(true, |(re, group)| capture(re, *group, &r.content).is_some())
            })
            .ok_or_else(|| TaskError::RecordNotFound {
                role: self.role,
                zone: self.zone.to_string(),
                name: self.spec.name.clone(),
                record_type: self.spec.record_type.clone(),
            })?;

        let data = match &self.data_extract {
            Some((re, group)) => capture(re, *group, &record.content).map(str::to_string),
            None => Some(record.content.clone()).filter(|c| !c.is_empty()),
        };
        Ok((record, data))
    }
}

fn compile_group(search: Option<&RegexSearch>) -> Result<Option<(Regex, usize)>, TaskError> {
    match search {
        Some(s) => Ok(Some((s.compile()?, s.group))),
        None => Ok(None),
    }
}

/// Non-empty text of capture `group` of the first match in `content`
fn capture<'c>(re: &Regex, group: usize, content: &'c str) -> Option<&'c str> {
    re.captures(content)?
        .get(group)
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
}
