//! Core types for the LopDNS API client.
//!
//! This crate provides the foundational pieces used across the LopDNS tooling:
//!
//! - **Types**: Strongly-typed representations of records, tokens and
//!   the request/response bodies of the `/v2` API
//! - **Selection**: [`Matcher`] filters a zone's records by name, type and a
//!   content pattern
//! - **Mutation**: [`MutationSpec`] and [`compute_new_content`] derive the new
//!   state of a matched record
//! - **Tasks**: [`CopyTask`] keeps a target record in step with data taken
//!   from a source record
//! - **Errors**: Comprehensive error handling with [`LopDnsError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use lopdns_core::{Matcher, SelectionCriteria};
//!
//! let criteria = SelectionCriteria::new("example.se", "www", "A")
//!     .content_pattern(r"^1\.2\.3\.4$");
//! let matcher = Matcher::new(&criteria)?;
//! for record in matcher.filter(&records) {
//!     println!("{} {} {}", record.name, record.record_type, record.content);
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/lopdns-core/1.0.0")]

mod error;
pub mod mutate;
pub mod select;
pub mod task;
pub mod types;

pub use error::{LopDnsError, Result};
pub use mutate::{compute_new_content, MutationSpec, NewRecordSpec, DEFAULT_PRIORITY, DEFAULT_TTL};
pub use select::{Matcher, SelectionCriteria};
pub use task::{CopyTask, RecordLocator, RegexSearch, TaskError, TaskPlan};
pub use types::*;
