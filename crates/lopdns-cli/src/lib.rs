//! # lopdns-cli
//!
//! Command-line client for the LopDNS v2 API.
//!
//! ## Features
//!
//! - **Zones and records**: list zones, list records across zones
//! - **Record changes**: create, update, create-or-update and delete records
//!   selected by name, type and a content regex
//! - **Content rewriting**: regex find-and-replace on record content
//! - **Dry run**: compute and report changes without sending them
//! - **Multiple output formats**: Pretty text, JSON, CSV, YAML
//! - **Scriptable**: a distinct exit code per failure class

pub mod cli;
pub mod config;
pub mod error;
pub mod mutator;
pub mod output;

pub use cli::run;
pub use error::CommandError;
