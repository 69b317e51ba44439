//! Configuration management.
//!
//! Every setting is taken from the command line first, then the environment
//! (handled by clap), then the configuration file, then the built-in default.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use lopdns::{CopyTask, MutationSpec, NewRecordSpec, SelectionCriteria, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DEFAULT_TOKEN_DURATION};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::args::{Action, Cli, LogLevel};
use crate::error::CommandError;
use crate::output::OutputFormat;

/// Contents of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Client id used to obtain a token.
    pub client_id: Option<String>,

    /// API base URL.
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,

    /// Requested token lifetime in seconds.
    pub token_duration_sec: Option<u64>,

    /// Default log level.
    pub log_level: Option<LogLevel>,

    /// Default output format.
    pub output_format: Option<OutputFormat>,

    /// Copy tasks run by `run-tasks`, one `[[task]]` table each.
    #[serde(rename = "task", skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<CopyTask>,
}

impl Config {
    /// Get the default config file path.
    pub fn path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("se", "lopdns", "lopdns")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the default location; a missing file is fine.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;

        Ok(config)
    }
}

/// Everything one invocation needs, resolved and validated.
#[derive(Debug, Clone)]
pub struct Settings {
    pub action: Action,
    pub client_id: String,
    pub base_url: String,
    pub timeout: Duration,
    pub token_duration: Duration,
    pub output_format: OutputFormat,
    pub dry_run: bool,
    /// Requested zone; every zone when absent
    pub zone: Option<String>,
    pub selection: SelectionCriteria,
    pub mutation: MutationSpec,
    /// Copy tasks from the configuration file
    pub tasks: Vec<CopyTask>,
}

impl Settings {
    /// Merge the command line with the configuration file and check that the
    /// action has what it needs. Nothing here touches the network.
    pub fn resolve(cli: Cli, config: Config) -> std::result::Result<Self, CommandError> {
        let action: Action = cli.action.parse()?;

        let client_id = trimmed(cli.client_id)
            .or_else(|| trimmed(config.client_id))
            .ok_or_else(|| {
                CommandError::InvalidArguments(
                    "Client id required.\n\n\
                     Set it with one of:\n  \
                     1. --client-id <ID>\n  \
                     2. LOPDNS_CLIENT_ID environment variable\n  \
                     3. client_id in the config file"
                        .to_string(),
                )
            })?;

        let base_url = trimmed(cli.base_url)
            .or_else(|| trimmed(config.base_url))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = cli
            .timeout
            .or(config.timeout)
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);
        let token_duration = cli
            .token_duration_sec
            .or(config.token_duration_sec)
            .map_or(DEFAULT_TOKEN_DURATION, Duration::from_secs);
        if timeout.is_zero() {
            return Err(invalid("--timeout must be at least 1 second"));
        }
        if token_duration.is_zero() {
            return Err(invalid("--token-duration-sec must be at least 1 second"));
        }

        let zone = trimmed(cli.zone);
        let record_name = trimmed(cli.record_name);
        let record_type = cli.record_type.trim().to_string();
        let content_pattern = cli.current_record_content.unwrap_or_default().trim().to_string();

        if action.is_mutating() {
            if zone.is_none() {
                return Err(invalid(format!("--zone is required for {action}")));
            }
            if record_name.is_none() {
                return Err(invalid(format!("--record-name is required for {action}")));
            }
            if record_type.is_empty() {
                return Err(invalid(format!("--record-type is required for {action}")));
            }
        }

        let selection = SelectionCriteria::new(
            zone.clone().unwrap_or_default(),
            record_name.unwrap_or_default(),
            record_type,
        )
        .content_pattern(content_pattern)
        .match_all(cli.all_records);

        let mutation = MutationSpec {
            new_name: trimmed(cli.new_record_name),
            new_type: trimmed(cli.new_record_type),
            new_content: trimmed(cli.new_record_content),
            new_ttl: cli.new_record_ttl,
            new_priority: cli.new_record_priority,
            rewrite_pattern: None,
        }
        .rewrite_pattern(cli.replace_record_content_regex.unwrap_or_default().trim())
        .map_err(|e| bad_pattern("--replace-record-content-regex", e))?;

        // Compile once up front so a bad pattern fails before any request
        lopdns::Matcher::new(&selection)
            .map_err(|e| bad_pattern("--current-record-content", e))?;

        match action {
            Action::CreateRecord | Action::CreateOrUpdateRecord if mutation.new_content.is_none() => {
                return Err(invalid(format!("--new-record-content is required for {action}")));
            }
            Action::UpdateRecord if mutation.is_empty() => {
                return Err(invalid(
                    "update-record needs at least one of --new-record-content, --new-record-name, \
                     --new-record-type, --new-record-ttl, --new-record-priority",
                ));
            }
            Action::RunTasks if config.tasks.is_empty() => {
                return Err(invalid("run-tasks needs at least one [[task]] in the config file"));
            }
            Action::RunTasks => {
                for task in &config.tasks {
                    task.validate()
                        .map_err(|e| bad_pattern(&format!("task {task}"), e))?;
                }
            }
            _ => {}
        }

        Ok(Self {
            action,
            client_id,
            base_url,
            timeout,
            token_duration,
            output_format: cli.output.or(config.output_format).unwrap_or_default(),
            dry_run: cli.dry_run,
            zone,
            selection,
            mutation,
            tasks: config.tasks,
        })
    }

    /// The record to create when creating, or when nothing matched in
    /// create-or-update. The rewrite pattern has no content to act on here,
    /// so the new content is used as is.
    #[must_use]
    pub fn new_record(&self) -> NewRecordSpec {
        NewRecordSpec {
            name: self
                .mutation
                .new_name
                .clone()
                .unwrap_or_else(|| self.selection.name.clone()),
            record_type: self
                .mutation
                .new_type
                .clone()
                .unwrap_or_else(|| self.selection.record_type.clone()),
            content: self.mutation.new_content.clone().unwrap_or_default(),
            ttl: self.mutation.new_ttl,
            priority: self.mutation.new_priority,
        }
    }
}

/// Effective log level: flag or environment, then the config file
#[must_use]
pub fn log_level(cli: &Cli, config: &Config) -> LogLevel {
    cli.log_level.or(config.log_level).unwrap_or_default()
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn invalid(msg: impl Into<String>) -> CommandError {
    CommandError::InvalidArguments(msg.into())
}

/// A pattern that does not compile falls in the catch-all class
fn bad_pattern(flag: &str, err: impl std::fmt::Display) -> CommandError {
    CommandError::Unhandled(anyhow::anyhow!("{flag}: {err}"))
}
