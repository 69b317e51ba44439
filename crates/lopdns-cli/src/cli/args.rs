//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

use crate::error::CommandError;
use crate::output::OutputFormat;

/// Manage DNS zones and records through the LopDNS API
///
/// Authenticates with a client id, then lists zones and records or creates,
/// updates and deletes records. Records are selected by name, type and a
/// regular expression searched for in their content.
///
/// API documentation: https://api.lopdns.se/v2/docs
#[derive(Parser, Debug, Clone)]
#[command(name = "lopdns")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Action to perform: get-zones, get-records, create-record,
    /// update-record, createorupdate-record, delete-record, run-tasks
    #[arg(short, long)]
    pub action: String,

    /// Client id used to obtain a token
    #[arg(short, long, env = "LOPDNS_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// API base URL, with or without the /v2 suffix [default: https://api.lopdns.se]
    #[arg(short, long, env = "LOPDNS_BASE_URL")]
    pub base_url: Option<String>,

    /// Timeout in seconds for connecting and for each request [default: 10]
    #[arg(short, long, env = "LOPDNS_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Lifetime in seconds of the requested token [default: 3600]
    #[arg(short = 'd', long, env = "LOPDNS_TOKEN_DURATION_SEC")]
    pub token_duration_sec: Option<u64>,

    /// Zone to work on (all zones for get-zones and get-records, and every
    /// task for run-tasks, when omitted)
    #[arg(short, long)]
    pub zone: Option<String>,

    /// Type of the record(s) to select
    #[arg(short, long, default_value = "A")]
    pub record_type: String,

    /// Name of the record(s) to select
    #[arg(short = 'n', long)]
    pub record_name: Option<String>,

    /// Regular expression the current content must contain a match for
    #[arg(short = 'u', long)]
    pub current_record_content: Option<String>,

    /// Regular expression replaced in the current content by the new content,
    /// which may use $1 or ${name} to refer to capture groups
    #[arg(short = 'x', long)]
    pub replace_record_content_regex: Option<String>,

    /// New record content
    #[arg(short = 'w', long)]
    pub new_record_content: Option<String>,

    /// New record name
    #[arg(long)]
    pub new_record_name: Option<String>,

    /// New record type
    #[arg(long)]
    pub new_record_type: Option<String>,

    /// New record TTL in seconds (3600 for new records when omitted)
    #[arg(long)]
    pub new_record_ttl: Option<u32>,

    /// New record priority (0 for new records when omitted)
    #[arg(long)]
    pub new_record_priority: Option<u16>,

    /// Apply the action to every matching record, not only the first
    #[arg(short = 'A', long)]
    pub all_records: bool,

    /// Compute and report changes without sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Log level [default: info]
    #[arg(short, long, env = "LOPDNS_LOG_LEVEL", value_enum)]
    pub log_level: Option<LogLevel>,

    /// Output format [default: pretty]
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Configuration file [default: platform config dir]/lopdns/config.toml
    #[arg(long, env = "LOPDNS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// What one invocation does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    GetZones,
    GetRecords,
    CreateRecord,
    UpdateRecord,
    CreateOrUpdateRecord,
    DeleteRecord,
    /// Run the copy tasks of the configuration file
    RunTasks,
}

impl Action {
    const ALL: [Self; 7] = [
        Self::GetZones,
        Self::GetRecords,
        Self::CreateRecord,
        Self::UpdateRecord,
        Self::CreateOrUpdateRecord,
        Self::DeleteRecord,
        Self::RunTasks,
    ];

    /// The name used on the command line
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GetZones => "get-zones",
            Self::GetRecords => "get-records",
            Self::CreateRecord => "create-record",
            Self::UpdateRecord => "update-record",
            Self::CreateOrUpdateRecord => "createorupdate-record",
            Self::DeleteRecord => "delete-record",
            Self::RunTasks => "run-tasks",
        }
    }

    /// Every action name, in help order
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|a| a.name()).collect()
    }

    /// Returns true for actions that change the record selected on the
    /// command line
    #[must_use]
    pub const fn is_mutating(self) -> bool {
        !matches!(self, Self::GetZones | Self::GetRecords | Self::RunTasks)
    }
}

impl FromStr for Action {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "create-or-update-record" => Ok(Self::CreateOrUpdateRecord),
            lower => Self::ALL
                .into_iter()
                .find(|a| a.name() == lower)
                .ok_or_else(|| CommandError::UnknownAction(s.to_string())),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Verbosity of the log output on stderr
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[value(alias = "warn")]
    #[serde(alias = "warn")]
    Warning,
    #[default]
    Info,
    Debug,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warning => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
        }
    }
}
