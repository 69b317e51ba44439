//! Failure classes and their process exit codes.

use lopdns::LopDnsError;
use thiserror::Error;

use crate::cli::args::Action;

/// Why a command failed. Each variant maps to its own exit code so scripts
/// can tell the cases apart.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Missing or malformed arguments, detected before any request
    #[error("{0}")]
    InvalidArguments(String),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("zone not found: {0}")]
    ZoneNotFound(String),

    #[error("no zones available for this client id")]
    NoZonesAvailable,

    #[error("failed to create {record_type} record '{name}' in zone {zone}: {source}")]
    CreateFailed {
        zone: String,
        name: String,
        record_type: String,
        #[source]
        source: LopDnsError,
    },

    #[error("failed to update {record_type} record '{name}' in zone {zone}: {source}")]
    UpdateFailed {
        zone: String,
        name: String,
        record_type: String,
        #[source]
        source: LopDnsError,
    },

    #[error("no records updated for name '{name}' and type {record_type} in zone {zone}")]
    NoRecordsUpdated {
        zone: String,
        name: String,
        record_type: String,
    },

    #[error("failed to delete {record_type} record '{name}' in zone {zone}: {source}")]
    DeleteFailed {
        zone: String,
        name: String,
        record_type: String,
        #[source]
        source: LopDnsError,
    },

    #[error("no records deleted for name '{name}' and type {record_type} in zone {zone}")]
    NoRecordsDeleted {
        zone: String,
        name: String,
        record_type: String,
    },

    #[error("{failed} of {total} tasks failed")]
    TasksFailed { failed: usize, total: usize },

    #[error("unknown action: {0}\nValid actions: {actions}", actions = Action::names().join(", "))]
    UnknownAction(String),

    /// Anything else: transport failures, malformed responses, output errors
    #[error(transparent)]
    Unhandled(#[from] anyhow::Error),
}

impl CommandError {
    pub const INVALID_ARGUMENTS: u8 = 1;
    pub const AUTHENTICATION_FAILED: u8 = 2;
    pub const ZONE_NOT_FOUND: u8 = 3;
    pub const NO_ZONES_AVAILABLE: u8 = 4;
    pub const CREATE_FAILED: u8 = 5;
    pub const UPDATE_FAILED: u8 = 6;
    pub const NO_RECORDS_UPDATED: u8 = 7;
    pub const DELETE_FAILED: u8 = 8;
    pub const NO_RECORDS_DELETED: u8 = 9;
    pub const UNKNOWN_ACTION: u8 = 10;
    pub const TASKS_FAILED: u8 = 11;
    pub const UNHANDLED: u8 = 99;

    /// Process exit code for this failure
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidArguments(_) => Self::INVALID_ARGUMENTS,
            Self::AuthenticationFailed(_) => Self::AUTHENTICATION_FAILED,
            Self::ZoneNotFound(_) => Self::ZONE_NOT_FOUND,
            Self::NoZonesAvailable => Self::NO_ZONES_AVAILABLE,
            Self::CreateFailed { .. } => Self::CREATE_FAILED,
            Self::UpdateFailed { .. } => Self::UPDATE_FAILED,
            Self::NoRecordsUpdated { .. } => Self::NO_RECORDS_UPDATED,
            Self::DeleteFailed { .. } => Self::DELETE_FAILED,
            Self::NoRecordsDeleted { .. } => Self::NO_RECORDS_DELETED,
            Self::UnknownAction(_) => Self::UNKNOWN_ACTION,
            Self::TasksFailed { .. } => Self::TASKS_FAILED,
            Self::Unhandled(_) => Self::UNHANDLED,
        }
    }
}

impl From<LopDnsError> for CommandError {
    fn from(err: LopDnsError) -> Self {
        Self::Unhandled(err.into())
    }
}
