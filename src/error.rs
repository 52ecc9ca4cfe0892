//! Error taxonomy for the migration pipeline
//!
//! Every variant is terminal for a run. The binary maps them to a process
//! exit status through [`MigrateError::exit_code`].

use reqwest::StatusCode;
use thiserror::Error;

use crate::api::models::SystemId;

pub type Result<T> = std::result::Result<T, MigrateError>;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("authentication failed ({status}): {body}")]
    AuthenticationFailed { status: StatusCode, body: String },

    #[error("{operation} failed ({status}): {body}")]
    Transport {
        operation: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No system found with hostname: {hostname}")]
    HostNotFound { hostname: String },

    #[error("No migration targets available for system {sid}")]
    NoTargets { sid: SystemId },

    #[error("{desired} migration target not found")]
    NoMatchingTarget {
        desired: String,
        available: Vec<String>,
    },

    #[error("unexpected response from {operation}: {reason}")]
    UnexpectedResponse {
        operation: &'static str,
        reason: String,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl MigrateError {
    /// Process exit status for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            MigrateError::Config(_) => 2,
            _ => 1,
        }
    }

    /// HTTP status and body when the remote side rejected a call
    pub fn http_failure(&self) -> Option<(StatusCode, &str)> {
        match self {
            MigrateError::AuthenticationFailed { status, body }
            | MigrateError::Transport { status, body, .. } => Some((*status, body.as_str())),
            _ => None,
        }
    }
}
