//! Error types for n8n-launch.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//! A child that starts and later exits non-zero is not an error here; that
//! outcome is a [`crate::supervisor::ChildExit`].

use crate::exit_codes;
use thiserror::Error;

/// Main error type for supervisor operations.
#[derive(Error, Debug)]
pub enum SupervisorError {
    /// The child process could not be started at all.
    #[error(
        "failed to start '{command}': {source}\nFix: ensure the command is installed and in PATH."
    )]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The OS failed to report the child's exit status.
    #[error("failed to wait for '{command}': {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Launcher config is unreadable or invalid.
    #[error("{0}")]
    Config(String),
}

impl SupervisorError {
    /// Returns the exit code the supervisor terminates with for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SupervisorError::Launch { .. } => exit_codes::LAUNCH_FAILURE,
            SupervisorError::Wait { .. } => exit_codes::LAUNCH_FAILURE,
            SupervisorError::Config(_) => exit_codes::CONFIG_ERROR,
        }
    }
}

/// Result type alias for supervisor operations.
pub type Result<T> = std::result::Result<T, SupervisorError>;
