//! Error type shared by every helper.

use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HelperError {
    /// The program could not be started at all.
    #[error("failed to start \"{command}\": {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The program ran and exited unsuccessfully.
    #[error("Command \"{command}\" returned with {status}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        /// Combined stdout and stderr captured before exit.
        output: String,
    },

    #[error("Error running hook script {path}: {reason}")]
    HookScript { path: String, reason: String },

    #[error("cannot parse size {input:?}: {reason}")]
    ParseSize { input: String, reason: String },

    #[error("cannot measure disk usage of {path}: {reason}")]
    DiskUsage { path: String, reason: String },

    #[error("cannot redirect {stream}: {source}")]
    Redirect {
        stream: &'static str,
        #[source]
        source: nix::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
