//! Docker client errors

use thiserror::Error;

/// Errors that can occur when talking to the Docker daemon
#[derive(Debug, Error)]
pub enum DockerError {
    /// Transport or daemon error reported by bollard
    #[error("Docker API error: {0}")]
    Api(#[from] bollard::errors::Error),

    /// The daemon could not be reached
    #[error("Docker daemon unavailable: {0}")]
    Unavailable(String),

    /// The stop request did not complete
    #[error("Failed to stop container {id}: {reason}")]
    Stop {
        /// Container that failed to stop
        id: String,
        /// Reason reported by the daemon
        reason: String,
    },
}
