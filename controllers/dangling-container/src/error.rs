//! Controller-specific error types.
//!
//! This module defines error types specific to the dangling container checker
//! that are not covered by upstream library errors.

use kube::Error as KubeError;
use thiserror::Error;

/// Errors that can occur in the dangling container checker.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Could not build a Kubernetes client configuration
    #[error("Kubernetes client configuration error: {0}")]
    KubeConfig(String),

    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    ConfigRead {
        /// Path that was read
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Configuration file is not valid YAML for the expected shape
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The Kubernetes API could not be reached or answered with an error
    #[error("Cluster API unavailable: {0}")]
    #[allow(dead_code)] // Raised by test doubles
    ClusterUnavailable(String),
}
