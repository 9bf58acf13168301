//! DockerClient trait for mocking
//!
//! This trait abstracts the DockerClient so the checker can be unit tested
//! against an in-memory daemon.

use crate::error::DockerError;
use crate::models::Container;
use std::time::Duration;

/// Trait for Docker daemon operations
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait DockerClientTrait: Send + Sync {
    /// Check that the daemon answers
    async fn ping(&self) -> Result<(), DockerError>;

    /// List running containers
    async fn list_containers(&self) -> Result<Vec<Container>, DockerError>;

    /// Stop a container, letting it run for at most `timeout` before it is killed
    async fn stop_container(&self, id: &str, timeout: Duration) -> Result<(), DockerError>;
}
