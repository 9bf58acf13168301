//! Docker Engine Client
//!
//! A small client for the local Docker daemon, covering the two operations the
//! dangling container checker needs: listing running containers and stopping
//! a container with a grace period.
//!
//! # Example
//!
//! ```no_run
//! use docker_client::{DockerClient, DockerClientTrait};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Use DOCKER_HOST or the default socket; nothing is sent until the first call
//! let client = DockerClient::from_env();
//!
//! // List running containers
//! let containers = client.list_containers().await?;
//!
//! // Stop the first one, giving it 30 seconds to exit
//! if let Some(container) = containers.first() {
//!     client.stop_container(&container.id, Duration::from_secs(30)).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod docker_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::DockerClient;
pub use error::DockerError;
pub use models::Container;
pub use docker_trait::DockerClientTrait;
#[cfg(feature = "test-util")]
pub use mock::MockDockerClient;
