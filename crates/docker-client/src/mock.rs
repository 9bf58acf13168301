//! Mock DockerClient for unit testing
//!
//! Stores containers in memory and records every stop request, so tests can
//! assert on what the checker asked the daemon to do.

use crate::docker_trait::DockerClientTrait;
use crate::error::DockerError;
use crate::models::Container;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock DockerClient for testing
#[derive(Debug, Clone, Default)]
pub struct MockDockerClient {
    containers: Arc<Mutex<Vec<Container>>>,
    stopped: Arc<Mutex<Vec<(String, Duration)>>>,
    list_calls: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
    fail_stops: Arc<AtomicBool>,
}

impl MockDockerClient {
    /// Create an empty mock daemon
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock daemon already running `containers`
    pub fn with_containers(containers: Vec<Container>) -> Self {
        let client = Self::new();
        *client.containers.lock().unwrap() = containers;
        client
    }

    /// Add a running container (for test setup)
    pub fn add_container(&self, container: Container) {
        self.containers.lock().unwrap().push(container);
    }

    /// Make every call fail as if the daemon socket were gone
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make stop requests fail while still recording them
    pub fn set_fail_stops(&self, fail: bool) {
        self.fail_stops.store(fail, Ordering::SeqCst);
    }

    /// Stop requests received so far, in order
    pub fn stopped(&self) -> Vec<(String, Duration)> {
        self.stopped.lock().unwrap().clone()
    }

    /// Number of times `list_containers` was called
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), DockerError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DockerError::Unavailable(
                "Cannot connect to the Docker daemon at unix:///var/run/docker.sock".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DockerClientTrait for MockDockerClient {
    async fn ping(&self) -> Result<(), DockerError> {
        self.check_available()
    }

    async fn list_containers(&self) -> Result<Vec<Container>, DockerError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.containers.lock().unwrap().clone())
    }

    async fn stop_container(&self, id: &str, timeout: Duration) -> Result<(), DockerError> {
        self.stopped.lock().unwrap().push((id.to_string(), timeout));
        self.check_available()?;

        if self.fail_stops.load(Ordering::SeqCst) {
            return Err(DockerError::Stop {
                id: id.to_string(),
                reason: "container did not exit in time".to_string(),
            });
        }

        self.containers.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }
}
