//! Docker Engine client
//!
//! Thin wrapper over `bollard` that speaks to the local daemon through
//! `DOCKER_HOST`, or the default unix socket when it is unset.
//!
//! The bollard handle is built on first use, not at construction. bollard
//! refuses to build a unix-socket handle when the socket file is missing, and
//! a daemon that is down at startup must not stop the checker. A failed
//! connection is retried on the next call.

use crate::docker_trait::DockerClientTrait;
use crate::error::DockerError;
use crate::models::Container;
use bollard::container::{ListContainersOptions, StopContainerOptions};
use bollard::{Docker, API_DEFAULT_VERSION};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Socket used when `DOCKER_HOST` is unset
pub const DEFAULT_DOCKER_HOST: &str = "unix:///var/run/docker.sock";

/// Transport bound for list and ping requests
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Extra time a stop request gets on top of the container's grace period,
/// covering the kill and the daemon's reply
pub const STOP_REQUEST_MARGIN: Duration = Duration::from_secs(30);

/// Docker daemon client
#[derive(Debug)]
pub struct DockerClient {
    host: String,
    request_timeout: Duration,
    docker: OnceCell<Docker>,
}

impl DockerClient {
    /// Create a client for `host` (`unix:///path`, `tcp://addr` or `http://addr`).
    ///
    /// Nothing is checked or sent here.
    pub fn new(host: impl Into<String>, request_timeout: Duration) -> Self {
        Self {
            host: host.into(),
            request_timeout,
            docker: OnceCell::new(),
        }
    }

    /// Create a client from `DOCKER_HOST`, falling back to the default socket.
    pub fn from_env() -> Self {
        let host = std::env::var("DOCKER_HOST")
            .ok()
            .filter(|host| !host.is_empty())
            .unwrap_or_else(|| DEFAULT_DOCKER_HOST.to_string());
        Self::new(host, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Daemon address this client talks to
    pub fn host(&self) -> &str {
        &self.host
    }

    async fn handle(&self) -> Result<&Docker, DockerError> {
        self.docker
            .get_or_try_init(|| async {
                debug!(host = %self.host, "Connecting to Docker daemon");
                connect(&self.host, self.request_timeout)
            })
            .await
    }
}

fn connect(host: &str, timeout: Duration) -> Result<Docker, DockerError> {
    let secs = timeout.as_secs();

    if let Some(path) = host.strip_prefix("unix://") {
        #[cfg(unix)]
        return Ok(Docker::connect_with_unix(path, secs, API_DEFAULT_VERSION)?);
        #[cfg(not(unix))]
        return Err(DockerError::Unavailable(format!("unix socket {path} is not supported on this platform")));
    }

    if let Some(addr) = host.strip_prefix("tcp://") {
        return Ok(Docker::connect_with_http(&format!("http://{addr}"), secs, API_DEFAULT_VERSION)?);
    }

    if host.starts_with("http://") {
        return Ok(Docker::connect_with_http(host, secs, API_DEFAULT_VERSION)?);
    }

    Err(DockerError::Unavailable(format!("unsupported DOCKER_HOST {host}")))
}

/// Request timeout for a stop call with the given grace period.
///
/// Never shorter than `floor`, and always longer than the grace period so the
/// daemon can finish the stop before the request is abandoned.
#[must_use]
pub fn stop_request_timeout(grace: Duration, floor: Duration) -> Duration {
    grace.saturating_add(STOP_REQUEST_MARGIN).max(floor)
}

#[async_trait::async_trait]
impl DockerClientTrait for DockerClient {
    async fn ping(&self) -> Result<(), DockerError> {
        debug!("Pinging Docker daemon");
        self.handle()
            .await?
            .ping()
            .await
            .map_err(|e| DockerError::Unavailable(e.to_string()))?;
        Ok(())
    }

    async fn list_containers(&self) -> Result<Vec<Container>, DockerError> {
        let options = ListContainersOptions::<String> {
            all: false,
            ..Default::default()
        };

        let summaries = self.handle().await?.list_containers(Some(options)).await?;
        debug!(count = summaries.len(), "Docker returned container summaries");

        let containers = summaries
            .into_iter()
            .filter_map(|summary| match Container::try_from(summary) {
                Ok(container) => Some(container),
                Err(summary) => {
                    warn!(image = ?summary.image, "Skipping container summary without an ID");
                    None
                }
            })
            .collect();

        Ok(containers)
    }

    async fn stop_container(&self, id: &str, timeout: Duration) -> Result<(), DockerError> {
        let t = i64::try_from(timeout.as_secs()).unwrap_or(i64::MAX);
        let request_timeout = stop_request_timeout(timeout, self.request_timeout);
        debug!(
            container_id = %id,
            grace_seconds = t,
            request_timeout_seconds = request_timeout.as_secs(),
            "Stopping container"
        );

        let docker = self.handle().await?.clone().with_timeout(request_timeout);
        docker
            .stop_container(id, Some(StopContainerOptions { t }))
            .await
            .map_err(|e| DockerError::Stop {
                id: id.to_string(),
                reason: e.to_string(),
            })
    }
}
