//! Acting on orphans.
//!
//! In watch mode an orphan is only reported. In remove mode it is stopped
//! first. Either way one event is queued per orphan.

use crate::cli::Mode;
use crate::notifier::{Notification, NotifierHandle};
use docker_client::{Container, DockerClientTrait};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// What happened to one orphan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Watch mode, nothing was changed
    Reported,
    /// The stop call returned successfully
    Stopped,
    /// The stop call returned an error
    StopFailed(String),
}

/// Result of dispatching one orphan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub container_id: String,
    pub action: Action,
    /// Text handed to the notifier
    pub message: String,
}

/// Event text for an orphan seen in watch mode
pub fn found_message(container: &Container) -> String {
    format!("Dangling container found: {} ({})", container.id, container.image_id)
}

/// Event text for an orphan handled in remove mode.
///
/// Used whether or not the stop call succeeded.
pub fn stopped_message(container: &Container) -> String {
    format!("Dangling container stopped: {} ({})", container.id, container.image_id)
}

/// Applies the configured mode to every orphan of a pass.
pub struct Dispatcher {
    docker: Arc<dyn DockerClientTrait>,
    notifier: NotifierHandle,
    mode: Mode,
    stop_timeout: Duration,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("mode", &self.mode)
            .field("stop_timeout", &self.stop_timeout)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(
        docker: Arc<dyn DockerClientTrait>,
        notifier: NotifierHandle,
        mode: Mode,
        stop_timeout: Duration,
    ) -> Self {
        Self {
            docker,
            notifier,
            mode,
            stop_timeout,
        }
    }

    /// Handle orphans one at a time, in the order given.
    pub async fn dispatch(&self, orphans: &[Container]) -> Vec<Outcome> {
        let mut outcomes = Vec::with_capacity(orphans.len());
        for orphan in orphans {
            outcomes.push(self.dispatch_one(orphan).await);
        }
        outcomes
    }

    async fn dispatch_one(&self, orphan: &Container) -> Outcome {
        let (action, message) = match self.mode {
            Mode::Watch => {
                info!(container_id = %orphan.id, image = %orphan.image, "Observing dangling container");
                (Action::Reported, found_message(orphan))
            }
            Mode::Remove => {
                info!(
                    container_id = %orphan.id,
                    image = %orphan.image,
                    grace_seconds = self.stop_timeout.as_secs(),
                    "Stopping container"
                );
                // TODO: report failed stops with their own event text once the
                // operators agree on the wording; the event currently reads
                // "stopped" either way.
                let action = match self.docker.stop_container(&orphan.id, self.stop_timeout).await {
                    Ok(()) => Action::Stopped,
                    Err(e) => Action::StopFailed(e.to_string()),
                };
                (action, stopped_message(orphan))
            }
        };

        self.notifier.notify(Notification::dangling_container(message.clone()));

        Outcome {
            container_id: orphan.id.clone(),
            action,
            message,
        }
    }
}
