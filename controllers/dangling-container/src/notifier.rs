//! Kubernetes event delivery.
//!
//! The dispatcher never talks to the API server directly. It drops messages
//! into a bounded queue, and a worker task that lives as long as the process
//! republishes them as Warning events on the Node object.

use crate::context::NodeIdentity;
use crate::error::ControllerError;
use k8s_openapi::api::core::v1::ObjectReference;
use kube::Client;
use kube_runtime::events::{Event, EventType, Recorder, Reporter};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Event reason for every message the checker emits
pub const DANGLING_CONTAINER_REASON: &str = "DanglingContainer";

/// Component name events are reported under
pub const EVENT_SOURCE_COMPONENT: &str = "container-checker";

/// Messages that can wait for the API server before new ones are dropped
pub const QUEUE_CAPACITY: usize = 256;

/// A message waiting to be published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub reason: &'static str,
    pub message: String,
}

impl Notification {
    pub fn dangling_container(message: impl Into<String>) -> Self {
        Self {
            reason: DANGLING_CONTAINER_REASON,
            message: message.into(),
        }
    }
}

/// Destination for notifications.
#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, notification: &Notification) -> Result<(), ControllerError>;
}

/// Reporter events are attributed to: the checker component on this node.
pub fn reporter_for(node: &NodeIdentity) -> Reporter {
    Reporter {
        controller: EVENT_SOURCE_COMPONENT.to_string(),
        instance: Some(node.name.clone()),
    }
}

/// Kubernetes event for a notification.
pub fn event_for(notification: &Notification) -> Event {
    Event {
        type_: EventType::Warning,
        reason: notification.reason.to_string(),
        note: Some(notification.message.clone()),
        action: "Reconcile".to_string(),
        secondary: None,
    }
}

/// Publishes notifications as Kubernetes events regarding the local Node.
pub struct KubeEventPublisher {
    recorder: Recorder,
    node: ObjectReference,
}

impl KubeEventPublisher {
    pub fn new(client: Client, node: &NodeIdentity) -> Self {
        Self {
            recorder: Recorder::new(client, reporter_for(node)),
            node: node.reference.clone(),
        }
    }
}

impl fmt::Debug for KubeEventPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KubeEventPublisher")
            .field("node", &self.node.name)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl EventPublisher for KubeEventPublisher {
    async fn publish(&self, notification: &Notification) -> Result<(), ControllerError> {
        self.recorder.publish(&event_for(notification), &self.node).await?;
        Ok(())
    }
}

/// Sending side of the notification queue, held by the dispatcher.
#[derive(Debug, Clone)]
pub struct NotifierHandle {
    sender: mpsc::Sender<Notification>,
}

impl NotifierHandle {
    /// Queue a notification without waiting.
    ///
    /// Returns `false` when the message was dropped because the queue is full
    /// or the worker has stopped.
    pub fn notify(&self, notification: Notification) -> bool {
        match self.sender.try_send(notification) {
            Ok(()) => true,
            Err(TrySendError::Full(dropped)) => {
                warn!(message = %dropped.message, "Notification queue full, dropping event");
                false
            }
            Err(TrySendError::Closed(dropped)) => {
                warn!(message = %dropped.message, "Notification worker stopped, dropping event");
                false
            }
        }
    }
}

/// Receiving side of the notification queue.
#[derive(Debug)]
pub struct Notifier {
    receiver: mpsc::Receiver<Notification>,
}

impl Notifier {
    /// Create a queue holding at most `capacity` pending notifications.
    pub fn new(capacity: usize) -> (NotifierHandle, Self) {
        let (sender, receiver) = mpsc::channel(capacity);
        (NotifierHandle { sender }, Self { receiver })
    }

    /// Run the worker on its own task.
    pub fn spawn(self, publisher: Arc<dyn EventPublisher>) -> JoinHandle<()> {
        tokio::spawn(self.run(publisher))
    }

    /// Publish queued notifications until every handle is dropped.
    ///
    /// A failed publication is logged and dropped; it is not retried.
    pub async fn run(mut self, publisher: Arc<dyn EventPublisher>) {
        while let Some(notification) = self.receiver.recv().await {
            match publisher.publish(&notification).await {
                Ok(()) => debug!(reason = notification.reason, "Published event"),
                Err(e) => warn!(
                    reason = notification.reason,
                    message = %notification.message,
                    "Failed to publish event: {}", e
                ),
            }
        }
        debug!("Notification queue closed");
    }
}
