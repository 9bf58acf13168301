//! Test utilities for unit testing the checker
//!
//! This module provides helpers for creating test data and in-memory stand-ins
//! for the Kubernetes API.

use crate::cli::Mode;
use crate::cluster::ClusterClient;
use crate::config::Config;
use crate::context::{Context, NodeIdentity};
use crate::error::ControllerError;
use crate::notifier::{EventPublisher, Notification};
use docker_client::Container;
use k8s_openapi::api::core::v1::{ContainerStatus, Node, ObjectReference, Pod, PodSpec, PodStatus};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Helper to create a running container; its image ID is derived from the ID
pub fn create_test_container(id: &str, image: &str) -> Container {
    Container::new(id, image, format!("sha256:{id}"))
}

/// Helper to create a config with the given whitelist
pub fn create_test_config(whitelist: &[&str]) -> Config {
    let mut config = Config::default();
    config.whitelist.images = whitelist.iter().map(|s| (*s).to_string()).collect();
    config
}

/// Helper to create a container status with a kubelet-style ID
pub fn create_test_container_status(name: &str, container_id: &str) -> ContainerStatus {
    ContainerStatus {
        name: name.to_string(),
        container_id: Some(container_id.to_string()),
        ready: true,
        ..Default::default()
    }
}

/// Helper to create a pod bound to `node` with one status per container ID
pub fn create_test_pod(name: &str, node: &str, container_ids: &[&str]) -> Pod {
    let statuses = container_ids
        .iter()
        .enumerate()
        .map(|(i, id)| create_test_container_status(&format!("container-{i}"), id))
        .collect();

    Pod {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("default".to_string()),
            ..Default::default()
        },
        spec: Some(PodSpec {
            node_name: Some(node.to_string()),
            ..Default::default()
        }),
        status: Some(PodStatus {
            container_statuses: Some(statuses),
            ..Default::default()
        }),
    }
}

/// Helper to create a Node object
pub fn create_test_node(name: &str, uid: &str) -> Node {
    Node {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            uid: Some(uid.to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Helper to create a process context for `node`
pub fn create_test_context(node: &str, mode: Mode, whitelist: &[&str]) -> Context {
    let identity = NodeIdentity {
        name: node.to_string(),
        reference: ObjectReference {
            api_version: Some("v1".to_string()),
            kind: Some("Node".to_string()),
            name: Some(node.to_string()),
            ..Default::default()
        },
    };
    Context::new(create_test_config(whitelist), identity, mode)
}

/// In-memory cluster. Returns every stored pod; node filtering is left to the caller.
#[derive(Debug, Clone, Default)]
pub struct MockClusterClient {
    pods: Arc<Mutex<Vec<Pod>>>,
    nodes: Arc<Mutex<Vec<Node>>>,
    unavailable: Arc<AtomicBool>,
}

impl MockClusterClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pods(self, pods: Vec<Pod>) -> Self {
        *self.pods.lock().unwrap() = pods;
        self
    }

    pub fn with_node(self, node: Node) -> Self {
        self.nodes.lock().unwrap().push(node);
        self
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), ControllerError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ControllerError::ClusterUnavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ClusterClient for MockClusterClient {
    async fn list_pods(&self, _node_name: &str) -> Result<Vec<Pod>, ControllerError> {
        self.check_available()?;
        Ok(self.pods.lock().unwrap().clone())
    }

    async fn get_node(&self, name: &str) -> Result<Node, ControllerError> {
        self.check_available()?;
        self.nodes
            .lock()
            .unwrap()
            .iter()
            .find(|node| node.metadata.name.as_deref() == Some(name))
            .cloned()
            .ok_or_else(|| ControllerError::ClusterUnavailable(format!("node {name} not found")))
    }
}

/// Publisher that keeps what it was given, optionally failing every call
#[derive(Debug, Clone, Default)]
pub struct RecordingPublisher {
    published: Arc<Mutex<Vec<Notification>>>,
    attempts: Arc<AtomicUsize>,
    fail: bool,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn published(&self) -> Vec<Notification> {
        self.published.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, notification: &Notification) -> Result<(), ControllerError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ControllerError::ClusterUnavailable("events API unavailable".to_string()));
        }
        self.published.lock().unwrap().push(notification.clone());
        Ok(())
    }
}
