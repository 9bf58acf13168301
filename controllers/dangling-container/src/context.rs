//! Process-wide context.
//!
//! Built once in `main` and shared read-only by every component.

use crate::cli::Mode;
use crate::cluster::ClusterClient;
use crate::config::Config;
use crate::error::ControllerError;
use k8s_openapi::api::core::v1::{Node, ObjectReference};
use kube::Resource;
use tracing::info;

/// The node this agent runs on, as known to the API server.
#[derive(Debug, Clone)]
pub struct NodeIdentity {
    /// Node name, used to select pods
    pub name: String,
    /// Reference events are attached to
    pub reference: ObjectReference,
}

impl NodeIdentity {
    /// Look the node up once at startup. A node that cannot be found is fatal.
    pub async fn resolve(cluster: &dyn ClusterClient, name: &str) -> Result<Self, ControllerError> {
        let node = cluster.get_node(name).await?;
        let identity = Self::from_node(&node, name);
        info!(node = %identity.name, uid = ?identity.reference.uid, "Resolved node reference");
        Ok(identity)
    }

    fn from_node(node: &Node, requested: &str) -> Self {
        let name = node
            .metadata
            .name
            .clone()
            .unwrap_or_else(|| requested.to_string());
        Self {
            name,
            reference: node.object_ref(&()),
        }
    }
}

/// Immutable state every pass reads.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub node: NodeIdentity,
    pub mode: Mode,
}

impl Context {
    pub fn new(config: Config, node: NodeIdentity, mode: Mode) -> Self {
        Self { config, node, mode }
    }
}
