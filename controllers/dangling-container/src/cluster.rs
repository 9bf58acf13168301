//! Kubernetes API access.
//!
//! The checker only needs two read calls from the API server: the pods
//! scheduled on this node and the Node object itself. Both sit behind the
//! `ClusterClient` trait so the fetchers can be tested without a cluster.

use crate::error::ControllerError;
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::api::ListParams;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Read access to the cluster state the checker depends on.
#[async_trait::async_trait]
pub trait ClusterClient: Send + Sync {
    /// Pods in every namespace that are scheduled onto `node_name`
    async fn list_pods(&self, node_name: &str) -> Result<Vec<Pod>, ControllerError>;

    /// The Node object called `name`
    async fn get_node(&self, name: &str) -> Result<Node, ControllerError>;
}

/// `ClusterClient` backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeClusterClient {
    client: Client,
}

impl fmt::Debug for KubeClusterClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KubeClusterClient").finish_non_exhaustive()
    }
}

impl KubeClusterClient {
    /// Wrap an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ClusterClient for KubeClusterClient {
    async fn list_pods(&self, node_name: &str) -> Result<Vec<Pod>, ControllerError> {
        let pods: Api<Pod> = Api::all(self.client.clone());
        let params = ListParams::default().fields(&format!("spec.nodeName={node_name}"));
        let list = pods.list(&params).await?;
        debug!(node = %node_name, count = list.items.len(), "Listed pods");
        Ok(list.items)
    }

    async fn get_node(&self, name: &str) -> Result<Node, ControllerError> {
        let nodes: Api<Node> = Api::all(self.client.clone());
        Ok(nodes.get(name).await?)
    }
}

/// Build a Kubernetes client.
///
/// The in-cluster service account is tried first. Outside a cluster the
/// kubeconfig at `kubeconfig` is used, with `context` selecting a context
/// other than the current one.
pub async fn connect(kubeconfig: &Path, context: Option<&str>) -> Result<Client, ControllerError> {
    let config = match Config::incluster() {
        Ok(config) => {
            info!("Using in-cluster Kubernetes configuration");
            config
        }
        Err(in_cluster) => {
            debug!("In-cluster configuration unavailable: {}", in_cluster);
            info!("Using kubeconfig {}", kubeconfig.display());

            let kubeconfig = Kubeconfig::read_from(kubeconfig)
                .map_err(|e| ControllerError::KubeConfig(e.to_string()))?;
            let options = KubeConfigOptions {
                context: context.map(str::to_string),
                ..Default::default()
            };
            Config::from_custom_kubeconfig(kubeconfig, &options)
                .await
                .map_err(|e| ControllerError::KubeConfig(e.to_string()))?
        }
    };

    Ok(Client::try_from(config)?)
}
