//! Cluster side: container IDs of the pods scheduled on this node.

use crate::cluster::ClusterClient;
use k8s_openapi::api::core::v1::{ContainerStatus, Pod};
use tracing::{debug, warn};

/// Scheme prefixes the kubelet puts in front of runtime container IDs
pub const RUNTIME_SCHEMES: &[&str] = &["docker://", "containerd://", "cri-o://"];

/// Container IDs, across all namespaces, of pods running on `node_name`.
///
/// An unreachable API server yields an empty list.
pub async fn fetch_cluster_container_ids(cluster: &dyn ClusterClient, node_name: &str) -> Vec<String> {
    match cluster.list_pods(node_name).await {
        Ok(pods) => {
            let ids = pod_container_ids(&pods, node_name);
            debug!(pods = pods.len(), containers = ids.len(), "Fetched cluster inventory");
            ids
        }
        Err(e) => {
            warn!("Error in listing pods: {}", e);
            Vec::new()
        }
    }
}

/// Extract normalized container IDs from the pods bound to `node_name`.
///
/// Statuses without an ID belong to containers that have not started yet and
/// are skipped.
pub fn pod_container_ids(pods: &[Pod], node_name: &str) -> Vec<String> {
    pods.iter()
        .filter(|pod| {
            pod.spec
                .as_ref()
                .and_then(|spec| spec.node_name.as_deref())
                == Some(node_name)
        })
        .flat_map(|pod| {
            let status = pod.status.as_ref();
            let regular = status.and_then(|s| s.container_statuses.as_deref()).unwrap_or_default();
            let init = status.and_then(|s| s.init_container_statuses.as_deref()).unwrap_or_default();
            let ephemeral = status
                .and_then(|s| s.ephemeral_container_statuses.as_deref())
                .unwrap_or_default();
            regular.iter().chain(init).chain(ephemeral).filter_map(move |cs| status_id(pod, cs))
        })
        .collect()
}

fn status_id(pod: &Pod, status: &ContainerStatus) -> Option<String> {
    let raw = status.container_id.as_deref()?;
    let id = normalize_container_id(raw);
    if id.is_empty() {
        warn!(
            pod = ?pod.metadata.name,
            namespace = ?pod.metadata.namespace,
            container = %status.name,
            "Skipping container status with an empty ID"
        );
        return None;
    }
    Some(id.to_string())
}

/// Strip a known runtime scheme (`docker://...`) from a kubelet container ID.
pub fn normalize_container_id(raw: &str) -> &str {
    RUNTIME_SCHEMES
        .iter()
        .find_map(|scheme| raw.strip_prefix(scheme))
        .unwrap_or(raw)
}
