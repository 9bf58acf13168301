//! Runtime side: containers the Docker daemon is running.

use crate::config::Config;
use docker_client::{Container, DockerClientTrait};
use tracing::{debug, info, warn};

/// List running containers, minus whitelisted images.
///
/// An unreachable daemon yields an empty inventory.
pub async fn fetch_runtime_containers(docker: &dyn DockerClientTrait, config: &Config) -> Vec<Container> {
    let containers = match docker.list_containers().await {
        Ok(containers) => containers,
        Err(e) => {
            warn!("Cannot list containers from Docker daemon: {}", e);
            return Vec::new();
        }
    };

    if containers.is_empty() {
        info!("No running containers found in Docker.");
        return containers;
    }

    let total = containers.len();
    let filtered = filter_whitelisted(containers, config);
    debug!(total, considered = filtered.len(), "Fetched runtime inventory");
    filtered
}

/// Drop every container whose image reference contains a whitelisted substring.
pub fn filter_whitelisted(containers: Vec<Container>, config: &Config) -> Vec<Container> {
    containers
        .into_iter()
        .filter(|container| {
            let whitelisted = config.is_whitelisted(&container.image);
            if whitelisted {
                debug!(container_id = %container.id, image = %container.image, "Skipping whitelisted container");
            }
            !whitelisted
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use docker_client::client::DEFAULT_REQUEST_TIMEOUT;
    use docker_client::{DockerClient, MockDockerClient};

    #[tokio::test]
    async fn test_whitelisted_images_are_excluded() {
        let docker = MockDockerClient::with_containers(vec![
            create_test_container("abc123", "nginx"),
            create_test_container("def456", "gcr.io/google_containers/pause-amd64:3.0"),
        ]);
        let config = create_test_config(&["pause-amd64"]);

        let containers = fetch_runtime_containers(&docker, &config).await;

        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].id, "abc123");
    }

    #[tokio::test]
    async fn test_empty_whitelist_keeps_everything() {
        let docker = MockDockerClient::with_containers(vec![
            create_test_container("abc123", "nginx"),
            create_test_container("def456", "redis"),
        ]);

        let containers = fetch_runtime_containers(&docker, &Config::default()).await;

        let ids: Vec<_> = containers.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["abc123", "def456"]);
    }

    #[tokio::test]
    async fn test_unreachable_daemon_yields_empty_inventory() {
        let docker = MockDockerClient::with_containers(vec![create_test_container("abc123", "nginx")]);
        docker.set_unavailable(true);

        let containers = fetch_runtime_containers(&docker, &Config::default()).await;

        assert!(containers.is_empty());
        assert_eq!(docker.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_docker_socket_yields_empty_inventory() {
        let docker = DockerClient::new("unix:///nonexistent/docker.sock", DEFAULT_REQUEST_TIMEOUT);

        let containers = fetch_runtime_containers(&docker, &Config::default()).await;

        assert!(containers.is_empty());
    }

    #[test]
    fn test_filter_preserves_order() {
        let config = create_test_config(&["kube-proxy"]);
        let containers = vec![
            create_test_container("c3", "app:3"),
            create_test_container("c1", "k8s.gcr.io/kube-proxy:v1.30"),
            create_test_container("c2", "app:2"),
        ];

        let filtered = filter_whitelisted(containers, &config);

        let ids: Vec<_> = filtered.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c3", "c2"]);
    }
}
