//! Dangling Container Controller
//!
//! Runs on every node (as a DaemonSet) and compares the containers the local
//! Docker daemon is running with the containers Kubernetes has scheduled on
//! the same node. Containers Kubernetes no longer knows about are reported as
//! Warning events on the Node, and in `remove` mode they are stopped.

mod cli;
mod cluster;
mod config;
mod context;
mod controller;
mod dispatcher;
mod error;
mod fetcher;
mod notifier;
mod reconciler;
#[cfg(test)]
mod test_utils;

use crate::cli::Cli;
use crate::cluster::KubeClusterClient;
use crate::config::Config;
use crate::context::{Context, NodeIdentity};
use crate::error::ControllerError;
use crate::notifier::{KubeEventPublisher, Notifier, QUEUE_CAPACITY};
use clap::Parser;
use controller::Controller;
use docker_client::{DockerClient, DockerClientTrait};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Dangling Container Controller");
    info!("  Node: {}", cli.node);
    info!("  Mode: {}", cli.mode);
    info!("  Kubeconfig: {}", cli.kubeconfig.display());
    info!("  Context: {}", cli.context.as_deref().unwrap_or("current"));

    let config = Config::load(&cli.config_path)?;
    info!("Configuration: {:?}", config);

    // kube's rustls transport needs a process-wide crypto provider
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        warn!("A rustls crypto provider was already installed");
    }

    let kube_client = cluster::connect(&cli.kubeconfig, cli.context.as_deref()).await?;
    let cluster = Arc::new(KubeClusterClient::new(kube_client.clone()));
    let node = NodeIdentity::resolve(cluster.as_ref(), &cli.node).await?;

    let docker = Arc::new(DockerClient::from_env());
    info!("  Docker host: {}", docker.host());
    if let Err(e) = docker.ping().await {
        warn!("Docker daemon not reachable yet, passes will retry: {}", e);
    }

    let publisher = Arc::new(KubeEventPublisher::new(kube_client, &node));
    let (notifier_handle, notifier) = Notifier::new(QUEUE_CAPACITY);
    let _notifier_worker = notifier.spawn(publisher);

    let context = Arc::new(Context::new(config, node, cli.mode));
    let controller = Controller::new(context, docker, cluster, notifier_handle);
    controller.run().await;

    Ok(())
}
