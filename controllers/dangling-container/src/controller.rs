//! Main controller implementation.
//!
//! This module contains the `Controller` struct that drives reconciliation
//! passes. A pass moves through `Idle -> FetchingBoth -> Reconciling ->
//! Dispatching -> Idle`; passes never overlap and are separated by a fixed
//! sleep of `timing.check_interval` seconds, with no backoff or jitter.

use crate::cluster::ClusterClient;
use crate::context::Context;
use crate::dispatcher::{Action, Dispatcher, Outcome};
use crate::fetcher::{fetch_cluster_container_ids, fetch_runtime_containers};
use crate::notifier::NotifierHandle;
use crate::reconciler::find_orphans;
use docker_client::{Container, DockerClientTrait};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Where a pass currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    FetchingBoth,
    Reconciling,
    Dispatching,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::FetchingBoth => "fetching",
            Phase::Reconciling => "reconciling",
            Phase::Dispatching => "dispatching",
        };
        f.write_str(name)
    }
}

/// Summary of one pass.
#[derive(Debug, Clone, Default)]
pub struct PassReport {
    /// Runtime containers considered after whitelist filtering
    pub runtime_containers: usize,
    /// Container IDs the cluster reported for this node
    pub cluster_containers: usize,
    /// One entry per orphan
    pub outcomes: Vec<Outcome>,
}

/// Main controller for dangling container detection.
pub struct Controller {
    context: Arc<Context>,
    docker: Arc<dyn DockerClientTrait>,
    cluster: Arc<dyn ClusterClient>,
    dispatcher: Dispatcher,
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("context", &self.context)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

impl Controller {
    /// Creates a new controller instance.
    pub fn new(
        context: Arc<Context>,
        docker: Arc<dyn DockerClientTrait>,
        cluster: Arc<dyn ClusterClient>,
        notifier: NotifierHandle,
    ) -> Self {
        let dispatcher = Dispatcher::new(
            Arc::clone(&docker),
            notifier,
            context.mode,
            context.config.stop_timeout(),
        );
        Self {
            context,
            docker,
            cluster,
            dispatcher,
        }
    }

    /// Runs passes until the process is stopped.
    pub async fn run(&self) {
        let interval = self.context.config.check_interval();
        info!(
            node = %self.context.node.name,
            mode = %self.context.mode,
            interval_seconds = interval.as_secs(),
            "Starting reconciliation loop"
        );

        loop {
            let report = self.run_pass().await;
            info!(
                runtime_containers = report.runtime_containers,
                cluster_containers = report.cluster_containers,
                orphans = report.outcomes.len(),
                "Dangling container check complete"
            );
            debug!("Sleeping {}s until next pass", interval.as_secs());
            tokio::time::sleep(interval).await;
        }
    }

    /// Performs one full pass: fetch both inventories, compare, act.
    ///
    /// Never fails. Backend errors have already degraded to empty inventories
    /// by the time the comparison runs.
    pub async fn run_pass(&self) -> PassReport {
        info!(node = %self.context.node.name, "Starting dangling container check");

        enter(Phase::FetchingBoth);
        let (runtime, cluster_ids) = self.fetch_inventories().await;

        enter(Phase::Reconciling);
        let orphans = find_orphans(&runtime, &cluster_ids);

        let outcomes = if orphans.is_empty() {
            info!("No orphaned containers found.");
            Vec::new()
        } else {
            enter(Phase::Dispatching);
            self.dispatcher.dispatch(&orphans).await
        };

        for outcome in &outcomes {
            if let Action::StopFailed(reason) = &outcome.action {
                warn!(
                    container_id = %outcome.container_id,
                    event = %outcome.message,
                    "Event reports the container as stopped but the stop call failed: {}", reason
                );
            }
        }

        enter(Phase::Idle);

        PassReport {
            runtime_containers: runtime.len(),
            cluster_containers: cluster_ids.len(),
            outcomes,
        }
    }

    /// Fetch both inventories on separate tasks and wait for both.
    async fn fetch_inventories(&self) -> (Vec<Container>, Vec<String>) {
        let runtime_task = {
            let docker = Arc::clone(&self.docker);
            let context = Arc::clone(&self.context);
            tokio::spawn(async move { fetch_runtime_containers(docker.as_ref(), &context.config).await })
        };

        let cluster_task = {
            let cluster = Arc::clone(&self.cluster);
            let context = Arc::clone(&self.context);
            tokio::spawn(async move { fetch_cluster_container_ids(cluster.as_ref(), &context.node.name).await })
        };

        let (runtime, cluster_ids) = tokio::join!(runtime_task, cluster_task);

        let runtime = runtime.unwrap_or_else(|e| {
            error!("Runtime inventory task failed: {}", e);
            Vec::new()
        });
        let cluster_ids = cluster_ids.unwrap_or_else(|e| {
            error!("Cluster inventory task failed: {}", e);
            Vec::new()
        });

        (runtime, cluster_ids)
    }
}

fn enter(phase: Phase) {
    debug!(%phase, "Pass phase");
}
