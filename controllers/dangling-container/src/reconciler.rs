//! Inventory comparison.
//!
//! A runtime container is matched when some cluster-reported ID is a substring
//! of its runtime ID. Substring rather than equality tolerates truncated or
//! prefixed IDs on either side; the flip side is that a short unrelated cluster
//! ID contained in a runtime ID also counts as a match.

use chrono::Utc;
use docker_client::Container;
use tracing::info;

/// Runtime containers with no matching cluster container ID.
///
/// `runtime` must already be whitelist-filtered. The result keeps the order of
/// `runtime`.
pub fn find_orphans(runtime: &[Container], cluster_ids: &[String]) -> Vec<Container> {
    let now = Utc::now();

    runtime
        .iter()
        .filter(|container| !is_known(&container.id, cluster_ids))
        .inspect(|orphan| {
            let age = orphan
                .age(now)
                .map_or_else(|| "unknown".to_string(), |age| format!("{}s", age.num_seconds()));
            info!(
                container_id = %orphan.id,
                image = %orphan.image,
                age = %age,
                "Orphan container found"
            );
        })
        .cloned()
        .collect()
}

/// Whether any cluster ID is contained in `runtime_id`.
pub fn is_known(runtime_id: &str, cluster_ids: &[String]) -> bool {
    cluster_ids
        .iter()
        .any(|cluster_id| runtime_id.contains(cluster_id.as_str()))
}
